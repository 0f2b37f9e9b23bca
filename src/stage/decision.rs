// ABOUTME: Pure decision of whether a stage tag has to move.
// ABOUTME: No registry access; the tagger feeds it the digests it observed.

use crate::types::ImageDigest;

/// What to do with a stage tag given where it points now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagDecision {
    /// The stage tag already points at the target digest.
    AlreadyApplied,
    /// The stage tag is absent (`from: None`) or points elsewhere.
    Move { from: Option<ImageDigest> },
}

impl TagDecision {
    /// `current` is the digest under the stage tag, `None` when the tag is
    /// absent or its lookup failed.
    pub fn for_digests(current: Option<&ImageDigest>, target: &ImageDigest) -> Self {
        match current {
            Some(digest) if digest == target => TagDecision::AlreadyApplied,
            other => TagDecision::Move {
                from: other.cloned(),
            },
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, TagDecision::AlreadyApplied)
    }
}
