// ABOUTME: Resolves the latest released version from a repository's tag inventory.
// ABOUTME: An inventory without any version tag resolves to None (first release).

use chrono::{DateTime, Utc};
use std::cmp::{Ordering, Reverse};

use crate::registry::ImageRecord;
use crate::types::ImageDigest;

use super::{ParsedVersion, best_tag};

/// Version assumed as "current" when a repository has no release yet.
pub const BASELINE_VERSION: &str = "0.0.0";

/// The highest-ranked release found in an inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestVersion {
    /// Tag string exactly as stored in the registry.
    pub tag: String,
    pub version: ParsedVersion,
    pub digest: ImageDigest,
}

struct Candidate<'a> {
    version: ParsedVersion,
    tag: &'a str,
    digest: &'a ImageDigest,
    pushed_at: Option<DateTime<Utc>>,
}

impl Candidate<'_> {
    // Version first, then most recent push, then smaller digest.
    fn precedence(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then(self.pushed_at.cmp(&other.pushed_at))
            .then(Reverse(self.digest).cmp(&Reverse(other.digest)))
    }
}

/// Pick the latest release in the inventory.
///
/// Each image contributes its best version tag; images are then ranked against
/// each other. Returns `None` for an empty inventory or one with no version tags.
pub fn resolve_latest(inventory: &[ImageRecord], prefix: &str) -> Option<LatestVersion> {
    let latest = inventory
        .iter()
        .filter_map(|record| {
            let (version, tag) = best_tag(record, prefix)?;
            Some(Candidate {
                version,
                tag,
                digest: &record.digest,
                pushed_at: record.pushed_at,
            })
        })
        .max_by(Candidate::precedence)?;

    Some(LatestVersion {
        tag: latest.tag.to_string(),
        version: latest.version,
        digest: latest.digest.clone(),
    })
}
