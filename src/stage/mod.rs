// ABOUTME: Stage tagging: point a deployment-stage tag (dev, uat, prod) at an existing image.
// ABOUTME: Idempotent; an already-correct stage tag is left untouched.

mod decision;
mod error;
mod tagger;

pub use decision::TagDecision;
pub use error::{TagError, TagErrorKind};
pub use tagger::StageTagger;

use serde::{Deserialize, Serialize};

use crate::types::{ImageDigest, ImageTag, RepositoryName};

/// One tagging invocation: apply `stage_tag` to the image under `source_tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTagRequest {
    pub repository: RepositoryName,
    pub source_tag: ImageTag,
    pub stage_tag: ImageTag,
}

/// Where the stage tag points after tagging.
///
/// Serialized with the field names deployment tooling expects in response data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StageTaggingResult {
    pub image_digest: ImageDigest,
    pub stage_tag: String,
    pub repository_name: String,
}
