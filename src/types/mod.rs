// ABOUTME: Validated domain types shared across publishing and stage tagging.
// ABOUTME: Repository names and tags are checked once at the boundary, digests are opaque.

mod digest;
mod image_tag;
mod repository_name;

pub use digest::ImageDigest;
pub use image_tag::{ImageTag, ImageTagError};
pub use repository_name::{RepositoryName, RepositoryNameError};
