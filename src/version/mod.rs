// ABOUTME: Release version handling: tag parsing, ranking, latest-version resolution, bumping.
// ABOUTME: Tags are `<semver>` or `<semver>.hf<N>`, with an optional leading `v`.

mod bump;
mod parse;
mod rank;
mod resolve;

pub use bump::{BumpKind, VersionError, bump};
pub use parse::ParsedVersion;
pub use rank::{best_tag, rank};
pub use resolve::{BASELINE_VERSION, LatestVersion, resolve_latest};
