// ABOUTME: Total order over parsed versions with unparseable tags ranked last.
// ABOUTME: Picks the best version among one image's tags.

use std::cmp::Ordering;

use crate::registry::ImageRecord;

use super::ParsedVersion;

/// Compare two possibly-unparseable versions.
///
/// `Greater` means `a` ranks ahead of `b`. `None` ranks behind every parsed
/// version and two `None`s are equal.
pub fn rank(a: Option<&ParsedVersion>, b: Option<&ParsedVersion>) -> Ordering {
    a.cmp(&b)
}

/// Highest-ranked version among an image's tags, with the tag that carries it.
///
/// One digest may carry several version tags (`1.2.3` and `1.2.3.hf1`).
pub fn best_tag<'a>(record: &'a ImageRecord, prefix: &str) -> Option<(ParsedVersion, &'a str)> {
    record
        .tags
        .iter()
        .filter_map(|tag| ParsedVersion::parse_prefixed(tag, prefix).map(|v| (v, tag.as_str())))
        .max_by(|(a, _), (b, _)| a.cmp(b))
}
