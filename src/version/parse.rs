// ABOUTME: Classifies a tag string as plain release, release plus hotfix, or unparseable.
// ABOUTME: Pre-release and build metadata are rejected; only `.hf<N>` is accepted as a suffix.

use semver::Version;
use std::fmt;

const HOTFIX_MARKER: &str = ".hf";

/// A release version recovered from an image tag.
///
/// Field order matters: the derived ordering compares the base version first
/// and breaks ties on the hotfix number, so `1.2.3 < 1.2.3.hf1 < 1.2.3.hf2 < 1.2.4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParsedVersion {
    base: Version,
    hotfix: u64,
}

impl ParsedVersion {
    pub fn new(base: Version, hotfix: u64) -> Self {
        Self { base, hotfix }
    }

    /// Parse a tag, stripping one optional leading `v`.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::parse_prefixed(tag, "")
    }

    /// Parse a tag published with a version prefix.
    ///
    /// The prefix is stripped when present, then one optional leading `v`.
    /// Tags without the prefix are still considered.
    pub fn parse_prefixed(tag: &str, prefix: &str) -> Option<Self> {
        let tag = tag.strip_prefix(prefix).unwrap_or(tag);
        let tag = tag.strip_prefix('v').unwrap_or(tag);

        let (base, hotfix) = match tag.rsplit_once(HOTFIX_MARKER) {
            Some((base, number))
                if !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()) =>
            {
                (base, number.parse().ok()?)
            }
            _ => (tag, 0),
        };

        let base = Version::parse(base).ok()?;
        if !base.pre.is_empty() || !base.build.is_empty() {
            return None;
        }

        Some(Self { base, hotfix })
    }

    pub fn base_version(&self) -> &Version {
        &self.base
    }

    /// Hotfix number, 0 for a plain release.
    pub fn hotfix_number(&self) -> u64 {
        self.hotfix
    }

    pub fn is_hotfix(&self) -> bool {
        self.hotfix > 0
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if self.hotfix > 0 {
            write!(f, "{}{}", HOTFIX_MARKER, self.hotfix)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_release() {
        let parsed = ParsedVersion::parse("1.2.3").unwrap();
        assert_eq!(parsed.base_version(), &Version::new(1, 2, 3));
        assert_eq!(parsed.hotfix_number(), 0);
        assert!(!parsed.is_hotfix());
    }

    #[test]
    fn leading_v_is_stripped() {
        assert_eq!(
            ParsedVersion::parse("v1.2.3"),
            ParsedVersion::parse("1.2.3")
        );
    }

    #[test]
    fn hotfix_suffix() {
        let parsed = ParsedVersion::parse("v2.0.1.hf12").unwrap();
        assert_eq!(parsed.base_version(), &Version::new(2, 0, 1));
        assert_eq!(parsed.hotfix_number(), 12);
    }

    #[test]
    fn rejects_non_versions() {
        for tag in [
            "latest",
            "prod",
            "",
            "v",
            "1.2",
            "1.2.3.hf",
            "1.2.3.hfx",
            "1.2.3.hf-1",
            "1.2.3.hf1.hf2",
            "1.2.3-rc.1",
            "1.2.3+build.5",
            "1.2.3-rc.1.hf1",
            "vv1.2.3",
            "01.2.3",
        ] {
            assert_eq!(ParsedVersion::parse(tag), None, "{tag} should not parse");
        }
    }

    #[test]
    fn configured_prefix_is_stripped_before_v() {
        let parsed = ParsedVersion::parse_prefixed("release-v1.4.0.hf2", "release-").unwrap();
        assert_eq!(parsed.to_string(), "1.4.0.hf2");
        assert!(ParsedVersion::parse_prefixed("1.4.0", "release-").is_some());
    }

    #[test]
    fn display_round_trips_canonical_form() {
        assert_eq!(ParsedVersion::parse("v1.0.0").unwrap().to_string(), "1.0.0");
        assert_eq!(
            ParsedVersion::parse("1.0.0.hf3").unwrap().to_string(),
            "1.0.0.hf3"
        );
    }
}
