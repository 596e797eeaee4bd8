//! Semantic version comparison used by rollout plans.

use semver::Version;
use std::cmp::Ordering;

/// Parse a version the way package managers accept it on the command line:
/// surrounding whitespace and a leading `v` or `=` are ignored.
pub fn parse(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    let trimmed = trimmed
        .strip_prefix('=')
        .unwrap_or(trimmed)
        .trim_start();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}

pub fn is_valid(version: &str) -> bool {
    parse(version).is_some()
}

// Precedence ordering: build metadata is ignored.
fn compare(a: &str, b: &str) -> Option<Ordering> {
    Some(parse(a)?.cmp_precedence(&parse(b)?))
}

/// `a < b`, or `None` when either side is not a valid version.
pub fn less_than(a: &str, b: &str) -> Option<bool> {
    compare(a, b).map(|ordering| ordering == Ordering::Less)
}

/// `a <= b`, or `None` when either side is not a valid version.
pub fn less_or_equal(a: &str, b: &str) -> Option<bool> {
    compare(a, b).map(|ordering| ordering != Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(is_valid("1.0.0"));
        assert!(is_valid("v1.2.3"));
        assert!(is_valid("=2.0.0-beta.1"));
        assert!(is_valid(" 0.1.0 "));
        assert!(!is_valid("1.0"));
        assert!(!is_valid("latest"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_ordering() {
        assert_eq!(less_than("1.0.0", "2.0.0"), Some(true));
        assert_eq!(less_than("2.0.0", "2.0.0"), Some(false));
        assert_eq!(less_or_equal("2.0.0", "2.0.0"), Some(true));
        assert_eq!(less_than("2.0.0-rc.1", "2.0.0"), Some(true));
        assert_eq!(less_than("1.10.0", "1.9.0"), Some(false));
    }

    #[test]
    fn test_build_metadata_ignored() {
        assert_eq!(less_or_equal("1.0.0+build.7", "1.0.0"), Some(true));
        assert_eq!(less_or_equal("1.0.0", "1.0.0+build.7"), Some(true));
        assert_eq!(less_than("1.0.0+build.1", "1.0.0+build.2"), Some(false));
        assert_eq!(less_than("1.0.0-rc.1+build.9", "1.0.0"), Some(true));
    }

    #[test]
    fn test_invalid_operands() {
        assert_eq!(less_than("1.0.0", "nope"), None);
        assert_eq!(less_or_equal("x", "1.0.0"), None);
    }
}
