//! Prerelease and build-metadata handling for semantic versioning
//!
//! Grammar and precedence follow semver.org:
//! https://semver.org/#spec-item-9 and https://semver.org/#spec-item-11

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

/// A single prerelease identifier: numeric without leading zeros, or
/// alphanumerics and hyphens with at least one non-digit.
pub(crate) const PRERELEASE_IDENTIFIER: &str = r"(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)";

/// A single build-metadata identifier. Leading zeros are allowed here.
pub(crate) const BUILD_IDENTIFIER: &str = r"[0-9a-zA-Z-]+";

static PRERELEASE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^{id}(?:\.{id})*$",
        id = PRERELEASE_IDENTIFIER
    ))
    .expect("prerelease pattern")
});

static BUILD_METADATA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{id}(?:\.{id})*$", id = BUILD_IDENTIFIER))
        .expect("build metadata pattern")
});

/// Check a full dot-separated prerelease string. Empty is not valid here;
/// callers treat the empty string as "no prerelease" before asking.
pub fn is_valid_pre_release(value: &str) -> bool {
    PRERELEASE_PATTERN.is_match(value)
}

/// Check a full dot-separated build-metadata string.
pub fn is_valid_build_metadata(value: &str) -> bool {
    BUILD_METADATA_PATTERN.is_match(value)
}

/// One dot-separated component of a prerelease.
///
/// Equality follows precedence, so `Numeric("0") == Numeric("00")`.
#[derive(Debug, Clone, Copy)]
pub enum Identifier<'a> {
    /// Entirely ASCII digits, compared as an integer of any width
    Numeric(&'a str),
    /// Anything else, compared bytewise
    AlphaNumeric(&'a str),
}

impl<'a> Identifier<'a> {
    pub fn classify(raw: &'a str) -> Self {
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            Identifier::Numeric(raw)
        } else {
            Identifier::AlphaNumeric(raw)
        }
    }
}

impl Ord for Identifier<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => compare_numeric(a, b),
            // Numeric identifiers always have lower precedence than alphanumeric ones
            (Identifier::Numeric(_), Identifier::AlphaNumeric(_)) => Ordering::Less,
            (Identifier::AlphaNumeric(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::AlphaNumeric(a), Identifier::AlphaNumeric(b)) => a.cmp(b),
        }
    }
}

impl PartialEq for Identifier<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Identifier<'_> {}

impl PartialOrd for Identifier<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two digit strings by value without parsing, so identifiers wider
/// than any machine integer still order correctly.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Split a prerelease into classified identifiers.
pub fn identifiers(pre_release: &str) -> impl Iterator<Item = Identifier<'_>> {
    pre_release.split('.').map(Identifier::classify)
}

/// Precedence of two prerelease strings attached to equal numeric cores.
///
/// An empty prerelease (a normal release) outranks any non-empty one.
/// Otherwise identifiers are compared pairwise, and when one list is a
/// prefix of the other the longer list wins.
pub fn compare_pre_release(lhs: &str, rhs: &str) -> Ordering {
    match (lhs.is_empty(), rhs.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => identifiers(lhs).cmp(identifiers(rhs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_numeric() {
        assert_eq!(Identifier::classify("0"), Identifier::Numeric("0"));
        assert_eq!(Identifier::classify("42"), Identifier::Numeric("42"));
    }

    #[test]
    fn test_classify_alphanumeric() {
        assert_eq!(Identifier::classify("alpha"), Identifier::AlphaNumeric("alpha"));
        assert_eq!(Identifier::classify("0a"), Identifier::AlphaNumeric("0a"));
        assert_eq!(Identifier::classify("-"), Identifier::AlphaNumeric("-"));
    }

    #[test]
    fn test_equality_matches_ordering() {
        let zero = Identifier::Numeric("0");
        let padded = Identifier::Numeric("00");
        assert_eq!(zero.cmp(&padded), Ordering::Equal);
        assert_eq!(zero, padded);
        assert_ne!(Identifier::Numeric("1"), Identifier::AlphaNumeric("1"));
    }

    #[test]
    fn test_valid_pre_release() {
        for value in ["alpha", "alpha.1", "0.3.7", "x.7.z.92", "x-y-z", "--", "0a", "rc-1"] {
            assert!(is_valid_pre_release(value), "expected '{}' to be valid", value);
        }
    }

    #[test]
    fn test_invalid_pre_release() {
        for value in ["", "1.01", "1.", ".1", "alpha..1", "invalid@pre", "00", "beta.01", "a b"] {
            assert!(!is_valid_pre_release(value), "expected '{}' to be invalid", value);
        }
    }

    #[test]
    fn test_valid_build_metadata() {
        for value in ["001", "exp.sha.5114f85", "20130313144700", "build-7", "0.0"] {
            assert!(is_valid_build_metadata(value), "expected '{}' to be valid", value);
        }
    }

    #[test]
    fn test_invalid_build_metadata() {
        for value in ["", "a.", ".a", "a..b", "invalid@meta", "meta+data"] {
            assert!(!is_valid_build_metadata(value), "expected '{}' to be invalid", value);
        }
    }

    #[test]
    fn test_release_outranks_pre_release() {
        assert_eq!(compare_pre_release("", "alpha"), Ordering::Greater);
        assert_eq!(compare_pre_release("alpha", ""), Ordering::Less);
        assert_eq!(compare_pre_release("", ""), Ordering::Equal);
    }

    #[test]
    fn test_numeric_compared_as_integers() {
        assert_eq!(compare_pre_release("rc.1", "rc.10"), Ordering::Less);
        assert_eq!(compare_pre_release("rc.9", "rc.10"), Ordering::Less);
        assert_eq!(compare_pre_release("1.0.1", "1.0.0"), Ordering::Greater);
    }

    #[test]
    fn test_numeric_wider_than_u64() {
        assert_eq!(
            compare_pre_release("99999999999999999999999", "100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn test_numeric_below_alphanumeric() {
        assert_eq!(compare_pre_release("1.0", "1.alpha"), Ordering::Less);
        assert_eq!(compare_pre_release("alpha.beta", "alpha.1"), Ordering::Greater);
    }

    #[test]
    fn test_alphanumeric_lexical() {
        assert_eq!(compare_pre_release("alpha", "beta"), Ordering::Less);
        assert_eq!(compare_pre_release("1.beta", "1.alpha"), Ordering::Greater);
        // Bytewise: uppercase sorts before lowercase
        assert_eq!(compare_pre_release("Beta", "alpha"), Ordering::Less);
    }

    #[test]
    fn test_longer_wins_on_shared_prefix() {
        assert_eq!(compare_pre_release("alpha", "alpha.1"), Ordering::Less);
        assert_eq!(compare_pre_release("1.alpha.1", "1.alpha"), Ordering::Greater);
    }

    #[test]
    fn test_semver_org_example_chain() {
        let chain = [
            "alpha",
            "alpha.1",
            "alpha.beta",
            "beta",
            "beta.2",
            "beta.11",
            "rc.1",
        ];
        for pair in chain.windows(2) {
            assert_eq!(
                compare_pre_release(pair[0], pair[1]),
                Ordering::Less,
                "{} should precede {}",
                pair[0],
                pair[1]
            );
        }
    }
}
