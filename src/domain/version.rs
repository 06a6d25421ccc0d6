use crate::domain::prerelease::{
    self, compare_pre_release, BUILD_IDENTIFIER, PRERELEASE_IDENTIFIER,
};
use crate::error::{SemverGitError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

const SEMVER_HELP: &str =
    "please see the formatting requirements at: https://semver.org/#semantic-versioning-specification-semver";

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^v?(?P<major>0|[1-9][0-9]*)\.(?P<minor>0|[1-9][0-9]*)\.(?P<patch>0|[1-9][0-9]*)(?:-(?P<prerelease>{pre}(?:\.{pre})*))?(?:\+(?P<buildmetadata>{build}(?:\.{build})*))?$",
        pre = PRERELEASE_IDENTIFIER,
        build = BUILD_IDENTIFIER,
    ))
    .expect("version pattern")
});

/// Semantic version (SemVer 2.0.0)
///
/// Fields are private: a `Version` only comes out of [`Version::parse`] or
/// one of the mutation methods, each of which returns a fresh value.
/// Equality and ordering ignore build metadata.
#[derive(Debug, Clone, Default)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    pre_release: String,
    build_metadata: String,
}

impl Version {
    /// Create a plain release version with no prerelease or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre_release: String::new(),
            build_metadata: String::new(),
        }
    }

    /// Parse `[v]MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]`.
    ///
    /// The whole string must match; there are no partial results.
    pub fn parse(input: &str) -> Result<Self> {
        let captures = VERSION_PATTERN.captures(input).ok_or_else(|| {
            SemverGitError::parse(format!(
                "unable to parse '{}' as a Semantic Version, {}",
                input, SEMVER_HELP
            ))
        })?;

        let number = |name: &str| -> Result<u64> {
            let digits = &captures[name];
            digits.parse::<u64>().map_err(|_| {
                SemverGitError::parse(format!(
                    "{} component '{}' of '{}' is out of range",
                    name, digits, input
                ))
            })
        };

        Ok(Version {
            major: number("major")?,
            minor: number("minor")?,
            patch: number("patch")?,
            pre_release: captures
                .name("prerelease")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            build_metadata: captures
                .name("buildmetadata")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// Dot-separated prerelease, empty when this is a normal release
    pub fn pre_release(&self) -> &str {
        &self.pre_release
    }

    /// Dot-separated build metadata, empty when absent
    pub fn build_metadata(&self) -> &str {
        &self.build_metadata
    }

    pub fn is_pre_release(&self) -> bool {
        !self.pre_release.is_empty()
    }

    /// Precedence per SemVer 2.0.0: numeric core first, then prerelease.
    /// Build metadata never participates.
    pub fn compare(&self, other: &Version) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| compare_pre_release(&self.pre_release, &other.pre_release))
    }

    /// (major+1).0.0 with prerelease and build metadata cleared
    pub fn bump_major(&self) -> Self {
        Version::new(self.major.saturating_add(1), 0, 0)
    }

    /// major.(minor+1).0 with prerelease and build metadata cleared
    pub fn bump_minor(&self) -> Self {
        Version::new(self.major, self.minor.saturating_add(1), 0)
    }

    /// major.minor.(patch+1) with prerelease and build metadata cleared
    pub fn bump_patch(&self) -> Self {
        Version::new(self.major, self.minor, self.patch.saturating_add(1))
    }

    /// Bump version according to bump type
    pub fn bump(&self, bump_type: VersionBump) -> Self {
        match bump_type {
            VersionBump::Major => self.bump_major(),
            VersionBump::Minor => self.bump_minor(),
            VersionBump::Patch => self.bump_patch(),
        }
    }

    /// Copy of this version with the prerelease replaced.
    ///
    /// An empty value clears the prerelease. Anything else must satisfy the
    /// prerelease grammar or a validation error is returned.
    pub fn with_pre_release(&self, value: &str) -> Result<Self> {
        if !value.is_empty() && !prerelease::is_valid_pre_release(value) {
            return Err(SemverGitError::validation(format!(
                "unable to set '{}' as a PreRelease, {}",
                value, SEMVER_HELP
            )));
        }

        Ok(Version {
            pre_release: value.to_string(),
            ..self.clone()
        })
    }

    /// Copy of this version with the build metadata replaced.
    ///
    /// An empty value clears the build metadata.
    pub fn with_build_metadata(&self, value: &str) -> Result<Self> {
        if !value.is_empty() && !prerelease::is_valid_build_metadata(value) {
            return Err(SemverGitError::validation(format!(
                "unable to set '{}' as a BuildMetadata, {}",
                value, SEMVER_HELP
            )));
        }

        Ok(Version {
            build_metadata: value.to_string(),
            ..self.clone()
        })
    }

    /// Copies with a single numeric field replaced; the other fields,
    /// prerelease and build metadata included, are kept.
    pub fn with_major(&self, major: u64) -> Self {
        Version {
            major,
            ..self.clone()
        }
    }

    pub fn with_minor(&self, minor: u64) -> Self {
        Version {
            minor,
            ..self.clone()
        }
    }

    pub fn with_patch(&self, patch: u64) -> Self {
        Version {
            patch,
            ..self.clone()
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre_release.is_empty() {
            write!(f, "-{}", self.pre_release)?;
        }
        if !self.build_metadata.is_empty() {
            write!(f, "+{}", self.build_metadata)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = SemverGitError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
    Major,
    Minor,
    #[default]
    Patch,
}

impl FromStr for VersionBump {
    type Err = SemverGitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            other => Err(SemverGitError::validation(format!(
                "invalid increment type '{}': must be 'major', 'minor', or 'patch'",
                other
            ))),
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}
