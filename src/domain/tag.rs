use crate::domain::Version;

/// Tag namespace for version tags, e.g. `release` in `release/v1.2.3`.
///
/// An empty prefix means the whole tag name is the version string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPrefix {
    pub prefix: String,
}

impl TagPrefix {
    /// Create a new tag prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        TagPrefix {
            prefix: prefix.into(),
        }
    }

    /// Extract the candidate version string from a tag name.
    ///
    /// Returns `None` when the prefix is set and the tag does not start with
    /// exactly `prefix/`. No SemVer validation happens here.
    pub fn strip<'a>(&self, tag_name: &'a str) -> Option<&'a str> {
        if self.prefix.is_empty() {
            return Some(tag_name);
        }
        tag_name
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
    }

    /// Tag name for a version: `[prefix/]v<version>`
    /// Example: prefix="release", version=2.0.0+build.1 -> "release/v2.0.0+build.1"
    pub fn format(&self, version: &Version) -> String {
        if self.prefix.is_empty() {
            format!("v{}", version)
        } else {
            format!("{}/v{}", self.prefix, version)
        }
    }
}

/// Message carried by an annotated version tag
pub fn annotation_message(version: &Version) -> String {
    format!("Version {}", version)
}
