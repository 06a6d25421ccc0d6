//! Pure formatting functions for UI output.
//!
//! Human-facing messages go to stderr; the JSON documents built here are
//! what the tag commands print on stdout.

use serde::Serialize;

use crate::error::Result;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Result document of `fetch-tag` and `create-tag`.
///
/// `pushed` and `upstream` are only present when a push was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagReport {
    pub tag: String,
    pub version: String,
    pub commit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pushed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
}

impl TagReport {
    pub fn new(
        tag: impl Into<String>,
        version: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        TagReport {
            tag: tag.into(),
            version: version.into(),
            commit: commit.into(),
            pushed: None,
            upstream: None,
        }
    }

    /// Mark the report as pushed to `upstream`
    pub fn with_push(mut self, upstream: impl Into<String>) -> Self {
        self.pushed = Some(true);
        self.upstream = Some(upstream.into());
        self
    }

    /// Encode as a single-line JSON object
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Serialize)]
struct ErrorReport<'a> {
    error: &'a str,
}

/// Encode `{"error": message}` as a single-line JSON object
pub fn error_json(message: &str) -> String {
    serde_json::to_string(&ErrorReport { error: message })
        .unwrap_or_else(|_| String::from(r#"{"error":"unencodable error message"}"#))
}
