use thiserror::Error;

/// Unified error type for semver-git operations
#[derive(Error, Debug)]
pub enum SemverGitError {
    #[error("Version parsing error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("No version available: {0}")]
    NoVersion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in semver-git
pub type Result<T> = std::result::Result<T, SemverGitError>;

impl SemverGitError {
    /// Create a parse error for a malformed version string
    pub fn parse(msg: impl Into<String>) -> Self {
        SemverGitError::Parse(msg.into())
    }

    /// Create a validation error for a rejected prerelease or build value
    pub fn validation(msg: impl Into<String>) -> Self {
        SemverGitError::Validation(msg.into())
    }

    /// Create a repository error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        SemverGitError::Repository(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SemverGitError::Config(msg.into())
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, SemverGitError::Parse(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SemverGitError::Validation(_))
    }

    /// True for failures that came from the repository collaborator,
    /// whether raised by libgit2 directly or wrapped with context.
    pub fn is_repository(&self) -> bool {
        matches!(self, SemverGitError::Git(_) | SemverGitError::Repository(_))
    }
}
