//! SemVer 2.0.0 parsing, precedence and bumping, plus resolution and
//! creation of version tags in git repositories.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod logging;
pub mod resolver;
pub mod ui;

pub use domain::{Version, VersionBump};
pub use error::{Result, SemverGitError};
pub use resolver::{
    create_version_tag, find_version_tag, find_version_tag_with, next_version, SearchMode,
    VersionTag,
};
