//! Domain logic - pure version rules independent of git operations

pub mod prerelease;
pub mod tag;
pub mod version;

pub use tag::{annotation_message, TagPrefix};
pub use version::{Version, VersionBump};
