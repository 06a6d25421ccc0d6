//! Version tag resolution
//!
//! Finds the tag that carries the applicable version for a commit and mints
//! new version tags. Tags are filtered by prefix, parsed as SemVer, and
//! resolved to commits through the [Repository] collaborator; resolution is
//! memoized only for the duration of a single call.

use crate::domain::{annotation_message, TagPrefix, Version, VersionBump};
use crate::error::{SemverGitError, Result};
use crate::git::{CommitInfo, Repository, TagAnnotation};
use git2::Oid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// How a tag's commit must relate to the target commit to qualify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Tag commit hash equals the target hash; highest version wins
    Exact,
    /// Tag commit timestamp is at or before the target's; latest commit wins,
    /// highest version among tags on that same commit.
    ///
    /// Timestamps stand in for ancestry, so a tag on a commit outside the
    /// target's history can be selected.
    #[default]
    Nearest,
    /// Tag commit is the target or one of its ancestors; then the same
    /// time-then-version preference as [SearchMode::Nearest]
    Ancestor,
}

impl From<bool> for SearchMode {
    /// `true` selects [SearchMode::Exact], `false` [SearchMode::Nearest]
    fn from(exact: bool) -> Self {
        if exact {
            SearchMode::Exact
        } else {
            SearchMode::Nearest
        }
    }
}

impl FromStr for SearchMode {
    type Err = SemverGitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(SearchMode::Exact),
            "nearest" => Ok(SearchMode::Nearest),
            "ancestor" => Ok(SearchMode::Ancestor),
            other => Err(SemverGitError::validation(format!(
                "invalid search mode '{}': must be 'exact', 'nearest', or 'ancestor'",
                other
            ))),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Exact => write!(f, "exact"),
            SearchMode::Nearest => write!(f, "nearest"),
            SearchMode::Ancestor => write!(f, "ancestor"),
        }
    }
}

/// A version tag together with its parsed version and resolved commit
#[derive(Debug, Clone, PartialEq)]
pub struct VersionTag {
    pub name: String,
    pub version: Version,
    pub commit: CommitInfo,
}

impl VersionTag {
    /// Whether `self` should replace `current` as the winner under `mode`
    fn beats(&self, current: &VersionTag, mode: SearchMode) -> bool {
        match mode {
            SearchMode::Exact => self.version > current.version,
            SearchMode::Nearest | SearchMode::Ancestor => {
                if self.commit.time() > current.commit.time() {
                    true
                } else {
                    self.commit.id == current.commit.id && self.version > current.version
                }
            }
        }
    }
}

/// Find the version tag for `target`, with `exact` choosing between exact
/// and nearest matching.
///
/// `Ok(None)` means no tag qualified; only repository failures are errors.
pub fn find_version_tag<R: Repository + ?Sized>(
    repo: &R,
    target: &CommitInfo,
    prefix: &str,
    exact: bool,
) -> Result<Option<VersionTag>> {
    find_version_tag_with(repo, target, prefix, SearchMode::from(exact))
}

/// Find the version tag for `target` under an explicit [SearchMode].
///
/// Tags outside `prefix/` (when a prefix is given), tags whose remainder is
/// not a SemVer string, and tags whose target cannot be resolved are skipped.
/// Failing to enumerate tags, or an ancestry query failing, is an error.
pub fn find_version_tag_with<R: Repository + ?Sized>(
    repo: &R,
    target: &CommitInfo,
    prefix: &str,
    mode: SearchMode,
) -> Result<Option<VersionTag>> {
    let tags = repo.list_tags()?;
    let prefix = TagPrefix::new(prefix);

    // Keyed by the object the tag ref points at, so tags sharing a
    // target are resolved once per call.
    let mut commit_cache: HashMap<Oid, CommitInfo> = HashMap::new();
    let mut found: Option<VersionTag> = None;

    for tag in tags {
        let Some(version_string) = prefix.strip(&tag.name) else {
            continue;
        };

        let version = match Version::parse(version_string) {
            Ok(version) => version,
            Err(_) => {
                debug!(tag = %tag.name, "skipping tag: not a semantic version");
                continue;
            }
        };

        let commit = match commit_cache.get(&tag.target) {
            Some(commit) => commit.clone(),
            None => match repo.resolve_commit(&tag.reference) {
                Ok(commit) => {
                    commit_cache.insert(tag.target, commit.clone());
                    commit
                }
                Err(e) => {
                    warn!(tag = %tag.name, error = %e, "skipping tag: cannot resolve target commit");
                    continue;
                }
            },
        };

        let qualifies = match mode {
            SearchMode::Exact => commit.id == target.id,
            SearchMode::Nearest => commit.time() <= target.time(),
            SearchMode::Ancestor => repo.is_ancestor(commit.id, target.id)?,
        };
        if !qualifies {
            continue;
        }

        let candidate = VersionTag {
            name: tag.name,
            version,
            commit,
        };

        found = match found {
            Some(current) if !candidate.beats(&current, mode) => Some(current),
            _ => Some(candidate),
        };
    }

    match &found {
        Some(tag) => debug!(tag = %tag.name, commit = %tag.commit.id, %mode, "resolved version tag"),
        None => debug!(target = %target.id, %mode, "no matching version tag"),
    }

    Ok(found)
}

/// Create the tag `[prefix/]v<version>` at `target` and return its name.
///
/// Annotated tags carry the message `Version <version>` and use the target
/// commit's committer as tagger. An existing tag of the same name is not
/// checked for up front; the repository's refusal is returned as the error.
pub fn create_version_tag<R: Repository + ?Sized>(
    repo: &R,
    target: &CommitInfo,
    version: &Version,
    prefix: &str,
    annotated: bool,
) -> Result<String> {
    let name = TagPrefix::new(prefix).format(version);
    let annotation = annotated.then(|| TagAnnotation {
        message: annotation_message(version),
        tagger: target.committer.clone(),
    });

    repo.create_tag(&name, target.id, annotation.as_ref())?;

    info!(tag = %name, commit = %target.id, annotated, "created version tag");
    Ok(name)
}

/// Compute the version for a new tag.
///
/// Bumps `previous` when there is one, otherwise falls back to `initial`.
/// Non-empty `pre_release` and `build_metadata` are then applied through
/// the validating setters.
pub fn next_version(
    previous: Option<&Version>,
    bump: VersionBump,
    initial: Option<&Version>,
    pre_release: &str,
    build_metadata: &str,
) -> Result<Version> {
    let mut version = match (previous, initial) {
        (Some(previous), _) => previous.bump(bump),
        (None, Some(initial)) => initial.clone(),
        (None, None) => {
            return Err(SemverGitError::NoVersion(
                "no previous version tag found and no initial version given".to_string(),
            ))
        }
    };

    if !pre_release.is_empty() {
        version = version.with_pre_release(pre_release)?;
    }
    if !build_metadata.is_empty() {
        version = version.with_build_metadata(build_metadata)?;
    }

    Ok(version)
}
