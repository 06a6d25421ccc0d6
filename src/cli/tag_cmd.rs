//! `fetch-tag` and `create-tag`: commands against a git repository
//!
//! Both print a single JSON document on stdout. Failures are reported as
//! `{"error": "..."}` with exit code 1.

use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::config::Config;
use crate::domain::{Version, VersionBump};
use crate::git::{Git2Repository, Repository};
use crate::resolver::{create_version_tag, find_version_tag_with, next_version, SearchMode};
use crate::ui::{self, TagReport};

use super::{CreateTagArgs, FetchTagArgs};

/// Message printed when no tag qualifies
pub const NO_MATCHING_TAG: &str = "No matching version tag found.";

const EXIT_FAILURE: u8 = 1;

fn fail(err: &anyhow::Error) -> ExitCode {
    ui::print_error(&format!("{:#}", err));
    ExitCode::from(EXIT_FAILURE)
}

/// Print `report`; an encoding failure still exits 1
fn report_exit_code(report: &TagReport) -> ExitCode {
    if ui::print_report(report) {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FAILURE)
    }
}

fn open_repository(path: &str) -> Result<Git2Repository> {
    Git2Repository::open(path).context("failed to open repository")
}

/// Search mode for `fetch-tag`: `--exact` wins, then `--search`, then config
fn fetch_search_mode(args: &FetchTagArgs, config: &Config) -> SearchMode {
    if args.exact {
        SearchMode::Exact
    } else {
        args.search.unwrap_or(config.search)
    }
}

/// Locate the version tag for `args.commit`; `Ok(None)` when none qualifies
pub fn fetch_tag_report<R: Repository + ?Sized>(
    repo: &R,
    args: &FetchTagArgs,
    config: &Config,
) -> Result<Option<TagReport>> {
    let prefix = args.prefix.as_deref().unwrap_or(&config.prefix);
    let mode = fetch_search_mode(args, config);

    let commit = repo
        .resolve_commit(&args.commit)
        .context("failed to fetch commit object")?;

    let found = find_version_tag_with(repo, &commit, prefix, mode)
        .context("failed to fetch version tag")?;

    Ok(found.map(|tag| {
        TagReport::new(tag.name, tag.version.to_string(), tag.commit.id.to_string())
    }))
}

pub fn fetch_tag(args: &FetchTagArgs, config: &Config) -> ExitCode {
    let report = open_repository(&args.repo).and_then(|repo| fetch_tag_report(&repo, args, config));

    match report {
        Ok(Some(report)) => report_exit_code(&report),
        Ok(None) => fail(&anyhow!(NO_MATCHING_TAG)),
        Err(e) => fail(&e),
    }
}

/// Version to start from when the commit has no previous tag
fn initial_version(args: &CreateTagArgs, config: &Config) -> Result<Version> {
    if !args.create_initial_version {
        return Err(anyhow!(
            "No previous version tag found and create-initial-version is false."
        ));
    }

    let initial = args
        .initial_version
        .as_deref()
        .or(config.initial_version.as_deref())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            anyhow!("initial-version must be specified when create-initial-version is true")
        })?;

    Version::parse(initial).context("failed to parse initial version")
}

/// Compute, create and optionally push the next version tag for `args.commit`
pub fn create_tag_report<R: Repository + ?Sized>(
    repo: &R,
    args: &CreateTagArgs,
    config: &Config,
) -> Result<TagReport> {
    let prefix = args.prefix.as_deref().unwrap_or(&config.prefix);
    let mode = args.search.unwrap_or(config.search);
    let annotated = args.annotated || config.annotated;
    let upstream = args.upstream.as_deref().unwrap_or(&config.remote);
    let bump = match args.increment_type.as_deref() {
        Some(value) => value.parse::<VersionBump>()?,
        None => config.increment,
    };

    let commit = repo
        .resolve_commit(&args.commit)
        .context("failed to fetch commit object")?;

    // A failed lookup is treated like an untagged history
    let previous = match find_version_tag_with(repo, &commit, prefix, mode) {
        Ok(found) => found,
        Err(e) => {
            warn!(error = %e, "previous version lookup failed");
            None
        }
    };

    let initial = match &previous {
        Some(tag) => {
            debug!(tag = %tag.name, "found previous version tag");
            None
        }
        None => Some(initial_version(args, config)?),
    };

    let version = next_version(
        previous.as_ref().map(|tag| &tag.version),
        bump,
        initial.as_ref(),
        args.prerelease.as_deref().unwrap_or_default(),
        args.build_metadata.as_deref().unwrap_or_default(),
    )?;

    let tag = create_version_tag(repo, &commit, &version, prefix, annotated)
        .context("failed to create new tag")?;

    let report = TagReport::new(&tag, version.to_string(), commit.id.to_string());
    if !args.push {
        return Ok(report);
    }

    repo.push_tag(upstream, &tag)?;
    Ok(report.with_push(upstream))
}

pub fn create_tag(args: &CreateTagArgs, config: &Config) -> ExitCode {
    let report =
        open_repository(&args.repo).and_then(|repo| create_tag_report(&repo, args, config));

    match report {
        Ok(report) => report_exit_code(&report),
        Err(e) => fail(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{CommitInfo, MockRepository};
    use git2::Oid;

    fn linear_repo() -> (MockRepository, Vec<CommitInfo>) {
        let mut repo = MockRepository::new();
        let mut commits: Vec<CommitInfo> = Vec::new();
        for i in 1..=3u8 {
            let parents: Vec<Oid> = commits.last().map(|c| c.id).into_iter().collect();
            commits.push(repo.add_commit(MockRepository::oid(i), i as i64 * 100, &parents));
        }
        (repo, commits)
    }

    fn fetch_args() -> FetchTagArgs {
        FetchTagArgs {
            repo: ".".to_string(),
            commit: "HEAD".to_string(),
            prefix: None,
            exact: false,
            search: None,
        }
    }

    fn create_args() -> CreateTagArgs {
        CreateTagArgs {
            repo: ".".to_string(),
            commit: "HEAD".to_string(),
            prefix: None,
            search: None,
            increment_type: None,
            annotated: false,
            prerelease: None,
            build_metadata: None,
            push: false,
            upstream: None,
            create_initial_version: false,
            initial_version: None,
        }
    }

    #[test]
    fn test_fetch_tag_report() {
        let (mut repo, commits) = linear_repo();
        repo.add_tag("v1.0.0", commits[0].id);

        let report = fetch_tag_report(&repo, &fetch_args(), &Config::default())
            .unwrap()
            .unwrap();
        assert_eq!(report.tag, "v1.0.0");
        assert_eq!(report.version, "1.0.0");
        assert_eq!(report.commit, commits[0].id.to_string());
        assert_eq!(report.pushed, None);
    }

    #[test]
    fn test_printed_report_exits_success() {
        let report = TagReport::new("v1.0.0", "1.0.0", "abc123");
        assert!(report_exit_code(&report) == ExitCode::SUCCESS);
    }

    #[test]
    fn test_fetch_tag_exact_flag_overrides_config() {
        let (mut repo, commits) = linear_repo();
        repo.add_tag("v1.0.0", commits[0].id);

        let args = FetchTagArgs {
            exact: true,
            ..fetch_args()
        };
        assert!(fetch_tag_report(&repo, &args, &Config::default()).unwrap().is_none());
    }

    #[test]
    fn test_fetch_tag_prefix_from_config() {
        let (mut repo, commits) = linear_repo();
        repo.add_tag("v2.0.0", commits[2].id);
        repo.add_tag("release/v1.0.0", commits[1].id);

        let config = Config {
            prefix: "release".to_string(),
            ..Config::default()
        };
        let report = fetch_tag_report(&repo, &fetch_args(), &config).unwrap().unwrap();
        assert_eq!(report.tag, "release/v1.0.0");

        let args = FetchTagArgs {
            prefix: Some(String::new()),
            ..fetch_args()
        };
        let report = fetch_tag_report(&repo, &args, &config).unwrap().unwrap();
        assert_eq!(report.tag, "v2.0.0");
    }

    #[test]
    fn test_fetch_tag_unknown_commit() {
        let (repo, _) = linear_repo();
        let args = FetchTagArgs {
            commit: "non-existent-ref".to_string(),
            ..fetch_args()
        };
        let err = fetch_tag_report(&repo, &args, &Config::default()).unwrap_err();
        assert!(format!("{:#}", err).starts_with("failed to fetch commit object"));
    }

    #[test]
    fn test_create_tag_bumps_previous() {
        let (mut repo, commits) = linear_repo();
        repo.add_tag("v1.4.0-alpha.1", commits[1].id);

        let args = CreateTagArgs {
            increment_type: Some("minor".to_string()),
            ..create_args()
        };
        let report = create_tag_report(&repo, &args, &Config::default()).unwrap();
        assert_eq!(report.tag, "v1.5.0");
        assert_eq!(report.commit, commits[2].id.to_string());
        assert_eq!(repo.find_tag("v1.5.0").unwrap().commit, commits[2].id);
    }

    #[test]
    fn test_create_tag_increment_from_config() {
        let (mut repo, commits) = linear_repo();
        repo.add_tag("v1.0.0", commits[0].id);

        let config = Config {
            increment: VersionBump::Major,
            ..Config::default()
        };
        let report = create_tag_report(&repo, &create_args(), &config).unwrap();
        assert_eq!(report.version, "2.0.0");
    }

    #[test]
    fn test_create_tag_invalid_increment_type() {
        let (mut repo, commits) = linear_repo();
        repo.add_tag("v1.0.0", commits[0].id);

        let args = CreateTagArgs {
            increment_type: Some("huge".to_string()),
            ..create_args()
        };
        assert!(create_tag_report(&repo, &args, &Config::default()).is_err());
    }

    #[test]
    fn test_create_tag_without_previous_requires_opt_in() {
        let (repo, _) = linear_repo();
        let err = create_tag_report(&repo, &create_args(), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("create-initial-version is false"));

        let args = CreateTagArgs {
            create_initial_version: true,
            ..create_args()
        };
        let err = create_tag_report(&repo, &args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("initial-version must be specified"));
    }

    #[test]
    fn test_create_tag_initial_version() {
        let (repo, _) = linear_repo();
        let args = CreateTagArgs {
            create_initial_version: true,
            initial_version: Some("0.1.0".to_string()),
            prefix: Some("release".to_string()),
            annotated: true,
            ..create_args()
        };
        let report = create_tag_report(&repo, &args, &Config::default()).unwrap();
        assert_eq!(report.tag, "release/v0.1.0");

        let annotation = repo.find_tag("release/v0.1.0").unwrap().annotation.unwrap();
        assert_eq!(annotation.message, "Version 0.1.0");
    }

    #[test]
    fn test_create_tag_initial_version_from_config() {
        let (repo, _) = linear_repo();
        let config = Config {
            initial_version: Some("1.0.0".to_string()),
            ..Config::default()
        };
        let args = CreateTagArgs {
            create_initial_version: true,
            ..create_args()
        };
        assert_eq!(create_tag_report(&repo, &args, &config).unwrap().tag, "v1.0.0");
    }

    #[test]
    fn test_create_tag_pre_release_and_build() {
        let (mut repo, commits) = linear_repo();
        repo.add_tag("v1.0.0", commits[0].id);

        let args = CreateTagArgs {
            increment_type: Some("minor".to_string()),
            prerelease: Some("rc.1".to_string()),
            build_metadata: Some("meta.456".to_string()),
            ..create_args()
        };
        let report = create_tag_report(&repo, &args, &Config::default()).unwrap();
        assert_eq!(report.tag, "v1.1.0-rc.1+meta.456");
    }

    #[test]
    fn test_create_tag_push() {
        let (mut repo, commits) = linear_repo();
        repo.add_tag("v1.0.0", commits[0].id);

        let args = CreateTagArgs {
            push: true,
            upstream: Some("upstream".to_string()),
            ..create_args()
        };
        let report = create_tag_report(&repo, &args, &Config::default()).unwrap();
        assert_eq!(report.pushed, Some(true));
        assert_eq!(report.upstream.as_deref(), Some("upstream"));
        assert_eq!(
            repo.pushed(),
            vec![("upstream".to_string(), "v1.0.1".to_string())]
        );
    }

    #[test]
    fn test_create_tag_lookup_failure_falls_back_to_initial() {
        let (mut repo, _) = linear_repo();
        repo.fail_tag_listing();
        let args = CreateTagArgs {
            create_initial_version: true,
            initial_version: Some("0.1.0".to_string()),
            ..create_args()
        };
        assert_eq!(create_tag_report(&repo, &args, &Config::default()).unwrap().tag, "v0.1.0");
    }
}
