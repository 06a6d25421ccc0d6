//! `get`, `set`, `increment` and `compare`: commands on a single version string
//!
//! Exit codes: 0 on success (or a true comparison), 1 for a false comparison
//! or a rejected `set` value, 2 when an argument is not a valid version.

use std::process::ExitCode;

use crate::domain::{Version, VersionBump};
use crate::error::{Result, SemverGitError};
use crate::ui;

use super::{CompareOp, Field};

const EXIT_FALSE: u8 = 1;
const EXIT_USAGE: u8 = 2;

/// Render a single field of `version`
pub fn get_field(version: &Version, field: Field) -> String {
    match field {
        Field::Major => version.major().to_string(),
        Field::Minor => version.minor().to_string(),
        Field::Patch => version.patch().to_string(),
        Field::Prerelease => version.pre_release().to_string(),
        Field::Buildmetadata => version.build_metadata().to_string(),
    }
}

/// Replace a single field of `version`.
///
/// Numeric fields must be non-negative integers; prerelease and build
/// metadata go through the validating setters, so an empty value clears them.
pub fn set_field(version: &Version, field: Field, value: &str) -> Result<Version> {
    let number = || {
        value.parse::<u64>().map_err(|e| {
            SemverGitError::validation(format!("invalid {} '{}': {}", field, value, e))
        })
    };

    match field {
        Field::Major => Ok(version.with_major(number()?)),
        Field::Minor => Ok(version.with_minor(number()?)),
        Field::Patch => Ok(version.with_patch(number()?)),
        Field::Prerelease => version.with_pre_release(value),
        Field::Buildmetadata => version.with_build_metadata(value),
    }
}

/// Evaluate `lhs <op> rhs` under SemVer precedence
pub fn compare(op: CompareOp, lhs: &Version, rhs: &Version) -> bool {
    let ordering = lhs.compare(rhs);
    match op {
        CompareOp::Gt => ordering.is_gt(),
        CompareOp::Gte => ordering.is_ge(),
        CompareOp::Eq => ordering.is_eq(),
        CompareOp::Lt => ordering.is_lt(),
        CompareOp::Lte => ordering.is_le(),
    }
}

/// Parse a version argument, reporting the failure on stderr
fn parse_arg(command: &str, arg_name: &str, input: &str) -> std::result::Result<Version, ExitCode> {
    Version::parse(input).map_err(|e| {
        ui::display_error(&format!(
            "{} command: error parsing {} '{}': {}",
            command, arg_name, input, e
        ));
        ExitCode::from(EXIT_USAGE)
    })
}

pub fn run_get(field: Field, input: &str) -> ExitCode {
    match parse_arg(&format!("get {}", field), "version", input) {
        Ok(version) => {
            println!("{}", get_field(&version, field));
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

pub fn run_set(field: Field, input: &str, value: &str) -> ExitCode {
    let command = format!("set {}", field);
    let version = match parse_arg(&command, "version", input) {
        Ok(version) => version,
        Err(code) => return code,
    };

    match set_field(&version, field, value) {
        Ok(updated) => {
            println!("{}", updated);
            ExitCode::SUCCESS
        }
        Err(e) => {
            ui::display_error(&format!("{}: {}", command, e));
            ExitCode::from(EXIT_FALSE)
        }
    }
}

pub fn run_increment(part: VersionBump, input: &str) -> ExitCode {
    match parse_arg(&format!("increment {}", part), "version", input) {
        Ok(version) => {
            println!("{}", version.bump(part));
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

pub fn run_compare(op: CompareOp, first: &str, second: &str) -> ExitCode {
    let command = format!("compare {}", op);
    let lhs = match parse_arg(&command, "version1", first) {
        Ok(version) => version,
        Err(code) => return code,
    };
    let rhs = match parse_arg(&command, "version2", second) {
        Ok(version) => version,
        Err(code) => return code,
    };

    if compare(op, &lhs, &rhs) {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FALSE)
    }
}
