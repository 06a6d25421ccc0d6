use std::process::ExitCode;

use clap::Parser;

use semver_git::cli::{self, Args};
use semver_git::logging;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);
    cli::run(args)
}
