//! cleancss CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: pull the `-O<n>` level flags
//! out of the raw arguments, parse the rest, run, and exit with the status the
//! run reported. For programmatic use, prefer the library API (`cleancss::api`).

use std::process::ExitCode;

use clap::Parser;

mod cli;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let raw = std::env::args_os().map(|a| a.to_string_lossy().into_owned());
    let (levels, rest) = cli::split_level_flags(raw);
    let args = cli::CliArgs::parse_from(rest);
    cli::run(args, levels)
}
