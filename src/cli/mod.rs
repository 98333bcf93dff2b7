//! Command Line Interface (CLI) layer for cleancss.
//!
//! This module defines argument parsing (`args`, including the first pass
//! that pulls `-O<n>` flags out of the raw argument vector), flag translation
//! into a `Configuration` (`translate`), error types (`errors`), and the
//! orchestration logic (`runner`) that reads inputs and dispatches results.
//!
//! If you are embedding cleancss into another application, prefer using
//! the high-level `cleancss::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;
pub mod translate;

pub use args::{CliArgs, split_level_flags};
pub use runner::run;
