//! Core building blocks: run configuration, pattern expansion, the
//! compatibility mini-language and the built-in engine. These are consumed by
//! the high-level `api` module and the CLI.
pub mod compatibility;
pub mod engine;
pub mod params;
pub mod patterns;
