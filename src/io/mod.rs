//! I/O layer: output and source-map writers, diagnostic reporting, and
//! remote fetching for `@import` inlining.
pub mod feedback;
pub use feedback::{Outcome, Reporter};

pub mod remote;

pub mod writers;
