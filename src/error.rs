//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, glob and HTTP errors. Per-unit minification
//! problems are not errors here; they travel inside `MinificationResult`.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },
}
