#![doc = r#"
cleancss — a command-line front end for CSS minification.

This crate turns command-line flags and file arguments into one immutable
[`Configuration`], expands input patterns, runs a minifier once per
invocation, and dispatches the result(s): minified text to a file or stdout,
sibling source maps, diagnostics, statistics and an exit status. It powers the
`cleancss` binary and can be embedded in your own Rust applications.

Stability
---------
The public library API is experimental in initial releases and may evolve.

Quick start: minify files into one output
-----------------------------------------
```rust,no_run
use std::path::PathBuf;
use cleancss::{Configuration, RunInputs, Reporter};
use cleancss::core::engine::BasicMinifier;
use cleancss::core::patterns::expand_patterns;

fn main() -> cleancss::Result<()> {
    let config = Configuration {
        output: Some(PathBuf::from("dist/site.css")),
        source_map: true,
        ..Configuration::default()
    };
    let files = expand_patterns(&["styles/*.css", "!styles/legacy.css"])?;

    let mut reporter = Reporter::new(std::io::stderr(), false);
    let outcome = cleancss::api::run(
        &BasicMinifier::new("."),
        &config,
        &RunInputs::Files(files),
        &mut std::io::stdout(),
        &mut reporter,
    )?;
    std::process::exit(outcome.exit_code().into());
}
```

Batch mode
----------
With `batch: true` every input is minified on its own and written next to
the input with the batch suffix inserted before the extension:

```rust
use std::path::{Path, PathBuf};
use cleancss::api::batch_output_path;

assert_eq!(batch_output_path(Path::new("a/b.min.css"), "-min"), PathBuf::from("a/b.min-min.css"));
```

Compatibility options
---------------------
```rust
use cleancss::core::compatibility::{apply, default_tree};

let mut tree = default_tree();
apply("selectors.adjacentSpace=on;bogus.path=x", &mut tree);
assert_eq!(tree["selectors"]["adjacentSpace"], "on");
```

Bring your own minifier
-----------------------
Implement [`core::engine::Minifier`] and return `MinifyOutput::Single` for a
merged result or `MinifyOutput::Batch` for per-input results.

Error handling
--------------
All fallible public functions return `cleancss::Result<T>`; match on
`cleancss::Error` to handle specific cases. Per-unit minification errors are
not `Err`s: they travel inside `MinificationResult::errors` and turn the run's
[`Outcome`] into a failure.

Useful modules
--------------
- [`api`] — run orchestration and batch output naming.
- [`core`] — configuration, pattern expansion, compatibility options, built-in engine.
- [`io`] — output writer, diagnostics reporter, remote fetching.
- [`types`] — levels, results and run inputs.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
pub use core::params::Configuration;
pub use error::{Error, Result};
pub use io::feedback::{Outcome, Reporter};
pub use types::{
    BatchResultSet, Compatibility, LevelValue, MinificationResult, MinifyOutput,
    OptimizationLevels, RunInputs, Stats,
};

pub use api::{batch_output_path, dispatch, load_input_source_map, run};
pub use core::engine::{BasicMinifier, Minifier};
