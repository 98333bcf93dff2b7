//! High-level run orchestration: invoke a [`Minifier`] once, pick merge or
//! batch dispatch from the shape of its output, and hand every record to the
//! reporter and the output writer. Prefer these entry points over the
//! lower-level modules when embedding cleancss.
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::engine::Minifier;
use crate::core::params::Configuration;
use crate::error::Result;
use crate::io::feedback::{Outcome, Reporter};
use crate::io::writers::output::write_result;
use crate::types::{MinificationResult, MinifyOutput, RunInputs};

/// Output path for one batch input: the suffix goes right before the final
/// extension (`a/b.min.css` + `-min` -> `a/b.min-min.css`).
pub fn batch_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    input.with_file_name(name)
}

/// Read the input source map; failure is reported and treated as no map.
pub fn load_input_source_map<E: Write>(
    config: &Configuration,
    reporter: &mut Reporter<E>,
) -> Result<Option<String>> {
    let Some(path) = config.input_source_map.as_deref() else {
        return Ok(None);
    };
    match fs::read_to_string(path) {
        Ok(map) => Ok(Some(map)),
        Err(e) => {
            warn!("Cannot read input source map {:?}: {}", path, e);
            reporter.warning(&format!(
                "Failed to read input source map {}: {}",
                path.display(),
                e
            ))?;
            Ok(None)
        }
    }
}

/// Run one minification pass and dispatch every result.
pub fn run<M, W, E>(
    minifier: &M,
    config: &Configuration,
    inputs: &RunInputs,
    stdout: &mut W,
    reporter: &mut Reporter<E>,
) -> Result<Outcome>
where
    M: Minifier + ?Sized,
    W: Write,
    E: Write,
{
    let input_map = load_input_source_map(config, reporter)?;
    let output = minifier.minify(config, inputs, input_map.as_deref())?;
    dispatch(output, config, stdout, reporter)
}

/// Report and write every record, never stopping at a failed one.
pub fn dispatch<W: Write, E: Write>(
    output: MinifyOutput,
    config: &Configuration,
    stdout: &mut W,
    reporter: &mut Reporter<E>,
) -> Result<Outcome> {
    match output {
        MinifyOutput::Single(result) => {
            debug!("Dispatching merged result");
            dispatch_one(&result, None, config.output.as_deref(), config, stdout, reporter)
        }
        MinifyOutput::Batch(results) => {
            debug!("Dispatching {} batch results", results.len());
            let mut outcome = Outcome::Success;
            for (input, result) in &results {
                let target = batch_output_path(input, &config.batch_suffix);
                let unit = dispatch_one(result, Some(input), Some(&target), config, stdout, reporter)?;
                outcome = outcome.max(unit);
            }
            Ok(outcome)
        }
    }
}

fn dispatch_one<W: Write, E: Write>(
    result: &MinificationResult,
    label: Option<&Path>,
    target: Option<&Path>,
    config: &Configuration,
    stdout: &mut W,
    reporter: &mut Reporter<E>,
) -> Result<Outcome> {
    let outcome = reporter.report(label, result)?;
    if outcome == Outcome::Failure {
        debug!("Not writing output for {:?}: unit reported errors", label);
        return Ok(outcome);
    }
    write_result(result, target, config.remove_inlined_files, stdout)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    #[test]
    fn batch_paths_insert_suffix_before_final_extension() {
        assert_eq!(batch_output_path(Path::new("styles.css"), "-min"), PathBuf::from("styles-min.css"));
        assert_eq!(batch_output_path(Path::new("a/b.min.css"), "-min"), PathBuf::from("a/b.min-min.css"));
        assert_eq!(batch_output_path(Path::new("a/noext"), ".out"), PathBuf::from("a/noext.out"));
    }

    struct Canned {
        output: MinifyOutput,
        calls: Cell<usize>,
    }

    impl Minifier for Canned {
        fn minify(&self, _: &Configuration, _: &RunInputs, _: Option<&str>) -> Result<MinifyOutput> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.output.clone())
        }
    }

    fn ok(styles: &str) -> MinificationResult {
        MinificationResult {
            styles: styles.into(),
            ..MinificationResult::default()
        }
    }

    fn failed(message: &str) -> MinificationResult {
        MinificationResult {
            errors: vec![message.into()],
            ..MinificationResult::default()
        }
    }

    #[test]
    fn single_result_goes_to_stdout_once() {
        let canned = Canned {
            output: MinifyOutput::Single(ok("a{}")),
            calls: Cell::new(0),
        };
        let mut stdout = Vec::new();
        let mut reporter = Reporter::new(Vec::new(), false);
        let outcome = run(
            &canned,
            &Configuration::default(),
            &RunInputs::Piped("a { }".into()),
            &mut stdout,
            &mut reporter,
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(canned.calls.get(), 1);
        assert_eq!(stdout, b"a{}");
    }

    #[test]
    fn batch_failure_does_not_stop_other_units() {
        let dir = TempDir::new().unwrap();
        let one = dir.path().join("one.css");
        let two = dir.path().join("two.css");
        let three = dir.path().join("three.css");
        let canned = Canned {
            output: MinifyOutput::Batch(vec![
                (one.clone(), ok("a{}")),
                (two.clone(), failed("broken")),
                (three.clone(), ok("c{}")),
            ]),
            calls: Cell::new(0),
        };
        let config = Configuration {
            batch: true,
            ..Configuration::default()
        };
        let mut reporter = Reporter::new(Vec::new(), false);
        let outcome = run(
            &canned,
            &config,
            &RunInputs::Files(vec![one, two, three]),
            &mut Vec::new(),
            &mut reporter,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Failure);
        assert_eq!(fs::read_to_string(dir.path().join("one-min.css")).unwrap(), "a{}");
        assert!(!dir.path().join("two-min.css").exists());
        assert_eq!(fs::read_to_string(dir.path().join("three-min.css")).unwrap(), "c{}");
        let diagnostics = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(diagnostics, "ERROR: broken\n");
    }

    #[test]
    fn warnings_only_run_succeeds() {
        let canned = Canned {
            output: MinifyOutput::Single(MinificationResult {
                warnings: vec!["careful".into()],
                ..ok("a{}")
            }),
            calls: Cell::new(0),
        };
        let mut reporter = Reporter::new(Vec::new(), false);
        let outcome = run(
            &canned,
            &Configuration::default(),
            &RunInputs::Piped(String::new()),
            &mut Vec::new(),
            &mut reporter,
        )
        .unwrap();
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn unreadable_input_map_is_reported_and_dropped() {
        let config = Configuration {
            input_source_map: Some(PathBuf::from("/definitely/missing.map")),
            ..Configuration::default()
        };
        let mut reporter = Reporter::new(Vec::new(), false);
        let map = load_input_source_map(&config, &mut reporter).unwrap();
        assert_eq!(map, None);
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.starts_with("WARNING: Failed to read input source map /definitely/missing.map"));
    }
}
