//! Built-in minification engine.
//!
//! The orchestration layer only depends on the [`Minifier`] trait; this
//! module provides a conservative implementation so the binary works on its
//! own. It reads and inlines sources, applies the configured levels and
//! format, and produces a source map when asked to.
pub mod imports;
pub mod optimize;
pub mod source_map;

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, warn};

use crate::api::batch_output_path;
use crate::core::params::Configuration;
use crate::error::Result;
use crate::types::{MinificationResult, MinifyOutput, RunInputs, Stats};

use imports::{Loader, normalize, relative_path};
use source_map::{Chunk, SourceMap};

const STDIN_SOURCE: &str = "$stdin";

/// External minifier seam. Called exactly once per run.
pub trait Minifier {
    fn minify(
        &self,
        config: &Configuration,
        inputs: &RunInputs,
        input_source_map: Option<&str>,
    ) -> Result<MinifyOutput>;
}

pub struct BasicMinifier {
    cwd: PathBuf,
}

enum Source<'a> {
    File(&'a Path),
    Text(&'a str),
}

impl BasicMinifier {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    fn process(
        &self,
        config: &Configuration,
        sources: &[Source<'_>],
        output: Option<&Path>,
        input_map: Option<&SourceMap>,
    ) -> MinificationResult {
        let started = Instant::now();
        let mut loader = Loader::new(config, &self.cwd);
        let map_dir = output
            .and_then(|o| normalize(&self.cwd.join(o)).parent().map(Path::to_path_buf))
            .unwrap_or_else(|| self.cwd.clone());
        let separator = if config.format.is_some() { "\n" } else { "" };

        let mut styles = String::new();
        let mut chunks = Vec::new();
        for source in sources {
            let (loaded, name) = match source {
                Source::File(path) => {
                    let Some(loaded) = loader.load_file(path) else {
                        continue;
                    };
                    let name = relative_path(&map_dir, &normalize(&self.cwd.join(path)));
                    (loaded, name)
                }
                Source::Text(text) => (loader.load_text(text), STDIN_SOURCE.to_string()),
            };
            let minified = optimize::optimize(&loaded.expanded, &config.level);
            let formatted = optimize::format(&minified, config.format.as_deref());
            if formatted.is_empty() {
                continue;
            }
            if !styles.is_empty() {
                styles.push_str(separator);
            }
            chunks.push(Chunk {
                source: name,
                content: Some(loaded.raw),
                offset: styles.len(),
            });
            styles.push_str(&formatted);
        }

        if let (Some(input_map), [only]) = (input_map, chunks.as_mut_slice()) {
            if let Some(original) = input_map.sources.first() {
                only.source = original.clone();
                only.content = input_map
                    .sources_content
                    .as_ref()
                    .and_then(|c| c.first().cloned().flatten());
            }
        }

        let source_map = if config.source_map {
            let file = output
                .and_then(Path::file_name)
                .map(|f| f.to_string_lossy().into_owned());
            let map = source_map::build(&styles, file, &chunks, config.source_map_inline_sources);
            match serde_json::to_string(&map) {
                Ok(json) => Some(json),
                Err(e) => {
                    loader.errors.push(format!("Cannot serialize source map: {}", e));
                    None
                }
            }
        } else {
            None
        };

        MinificationResult {
            stats: Stats {
                original_size: loader.original_size,
                minified_size: styles.len(),
                time_spent: started.elapsed(),
            },
            styles,
            source_map,
            errors: loader.errors,
            warnings: loader.warnings,
            inlined: loader.inlined,
        }
    }
}

impl Minifier for BasicMinifier {
    fn minify(
        &self,
        config: &Configuration,
        inputs: &RunInputs,
        input_source_map: Option<&str>,
    ) -> Result<MinifyOutput> {
        let parsed = input_source_map.map(serde_json::from_str::<SourceMap>);
        let (input_map, map_warning) = match parsed {
            Some(Ok(map)) => (Some(map), None),
            Some(Err(e)) => {
                warn!("Input source map is not usable: {}", e);
                (None, Some(format!("Ignoring invalid input source map: {}", e)))
            }
            None => (None, None),
        };

        let mut output = match inputs {
            RunInputs::Piped(text) => {
                debug!("Minifying {} bytes from stdin", text.len());
                MinifyOutput::Single(self.process(
                    config,
                    &[Source::Text(text)],
                    config.output.as_deref(),
                    input_map.as_ref(),
                ))
            }
            RunInputs::Files(files) if config.batch => {
                debug!("Minifying {} files independently", files.len());
                let results = files
                    .iter()
                    .map(|file| {
                        let output = batch_output_path(file, &config.batch_suffix);
                        let result =
                            self.process(config, &[Source::File(file)], Some(&output), input_map.as_ref());
                        (file.clone(), result)
                    })
                    .collect();
                MinifyOutput::Batch(results)
            }
            RunInputs::Files(files) => {
                debug!("Merging {} files", files.len());
                let sources: Vec<Source<'_>> = files.iter().map(|f| Source::File(f)).collect();
                MinifyOutput::Single(self.process(
                    config,
                    &sources,
                    config.output.as_deref(),
                    input_map.as_ref(),
                ))
            }
        };

        if let Some(message) = map_warning {
            for result in results_mut(&mut output) {
                result.warnings.insert(0, message.clone());
            }
        }
        Ok(output)
    }
}

fn results_mut(output: &mut MinifyOutput) -> Vec<&mut MinificationResult> {
    match output {
        MinifyOutput::Single(result) => vec![result],
        MinifyOutput::Batch(results) => results.iter_mut().map(|(_, r)| r).collect(),
    }
}
