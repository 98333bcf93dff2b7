//! Second half of argument handling: turns parsed flags plus the level flags
//! from the first pass into an immutable `Configuration`.
use std::path::{Path, PathBuf};

use cleancss::core::compatibility;
use cleancss::{Compatibility, Configuration, LevelValue, OptimizationLevels};

use super::args::CliArgs;
use super::errors::AppError;

pub const SOURCE_MAP_WITHOUT_OUTPUT: &str =
    "Source maps will not be generated because the output path was not given";

/// Configuration plus anything the user should hear about before the run.
#[derive(Debug)]
pub struct Translation {
    pub config: Configuration,
    pub inputs: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn translate(
    args: CliArgs,
    levels: OptimizationLevels,
    cwd: &Path,
) -> Result<Translation, AppError> {
    let mut warnings = Vec::new();

    let level = if levels.is_empty() {
        OptimizationLevels {
            level1: Some(LevelValue::Flag(true)),
            ..OptimizationLevels::default()
        }
    } else {
        levels
    };

    let compatibility = match args.compatibility {
        Some(descriptor) if compatibility::is_option_string(&descriptor) => {
            let mut tree = compatibility::default_tree();
            compatibility::apply(&descriptor, &mut tree);
            Compatibility::Tree(tree)
        }
        Some(preset) => Compatibility::Preset(preset),
        None => Compatibility::default(),
    };

    let inline_timeout_ms = seconds_to_millis(args.inline_timeout)?;

    let rebase_to = rebase_target(args.with_rebase, args.output.as_deref(), cwd);

    let mut source_map = args.source_map || args.input_source_map.is_some();
    if source_map && args.output.is_none() {
        warnings.push(SOURCE_MAP_WITHOUT_OUTPUT.to_string());
        source_map = false;
    }

    let config = Configuration {
        level,
        compatibility,
        inline: args.inline,
        inline_timeout_ms,
        output: args.output,
        rebase: args.with_rebase,
        rebase_to,
        source_map,
        source_map_inline_sources: args.source_map_inline_sources,
        input_source_map: args.input_source_map,
        format: args.format,
        batch: args.batch,
        batch_suffix: args.batch_suffix,
        debug: args.debug,
        remove_inlined_files: args.remove_inlined_files,
    };

    Ok(Translation {
        config,
        inputs: args.inputs,
        warnings,
    })
}

fn seconds_to_millis(seconds: f64) -> Result<u64, AppError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(AppError::InvalidTimeout { value: seconds });
    }
    Ok((seconds * 1000.0).round() as u64)
}

fn rebase_target(rebase: bool, output: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if !rebase {
        return None;
    }
    match output {
        Some(output) => {
            let resolved = cwd.join(output);
            Some(
                resolved
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.to_path_buf()),
            )
        }
        None => Some(cwd.to_path_buf()),
    }
}
