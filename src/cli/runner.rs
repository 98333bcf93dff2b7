use std::io::{IsTerminal, Read};
use std::process::ExitCode;

use clap::CommandFactory;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cleancss::core::engine::BasicMinifier;
use cleancss::core::patterns::expand_patterns;
use cleancss::io::feedback::Reporter;
use cleancss::{OptimizationLevels, RunInputs};

use super::args::CliArgs;
use super::errors::AppError;
use super::translate::translate;

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(args: CliArgs, levels: OptimizationLevels) -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_logging(args.debug);

    let cwd = std::env::current_dir().map_err(AppError::CurrentDir)?;
    let translation = translate(args, levels, &cwd)?;
    let config = translation.config;

    if let Ok(json) = serde_json::to_string(&config) {
        debug!("Configuration: {}", json);
    }

    let stderr = std::io::stderr();
    let mut reporter = Reporter::new(stderr.lock(), config.debug);
    for warning in &translation.warnings {
        reporter.warning(warning)?;
    }

    let inputs = if translation.inputs.is_empty() {
        let mut stdin = std::io::stdin();
        if stdin.is_terminal() {
            CliArgs::command().print_help()?;
            return Ok(ExitCode::SUCCESS);
        }
        let mut payload = String::new();
        stdin.read_to_string(&mut payload).map_err(AppError::Io)?;
        info!("Read {} bytes from stdin", payload.len());
        RunInputs::Piped(payload)
    } else {
        let files = expand_patterns(&translation.inputs).map_err(AppError::Library)?;
        debug!("Expanded inputs: {:?}", files);
        RunInputs::Files(files)
    };

    let minifier = BasicMinifier::new(cwd);
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    let outcome = cleancss::api::run(&minifier, &config, &inputs, &mut stdout, &mut reporter)
        .map_err(AppError::Library)?;

    Ok(ExitCode::from(outcome.exit_code()))
}
