use std::path::PathBuf;
use std::sync::LazyLock;

use clap::Parser;
use regex::Regex;

use cleancss::core::params::DEFAULT_BATCH_SUFFIX;
use cleancss::{LevelValue, OptimizationLevels};

const LEVEL_HELP: &str = "\
Optimization levels (read before the other flags):
  -O0                 turn off optimizations
  -O1 [options]       level 1 optimizations, e.g. -O1 specialComments:0
  -O2 [options]       level 2 optimizations, e.g. -O2 removeEmpty:off

A value after -O1/-O2 that looks like a path (contains `.css`, `/`, a
backslash not followed by `-`, or starts with http(s)://) is read as an
input file instead.";

static PATH_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.css|/|\\[^-]|^https?://").expect("static pattern"));

#[derive(Parser, Debug)]
#[command(
    name = "cleancss",
    version,
    about = "Minify CSS files",
    after_help = LEVEL_HELP,
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Input files or glob patterns; prefix with `!` to exclude
    #[arg(value_name = "FILES")]
    pub inputs: Vec<String>,

    /// Process each input independently, writing one output per input
    #[arg(short, long, default_value_t = false)]
    pub batch: bool,

    /// Suffix inserted before the extension of batch outputs
    #[arg(long, default_value = DEFAULT_BATCH_SUFFIX, allow_hyphen_values = true)]
    pub batch_suffix: String,

    /// Compatibility preset (e.g. ie9) or `dotted.key=value` overrides
    #[arg(short, long)]
    pub compatibility: Option<String>,

    /// Print minification statistics and enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,

    /// Formatting options, e.g. keep-breaks or beautify
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Inline rules: local, remote, all, none or host names
    #[arg(long, value_delimiter = ',', default_value = "local")]
    pub inline: Vec<String>,

    /// Remote @import fetch timeout in seconds
    #[arg(long, default_value_t = 5.0)]
    pub inline_timeout: f64,

    /// Source map of the input, applied to the generated map
    #[arg(long)]
    pub input_source_map: Option<PathBuf>,

    /// Delete files that were inlined into the output
    #[arg(long, default_value_t = false)]
    pub remove_inlined_files: bool,

    /// Write a source map next to the output
    #[arg(long, default_value_t = false)]
    pub source_map: bool,

    /// Embed original sources in the source map
    #[arg(long, default_value_t = false)]
    pub source_map_inline_sources: bool,

    /// Rewrite relative URLs against the output location
    #[arg(long, default_value_t = false)]
    pub with_rebase: bool,

    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

/// Whether a token following `-O1`/`-O2` should be left as an input path.
pub fn looks_like_path(token: &str) -> bool {
    PATH_LIKE.is_match(token)
}

/// First pass over the raw argument vector.
///
/// Pulls `-O0`, `-O1 [value]` and `-O2 [value]` out of `argv` and returns them
/// together with the remaining tokens, which are handed to clap. A value is
/// only consumed when it is non-empty and does not look like a path. Tokens
/// starting with `-` are left alone as well: clap owns them as flags.
pub fn split_level_flags<I>(argv: I) -> (OptimizationLevels, Vec<String>)
where
    I: IntoIterator<Item = String>,
{
    let mut levels = OptimizationLevels::default();
    let mut rest = Vec::new();
    let mut tokens = argv.into_iter().peekable();
    let mut positional_only = false;

    while let Some(token) = tokens.next() {
        if positional_only {
            rest.push(token);
            continue;
        }
        match token.as_str() {
            "--" => {
                positional_only = true;
                rest.push(token);
            }
            "-O0" => levels.level0 = Some(true),
            "-O1" | "-O2" => {
                let value = match tokens.peek() {
                    Some(next)
                        if !next.is_empty() && !next.starts_with('-') && !looks_like_path(next) =>
                    {
                        tokens.next().map(LevelValue::Options)
                    }
                    _ => None,
                };
                let value = value.unwrap_or(LevelValue::Flag(true));
                if token == "-O1" {
                    levels.level1 = Some(value);
                } else {
                    levels.level2 = Some(value);
                }
            }
            _ => rest.push(token),
        }
    }

    (levels, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(tokens: &[&str]) -> Vec<String> {
        std::iter::once("cleancss")
            .chain(tokens.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn option_string_is_consumed_by_level_one() {
        let (levels, rest) = split_level_flags(argv(&["-O1", "removeQuotes:off", "a.css"]));
        assert_eq!(levels.level1, Some(LevelValue::Options("removeQuotes:off".into())));
        assert_eq!(rest, argv(&["a.css"]));

        let args = CliArgs::parse_from(rest);
        assert_eq!(args.inputs, vec!["a.css".to_string()]);
    }

    #[test]
    fn css_file_is_not_consumed() {
        let (levels, rest) = split_level_flags(argv(&["-O1", "foo.css"]));
        assert_eq!(levels.level1, Some(LevelValue::Flag(true)));
        let args = CliArgs::parse_from(rest);
        assert_eq!(args.inputs, vec!["foo.css".to_string()]);
    }

    #[test]
    fn path_heuristic() {
        assert!(looks_like_path("foo.css"));
        assert!(looks_like_path("dir/file"));
        assert!(looks_like_path(r"dir\file"));
        assert!(looks_like_path("http://example.com/a"));
        assert!(looks_like_path("https://example.com"));
        assert!(!looks_like_path(r"value\-x"));
        assert!(!looks_like_path("all:off;removeEmpty:on"));
        assert!(!looks_like_path(r"trailing\"));
    }

    #[test]
    fn flags_are_not_consumed_as_values() {
        let (levels, rest) = split_level_flags(argv(&["-O2", "-o", "out.css", "in.css"]));
        assert_eq!(levels.level2, Some(LevelValue::Flag(true)));
        assert_eq!(rest, argv(&["-o", "out.css", "in.css"]));
    }

    #[test]
    fn empty_token_is_not_a_level_value() {
        let (levels, rest) = split_level_flags(argv(&["-O1", "", "a.css"]));
        assert_eq!(levels.level1, Some(LevelValue::Flag(true)));
        assert_eq!(rest, argv(&["", "a.css"]));
    }

    #[test]
    fn level_zero_never_takes_a_value() {
        let (levels, rest) = split_level_flags(argv(&["-O0", "styles"]));
        assert_eq!(levels.level0, Some(true));
        assert!(levels.level1.is_none());
        assert_eq!(rest, argv(&["styles"]));
    }

    #[test]
    fn trailing_level_flag_is_boolean() {
        let (levels, rest) = split_level_flags(argv(&["in.css", "-O2"]));
        assert_eq!(levels.level2, Some(LevelValue::Flag(true)));
        assert_eq!(rest, argv(&["in.css"]));
    }

    #[test]
    fn double_dash_stops_level_scanning() {
        let (levels, rest) = split_level_flags(argv(&["--", "-O1"]));
        assert!(levels.is_empty());
        assert_eq!(rest, argv(&["--", "-O1"]));
    }

    #[test]
    fn clap_defaults() {
        let args = CliArgs::parse_from(argv(&["a.css"]));
        assert_eq!(args.batch_suffix, "-min");
        assert_eq!(args.inline, vec!["local".to_string()]);
        assert_eq!(args.inline_timeout, 5.0);
    }

    #[test]
    fn lowercase_v_prints_version() {
        let err = CliArgs::try_parse_from(argv(&["-v"])).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn inline_rules_split_on_commas() {
        let args = CliArgs::parse_from(argv(&["--inline", "local,fonts.googleapis.com", "a.css"]));
        assert_eq!(args.inline, vec!["local", "fonts.googleapis.com"]);
    }
}
