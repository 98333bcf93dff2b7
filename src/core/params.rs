use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{Compatibility, LevelValue, OptimizationLevels};

pub const DEFAULT_BATCH_SUFFIX: &str = "-min";
pub const DEFAULT_INLINE_TIMEOUT_MS: u64 = 5_000;

/// Run configuration, built once from the command line and read-only afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub level: OptimizationLevels,
    pub compatibility: Compatibility,
    /// Inline rules such as `local`, `remote`, `all`, `none` or host names
    pub inline: Vec<String>,
    pub inline_timeout_ms: u64,
    pub output: Option<PathBuf>,
    pub rebase: bool,
    /// Directory relative URLs are rewritten against; None unless rebasing
    pub rebase_to: Option<PathBuf>,
    pub source_map: bool,
    pub source_map_inline_sources: bool,
    pub input_source_map: Option<PathBuf>,
    pub format: Option<String>,
    pub batch: bool,
    pub batch_suffix: String,
    pub debug: bool,
    pub remove_inlined_files: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            level: OptimizationLevels {
                level1: Some(LevelValue::Flag(true)),
                ..OptimizationLevels::default()
            },
            compatibility: Compatibility::default(),
            inline: vec!["local".to_string()],
            inline_timeout_ms: DEFAULT_INLINE_TIMEOUT_MS,
            output: None,
            rebase: false,
            rebase_to: None,
            source_map: false,
            source_map_inline_sources: false,
            input_source_map: None,
            format: None,
            batch: false,
            batch_suffix: DEFAULT_BATCH_SUFFIX.to_string(),
            debug: false,
            remove_inlined_files: false,
        }
    }
}

impl Configuration {
    pub fn allows_local_inline(&self) -> bool {
        self.inline.iter().any(|r| r == "local" || r == "all")
    }

    /// Whether a remote import from `host` may be fetched.
    pub fn allows_remote_inline(&self, host: &str) -> bool {
        if self.inline.iter().any(|r| r.strip_prefix('!') == Some(host)) {
            return false;
        }
        self.inline
            .iter()
            .any(|r| r == "remote" || r == "all" || r == host)
    }
}
