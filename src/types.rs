//! Shared types used across cleancss.
//! Includes optimization levels (`OptimizationLevels`, `LevelValue`), the
//! compatibility descriptor, run inputs and the per-unit `MinificationResult`.
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Value of one `-O<n>` flag: bare (`true`) or a fine-grained option string.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelValue {
    Flag(bool),
    Options(String),
}

impl LevelValue {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, LevelValue::Flag(false))
    }

    /// Option string for fine-grained settings, if one was given.
    pub fn options(&self) -> Option<&str> {
        match self {
            LevelValue::Options(s) => Some(s.as_str()),
            LevelValue::Flag(_) => None,
        }
    }
}

impl std::fmt::Display for LevelValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelValue::Flag(b) => write!(f, "{}", b),
            LevelValue::Options(s) => write!(f, "{}", s),
        }
    }
}

/// Optimization level map `{0?: bool, 1?: bool|string, 2?: bool|string}`.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct OptimizationLevels {
    #[serde(rename = "0", default, skip_serializing_if = "Option::is_none")]
    pub level0: Option<bool>,
    #[serde(rename = "1", default, skip_serializing_if = "Option::is_none")]
    pub level1: Option<LevelValue>,
    #[serde(rename = "2", default, skip_serializing_if = "Option::is_none")]
    pub level2: Option<LevelValue>,
}

impl OptimizationLevels {
    pub fn is_empty(&self) -> bool {
        self.level0.is_none() && self.level1.is_none() && self.level2.is_none()
    }

    /// Highest enabled level; 0 when only `-O0` (or nothing usable) is set.
    pub fn effective(&self) -> u8 {
        if self.level2.as_ref().is_some_and(LevelValue::is_enabled) {
            2
        } else if self.level1.as_ref().is_some_and(LevelValue::is_enabled) {
            1
        } else {
            0
        }
    }
}

/// Compatibility descriptor: a named preset (`ie9`, `*`) or an option tree.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Compatibility {
    Preset(String),
    Tree(serde_json::Value),
}

impl Default for Compatibility {
    fn default() -> Self {
        Compatibility::Preset("*".to_string())
    }
}

/// What the run reads: concrete files or a piped payload.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RunInputs {
    Files(Vec<PathBuf>),
    Piped(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Stats {
    pub original_size: usize,
    pub minified_size: usize,
    pub time_spent: Duration,
}

impl Stats {
    /// `(1 - minified/original) * 100`, truncated to hundredths of a percent.
    pub fn efficiency_hundredths(&self) -> i64 {
        if self.original_size == 0 {
            return 0;
        }
        let original = self.original_size as i128;
        let saved = original - self.minified_size as i128;
        (saved * 10_000 / original) as i64
    }

    pub fn efficiency(&self) -> String {
        let h = self.efficiency_hundredths();
        let sign = if h < 0 { "-" } else { "" };
        let abs = h.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Result of one unit of work.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct MinificationResult {
    pub styles: String,
    pub source_map: Option<String>,
    pub stats: Stats,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub inlined: Vec<String>,
}

impl MinificationResult {
    pub fn is_failed(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Per-input results in input order.
pub type BatchResultSet = Vec<(PathBuf, MinificationResult)>;

/// Shape of a minifier invocation's outcome.
#[derive(Clone, PartialEq, Debug)]
pub enum MinifyOutput {
    Single(MinificationResult),
    Batch(BatchResultSet),
}
