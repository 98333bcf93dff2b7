//! Diagnostics and statistics for minification results, and the exit status
//! they add up to. Everything here goes to the diagnostic stream.
use std::io::Write;
use std::path::Path;

use crate::types::MinificationResult;

/// Severity of one dispatched record; the run exits with the highest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Outcome {
    #[default]
    Success,
    Failure,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Failure => 1,
        }
    }
}

pub struct Reporter<W: Write> {
    out: W,
    debug: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, debug: bool) -> Self {
        Self { out, debug }
    }

    pub fn warning(&mut self, message: &str) -> std::io::Result<()> {
        writeln!(self.out, "WARNING: {}", message)
    }

    pub fn error(&mut self, message: &str) -> std::io::Result<()> {
        writeln!(self.out, "ERROR: {}", message)
    }

    /// Print statistics (debug only), warnings and errors of one record.
    pub fn report(
        &mut self,
        label: Option<&Path>,
        result: &MinificationResult,
    ) -> std::io::Result<Outcome> {
        if self.debug {
            self.statistics(label, result)?;
        }
        for warning in &result.warnings {
            self.warning(warning)?;
        }
        for error in &result.errors {
            self.error(error)?;
        }
        Ok(if result.is_failed() {
            Outcome::Failure
        } else {
            Outcome::Success
        })
    }

    fn statistics(&mut self, label: Option<&Path>, result: &MinificationResult) -> std::io::Result<()> {
        let stats = &result.stats;
        if let Some(label) = label {
            writeln!(self.out, "Input: {}", label.display())?;
        }
        writeln!(self.out, "Original: {} bytes", stats.original_size)?;
        writeln!(self.out, "Minified: {} bytes", stats.minified_size)?;
        writeln!(self.out, "Efficiency: {}%", stats.efficiency())?;
        writeln!(self.out, "Time spent: {}ms", stats.time_spent.as_millis())?;
        if !result.inlined.is_empty() {
            writeln!(self.out, "Inlined:")?;
            for location in &result.inlined {
                writeln!(self.out, "  {}", location)?;
            }
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
