use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::config::Config;
use super::error::Error;
use super::input::{read_lines, validate_pair_count};
use common::types::RoundingPolicy;
use converter_core::{BuildOptions, Conversion, convert_lines};

/// Counts of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Files never attempted because an earlier failure stopped the batch.
    pub skipped: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

/// Processes input files one after another, each with a fresh graph.
pub struct Runner {
    options: BuildOptions,
    policy: RoundingPolicy,
    continue_on_error: bool,
}

impl Runner {
    pub fn new(options: BuildOptions, policy: RoundingPolicy, continue_on_error: bool) -> Self {
        Runner {
            options,
            policy,
            continue_on_error,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.validation.build_options(),
            config.rounding.policy(),
            config.run.continue_on_error,
        )
    }

    /// Reads, validates and converts a single file.
    pub fn process_file(&self, path: &Path) -> Result<Conversion, Error> {
        let lines = read_lines(path)?;
        let pairs = validate_pair_count(&lines)?;
        info!(file = %path.display(), pairs, "Processing file");

        Ok(convert_lines(&lines, &self.options, &self.policy)?)
    }

    /// Converts every file in order, writing one amount per line to `out` and
    /// one message per failure to `err`.
    ///
    /// Unless `continue_on_error` is set, the first failure stops the batch.
    pub fn run<O: Write, E: Write>(
        &self,
        paths: &[PathBuf],
        out: &mut O,
        err: &mut E,
    ) -> Result<RunSummary, Error> {
        let mut summary = RunSummary::default();

        for (idx, path) in paths.iter().enumerate() {
            match self.process_file(path) {
                Ok(conversion) => {
                    writeln!(out, "{}", conversion.rounded)?;
                    summary.succeeded += 1;
                }
                Err(e) => {
                    debug!(file = %path.display(), error = %e, "Conversion failed");
                    writeln!(err, "Error: {}: {}", path.display(), e)?;
                    summary.failed += 1;

                    if !self.continue_on_error {
                        summary.skipped = paths.len() - idx - 1;
                        if summary.skipped > 0 {
                            warn!(skipped = summary.skipped, "Aborting remaining files");
                        }
                        break;
                    }
                }
            }
        }

        Ok(summary)
    }
}
