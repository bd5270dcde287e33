//! Batch run configuration
//!
//! Values can come from a TOML file and are then overridden by command-line
//! flags. Missing keys fall back to the defaults of the classic bulk run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{KingdomError, Result};
use crate::kingdom::RulerDecisions;

/// Configuration for a batch of independent trials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of worker threads in the rayon pool
    ///
    /// Trials are split into one chunk per thread, so this also fixes how
    /// many independently seeded RNGs the batch uses.
    pub threads: usize,

    /// Total number of trials across all threads
    ///
    /// Divided evenly between threads; any remainder is dropped, matching
    /// `trials / threads` per worker.
    pub trials: u64,

    /// Base seed; worker `i` uses `seed + i`
    ///
    /// `None` draws a fresh base seed from the thread-local RNG.
    pub seed: Option<u64>,

    /// Use fixed event values instead of random draws
    pub deterministic: bool,

    /// Decisions the ruler makes every year in batch trials
    pub decisions: RulerDecisions,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            trials: 10_000_000,
            seed: None,
            deterministic: false,
            decisions: RulerDecisions::new(0, 50, 2000, 10),
        }
    }
}

impl BatchConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BatchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(KingdomError::InvalidConfig(
                "threads must be at least 1".into(),
            ));
        }

        if self.trials == 0 {
            return Err(KingdomError::InvalidConfig(
                "trials must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Trials each worker runs
    pub fn trials_per_thread(&self) -> u64 {
        self.trials / self.threads as u64
    }
}
