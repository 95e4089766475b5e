//! Run configuration.
//!
//! A run is described by five values: worker count, grid dimension, chunk size,
//! lock kind and distribution. They are fixed before any worker starts.
//!
//! Values are layered: built-in defaults, then a config file (behind the
//! `config-file` feature), then explicit overrides such as CLI flags. Each
//! layer is a [`RunOverrides`] applied on top of the previous result.

use crate::error::ConfigError;
use crate::sync::LockKind;
use crate::types::WorkSpace;
use crate::work::Distribution;
use serde::{Deserialize, Serialize};

/// Largest supported worker count; also the capacity ceiling of the waiter registry.
pub const MAX_WORKERS: usize = 100;

/// Immutable parameters of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Number of worker threads `K`.
    pub threads: usize,
    /// Grid dimension `N`; the run covers `3 × N` units.
    pub dimension: usize,
    /// Units claimed per critical section.
    pub task_increment: usize,
    /// Which lock guards the progress counter.
    pub lock: LockKind,
    /// How units are split between workers.
    pub distribution: Distribution,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            dimension: 9,
            task_increment: 1,
            lock: LockKind::default(),
            distribution: Distribution::default(),
        }
    }
}

impl RunConfig {
    /// Creates a configuration with the default lock.
    #[must_use]
    pub fn new(threads: usize, dimension: usize, task_increment: usize) -> Self {
        Self {
            threads,
            dimension,
            task_increment,
            lock: LockKind::default(),
            distribution: Distribution::default(),
        }
    }

    /// Selects the lock kind.
    #[must_use]
    pub fn with_lock(mut self, lock: LockKind) -> Self {
        self.lock = lock;
        self
    }

    /// Selects the distribution.
    #[must_use]
    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// The work space this configuration covers.
    #[must_use]
    pub fn work_space(&self) -> WorkSpace {
        WorkSpace::new(self.dimension)
    }

    /// Checks the guardrails every run depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::NoThreads);
        }
        if self.threads > MAX_WORKERS {
            return Err(ConfigError::TooManyThreads {
                requested: self.threads,
                limit: MAX_WORKERS,
            });
        }
        if self.dimension == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if self.dimension.checked_mul(3).is_none() {
            return Err(ConfigError::DimensionOverflow(self.dimension));
        }
        if self.task_increment == 0 {
            return Err(ConfigError::ZeroIncrement);
        }
        Ok(())
    }

    /// Applies every value set in `overrides`.
    #[must_use]
    pub fn layered(mut self, overrides: &RunOverrides) -> Self {
        if let Some(threads) = overrides.threads {
            self.threads = threads;
        }
        if let Some(dimension) = overrides.dimension {
            self.dimension = dimension;
        }
        if let Some(task_increment) = overrides.task_increment {
            self.task_increment = task_increment;
        }
        if let Some(lock) = overrides.lock {
            self.lock = lock;
        }
        if let Some(distribution) = overrides.distribution {
            self.distribution = distribution;
        }
        self
    }
}

/// A partial configuration layer; unset fields leave the layer below alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunOverrides {
    /// Worker count override.
    pub threads: Option<usize>,
    /// Dimension override.
    pub dimension: Option<usize>,
    /// Chunk size override.
    pub task_increment: Option<usize>,
    /// Lock kind override.
    pub lock: Option<LockKind>,
    /// Distribution override.
    pub distribution: Option<Distribution>,
}

#[cfg(feature = "config-file")]
pub use file::RunFile;

#[cfg(feature = "config-file")]
mod file {
    use super::{RunConfig, RunOverrides};
    use crate::checker::SudokuGrid;
    use crate::error::{ConfigError, Error, Result};
    use serde::Deserialize;
    use std::path::Path;

    /// A run described in TOML: a `[run]` table and the grid rows.
    ///
    /// ```toml
    /// grid = [[1, 2, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 1]]
    ///
    /// [run]
    /// threads = 3
    /// task_increment = 4
    /// lock = "spin"
    /// ```
    ///
    /// `dimension` defaults to the number of grid rows.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct RunFile {
        /// Settings layered over [`RunConfig::default`].
        #[serde(default)]
        pub run: RunOverrides,
        /// Grid rows.
        pub grid: Vec<Vec<u32>>,
    }

    impl RunFile {
        /// Parses a run file from TOML text.
        pub fn from_toml_str(text: &str) -> Result<Self> {
            Ok(toml::from_str(text)?)
        }

        /// Reads and parses a run file.
        pub fn from_path(path: &Path) -> Result<Self> {
            let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml_str(&text)
        }

        /// Resolves the configuration and grid, applying `overrides` last.
        pub fn resolve(self, overrides: &RunOverrides) -> Result<(RunConfig, SudokuGrid)> {
            let base = RunConfig {
                dimension: self.grid.len(),
                ..RunConfig::default()
            };
            let config = base.layered(&self.run).layered(overrides);
            config.validate()?;

            if config.dimension != self.grid.len() {
                return Err(ConfigError::DimensionMismatch {
                    configured: config.dimension,
                    actual: self.grid.len(),
                }
                .into());
            }

            let grid = SudokuGrid::new(self.grid)?;
            Ok((config, grid))
        }
    }
}
