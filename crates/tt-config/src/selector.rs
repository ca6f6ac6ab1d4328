//! Threshold selector settings.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How the selector searches the threshold grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Binary search using the monotonicity of the false-negative count.
    #[default]
    Bisect,
    /// Linear scan over every grid point.
    Sweep,
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStrategy::Bisect => write!(f, "bisect"),
            SearchStrategy::Sweep => write!(f, "sweep"),
        }
    }
}

/// Grid resolution and search strategy for Policy-B selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Number of evenly spaced thresholds on [0, 1], endpoints included.
    #[serde(default = "default_grid_points")]
    pub grid_points: usize,
    #[serde(default)]
    pub strategy: SearchStrategy,
}

fn default_grid_points() -> usize {
    SelectorConfig::DEFAULT_GRID_POINTS
}

impl SelectorConfig {
    /// 5001 points, i.e. a step of 0.0002.
    pub const DEFAULT_GRID_POINTS: usize = 5001;
    /// 1_000_001 points, i.e. a step of 1e-6.
    pub const MAX_GRID_POINTS: usize = 1_000_001;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=Self::MAX_GRID_POINTS).contains(&self.grid_points) {
            return Err(ConfigError::invalid(
                "grid_points",
                format!(
                    "must be between 2 and {}, got {}",
                    Self::MAX_GRID_POINTS,
                    self.grid_points
                ),
            ));
        }
        Ok(())
    }

    pub fn with_grid_points(mut self, grid_points: usize) -> Self {
        self.grid_points = grid_points;
        self
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            grid_points: Self::DEFAULT_GRID_POINTS,
            strategy: SearchStrategy::default(),
        }
    }
}
