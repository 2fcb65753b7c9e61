//! Configuration for grid sampling.

use serde::{Deserialize, Serialize};

use crate::interpolation::InterpolationOrder;

/// Sampling and reduction settings applied to a [`crate::Grid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Interpolation used by [`crate::Grid::value`].
    pub interpolation: InterpolationOrder,

    /// Missing value marker. `None` keeps the grid default (+inf, no
    /// missing data).
    pub missing_value: Option<f32>,

    /// Number of chunks for the whole-grid range reduction. `None` uses one
    /// chunk per rayon worker thread.
    pub range_workers: Option<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpolationOrder::Nearest,
            missing_value: None,
            range_workers: None,
        }
    }
}

impl GridConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRID_INTERPOLATION_ORDER") {
            config.interpolation = InterpolationOrder::from_name(&val);
        }

        if let Ok(val) = std::env::var("GRID_MISSING_VALUE") {
            if let Ok(mv) = val.parse() {
                config.missing_value = Some(mv);
            }
        }

        if let Ok(val) = std::env::var("GRID_RANGE_WORKERS") {
            if let Ok(workers) = val.parse() {
                config.range_workers = Some(workers);
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.range_workers == Some(0) {
            return Err("range_workers must be > 0".to_string());
        }

        if self.missing_value.is_some_and(f32::is_nan) {
            return Err("missing_value must not be NaN".to_string());
        }

        Ok(())
    }
}
