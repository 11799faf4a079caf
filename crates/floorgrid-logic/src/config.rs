//! Layout and solver configuration.
//!
//! Both structs are plain serde data with sensible defaults; hosts typically
//! load them from a settings file and run the `validate_*` functions before
//! use.
//!
//! ```
//! use floorgrid_logic::config::{validate_cost_weights, CostWeights};
//!
//! let weights = CostWeights::default();
//! assert!(validate_cost_weights(&weights).is_empty());
//! assert_eq!(weights.absent, 999);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fga::Size;

/// Grid layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of one grid cell in presentation units.
    pub cell_width: f64,
    /// Height of one grid cell in presentation units.
    pub cell_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_width: 32.0,
            cell_height: 32.0,
        }
    }
}

impl LayoutConfig {
    pub fn cell_size(&self) -> Size {
        Size::new(self.cell_width, self.cell_height)
    }
}

/// Per-floor penalties used to derive the group cost matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    /// Either group has no area on the floor.
    pub absent: u64,
    /// Both groups occupy the same area.
    pub shared_area: u64,
    /// Both groups are present but in different areas.
    pub conflicting_area: u64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            absent: 999,
            shared_area: 1,
            conflicting_area: 1000,
        }
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Cell width/height must be finite and positive.
    InvalidCellSize { width: f64, height: f64 },
    /// Sharing an area must cost less than a conflicting placement.
    SharedNotCheaper { shared_area: u64, conflicting_area: u64 },
    /// A missing group should not cost more than a conflicting one.
    AbsentAboveConflict { absent: u64, conflicting_area: u64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCellSize { width, height } => {
                write!(f, "Invalid cell size {}×{}", width, height)
            }
            ConfigError::SharedNotCheaper {
                shared_area,
                conflicting_area,
            } => write!(
                f,
                "Shared-area cost {} must be below conflicting-area cost {}",
                shared_area, conflicting_area
            ),
            ConfigError::AbsentAboveConflict {
                absent,
                conflicting_area,
            } => write!(
                f,
                "Absent cost {} exceeds conflicting-area cost {}",
                absent, conflicting_area
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validate layout settings, returning all errors found.
pub fn validate_layout_config(config: &LayoutConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let ok = |v: f64| v.is_finite() && v > 0.0;
    if !ok(config.cell_width) || !ok(config.cell_height) {
        errors.push(ConfigError::InvalidCellSize {
            width: config.cell_width,
            height: config.cell_height,
        });
    }
    errors
}

/// Validate cost weights, returning all errors found.
pub fn validate_cost_weights(weights: &CostWeights) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    if weights.shared_area >= weights.conflicting_area {
        errors.push(ConfigError::SharedNotCheaper {
            shared_area: weights.shared_area,
            conflicting_area: weights.conflicting_area,
        });
    }
    if weights.absent > weights.conflicting_area {
        errors.push(ConfigError::AbsentAboveConflict {
            absent: weights.absent,
            conflicting_area: weights.conflicting_area,
        });
    }
    errors
}
