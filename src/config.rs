//! Configuration for the scene engine
//!
//! Engine settings can be built in code with the `with_*` methods or loaded
//! from a TOML file. Every field is optional in TOML; missing values fall back
//! to the defaults below.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::scene::Grid;

/// Errors that can occur when loading engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Configuration options for the scene engine
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Snap quantum for every position and size
    pub grid_step: f64,

    /// Default canvas width in grid units
    pub canvas_width: f64,

    /// Default canvas height in grid units
    pub canvas_height: f64,

    /// Number of relaxation passes the constraint solver runs
    pub solver_iterations: usize,

    /// Thickness of synthesized ramp slabs
    pub ramp_thickness: f64,

    /// Default run-over-rise ratio for side ramps
    pub slope_ratio: f64,

    /// Smallest extent scale-to-touch may produce
    pub touch_min_size: f64,

    /// Block size used by scene seeding
    pub default_block_size: f64,

    /// Margin between seeded blocks
    pub default_margin: f64,

    /// Maximum number of undo snapshots kept (unbounded when `None`)
    pub history_limit: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_step: 0.5,
            canvas_width: 40.0,
            canvas_height: 30.0,
            solver_iterations: 5,
            ramp_thickness: 0.1,
            slope_ratio: 12.0,
            touch_min_size: 1.0,
            default_block_size: 3.0,
            default_margin: 0.8,
            history_limit: None,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the grid step
    pub fn with_grid_step(mut self, step: f64) -> Self {
        self.grid_step = step;
        self
    }

    /// Set the default canvas size
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Set the number of solver passes
    pub fn with_solver_iterations(mut self, iterations: usize) -> Self {
        self.solver_iterations = iterations;
        self
    }

    /// Set the ramp slab thickness
    pub fn with_ramp_thickness(mut self, thickness: f64) -> Self {
        self.ramp_thickness = thickness;
        self
    }

    /// Set the default slope ratio for side ramps
    pub fn with_slope_ratio(mut self, ratio: f64) -> Self {
        self.slope_ratio = ratio;
        self
    }

    /// Set the minimum extent for scale-to-touch
    pub fn with_touch_min_size(mut self, size: f64) -> Self {
        self.touch_min_size = size;
        self
    }

    /// Set the block size and margin used by scene seeding
    pub fn with_seed_layout(mut self, size: f64, margin: f64) -> Self {
        self.default_block_size = size;
        self.default_margin = margin;
        self
    }

    /// Limit the undo history depth
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// The snap grid described by this configuration
    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_step)
    }

    /// Check that every numeric setting is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("grid_step", self.grid_step),
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("ramp_thickness", self.ramp_thickness),
            ("slope_ratio", self.slope_ratio),
            ("touch_min_size", self.touch_min_size),
            ("default_block_size", self.default_block_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }
        if !(self.default_margin.is_finite() && self.default_margin >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "default_margin",
                reason: format!("must not be negative, got {}", self.default_margin),
            });
        }
        if self.canvas_width < self.grid_step || self.canvas_height < self.grid_step {
            return Err(ConfigError::Invalid {
                field: "canvas_width",
                reason: "canvas must be at least one grid step in each direction".to_string(),
            });
        }
        Ok(())
    }
}
