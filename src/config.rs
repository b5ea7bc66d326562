//! Engine tuning and rules configuration
//!
//! Loaded from JSON; any field left out falls back to the defaults in `crate::consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Physics, placement and scoring parameters for one engine instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Physics ===
    /// Velocity multiplier applied every tick (0 < friction < 1)
    pub friction: f32,
    /// Fraction of the normal velocity kept on a wall bounce
    pub wall_restitution: f32,
    /// Speed below which a body counts as resting
    pub rest_speed: f32,

    // === Bodies ===
    pub striker_radius: f32,
    pub disc_radius: f32,
    pub pocket_radius: f32,

    // === Shots ===
    /// Powers above this are clamped
    pub max_power: f32,
    /// Multiplier from shot power to striker speed (units/tick)
    pub power_scale: f32,

    // === Placement ===
    /// Distance from a side's edge to its striker baseline
    pub baseline_offset: f32,
    /// Striker x must lie in [margin, width - margin]
    pub placement_margin: f32,

    // === Scoring ===
    pub disc_points: u32,
    pub special_points: u32,
    /// Awarded to the opponent when the striker is pocketed
    pub foul_points: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            friction: FRICTION,
            wall_restitution: WALL_RESTITUTION,
            rest_speed: REST_SPEED,

            striker_radius: STRIKER_RADIUS,
            disc_radius: DISC_RADIUS,
            pocket_radius: POCKET_RADIUS,

            max_power: MAX_POWER,
            power_scale: 1.0,

            baseline_offset: BASELINE_OFFSET,
            placement_margin: PLACEMENT_MARGIN,

            disc_points: DISC_POINTS,
            special_points: SPECIAL_POINTS,
            foul_points: FOUL_POINTS,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every parameter is in a range the simulation can settle with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason: "must be a positive number" })
            }
        }

        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(ConfigError::Invalid { field: "friction", reason: "must be in (0, 1)" });
        }
        if !(self.wall_restitution > 0.0 && self.wall_restitution <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "wall_restitution",
                reason: "must be in (0, 1]",
            });
        }
        positive("rest_speed", self.rest_speed)?;
        positive("striker_radius", self.striker_radius)?;
        positive("disc_radius", self.disc_radius)?;
        positive("pocket_radius", self.pocket_radius)?;
        positive("max_power", self.max_power)?;
        positive("power_scale", self.power_scale)?;
        positive("baseline_offset", self.baseline_offset)?;
        if !(self.placement_margin.is_finite() && self.placement_margin >= self.striker_radius) {
            return Err(ConfigError::Invalid {
                field: "placement_margin",
                reason: "must be at least the striker radius",
            });
        }
        Ok(())
    }

    /// Check that an arena leaves room for both baselines and a non-empty placement band
    pub fn validate_arena(&self, width: f32, height: f32) -> Result<(), ConfigError> {
        if !(width.is_finite() && width > 2.0 * self.placement_margin) {
            return Err(ConfigError::Invalid {
                field: "width",
                reason: "must be finite and wider than twice the placement margin",
            });
        }
        if !(height.is_finite() && height > 2.0 * self.baseline_offset) {
            return Err(ConfigError::Invalid {
                field: "height",
                reason: "must be finite and taller than twice the baseline offset",
            });
        }
        Ok(())
    }

    /// Legal striker x range for an arena of the given width
    pub fn placement_band(&self, width: f32) -> (f32, f32) {
        (self.placement_margin, width - self.placement_margin)
    }
}
