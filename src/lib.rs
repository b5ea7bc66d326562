//! Carrom Engine - disc physics and turn rules for a carrom-style board
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, pockets, turn rules)
//! - `config`: Data-driven tuning (friction, scoring, placement band)
//! - `scores`: Cumulative score keeping against a key-value store
//! - `error`: Command and configuration errors

pub mod config;
pub mod error;
pub mod scores;
pub mod sim;

pub use config::EngineConfig;
pub use error::{ConfigError, EngineError, Inconsistency, PlacementFault, ShotFault};
pub use scores::{MemoryStore, ScoreKeeper, ScoreStore};
pub use sim::{Engine, GameEvent, Layout, Phase, RoundState, Shot, Side, Snapshot};

use glam::Vec2;

/// Default tuning constants
pub mod consts {
    /// Logical simulation timestep (60 Hz, one physics tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest host frame delta the clock will accept (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Board dimensions
    pub const BOARD_SIZE: f32 = 600.0;
    pub const POCKET_RADIUS: f32 = 15.0;

    /// Disc sizes (radius doubles as mass)
    pub const STRIKER_RADIUS: f32 = 15.0;
    pub const DISC_RADIUS: f32 = 12.0;

    /// Velocity decay applied every tick
    pub const FRICTION: f32 = 0.98;
    /// Fraction of the normal velocity kept after a wall bounce
    pub const WALL_RESTITUTION: f32 = 0.8;
    /// Bodies slower than this (units/tick) count as resting
    pub const REST_SPEED: f32 = 0.1;

    /// Shot power limits (units/tick)
    pub const MAX_POWER: f32 = 40.0;

    /// Striker baseline: distance from the side's edge to the striker center line
    pub const BASELINE_OFFSET: f32 = 100.0;
    /// Striker may not be placed closer than this to the left/right edges
    pub const PLACEMENT_MARGIN: f32 = 120.0;

    /// Scoring
    pub const DISC_POINTS: u32 = 1;
    pub const SPECIAL_POINTS: u32 = 3;
    pub const FOUL_POINTS: u32 = 1;
}

/// Normalized angle to [-π, π), in constant time for any finite input
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to TAU itself
    if wrapped >= PI { -PI } else { wrapped }
}

/// Unit vector pointing along `angle` (0 = +x, -π/2 = toward y = 0)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}
