//! Deterministic simulation module
//!
//! All physics and rule logic lives here. This module must be pure and deterministic:
//! - Fixed logical tick only (velocities are units per tick)
//! - Seeded RNG only (autoplay)
//! - Stable iteration order (by body ID)
//! - No rendering, input or storage dependencies

pub mod autoplay;
pub mod capture;
pub mod clock;
pub mod collision;
pub mod engine;
pub mod layout;
pub mod motion;
pub mod rules;
pub mod state;
pub mod tick;

pub use autoplay::Autoplayer;
pub use capture::{detect_captures, in_pocket};
pub use clock::FixedStep;
pub use collision::{resolve_collisions, resolve_pair};
pub use engine::Engine;
pub use layout::{DiscPlacement, Layout};
pub use motion::{integrate, resolve_walls};
pub use rules::{Verdict, settle};
pub use state::{
    Arena, Body, BodyKind, BodyStatus, Capture, GameEvent, Phase, Pocket, RoundState, Scores,
    Shot, Side, Snapshot,
};
pub use tick::{TickReport, physics_tick};
