//! Fixed timestep physics tick
//!
//! One tick runs the stages in a fixed order: integrate, walls, collisions, pockets.

use super::capture::detect_captures;
use super::collision::resolve_collisions;
use super::motion::{integrate, resolve_walls};
use super::state::{Capture, RoundState};
use crate::config::EngineConfig;

/// What happened during one physics tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub captures: Vec<Capture>,
    /// Body id pairs that exchanged an impulse
    pub collisions: Vec<(u32, u32)>,
    pub wall_contact: bool,
}

/// Advance all active bodies by exactly one tick
pub fn physics_tick(state: &mut RoundState, config: &EngineConfig) -> TickReport {
    integrate(&mut state.bodies, config.friction);
    let wall_contact = resolve_walls(&mut state.bodies, &state.arena, config.wall_restitution);
    let collisions = resolve_collisions(&mut state.bodies);
    let captures = detect_captures(&mut state.bodies, &state.pockets);

    for capture in &captures {
        log::debug!(
            "tick {}: body {} ({:?}) captured in pocket {}",
            state.time_ticks,
            capture.body_id,
            capture.kind,
            capture.pocket
        );
    }

    state.turn_captures.extend(captures.iter().copied());
    state.time_ticks += 1;

    TickReport {
        captures,
        collisions,
        wall_contact,
    }
}
