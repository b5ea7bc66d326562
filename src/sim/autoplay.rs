//! Seeded shot planner for demo/idle play
//!
//! Same seed and same round state always give the same placement and shot.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{BodyKind, Phase, RoundState, Shot};
use crate::angle_between;
use crate::config::EngineConfig;

/// Placement attempts before settling for the band center
const PLACEMENT_TRIES: u32 = 8;

#[derive(Debug, Clone)]
pub struct Autoplayer {
    rng: Pcg32,
}

impl Autoplayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Pick a striker x and a shot for the acting side. `None` outside `Placing`.
    pub fn plan(&mut self, state: &RoundState, config: &EngineConfig) -> Option<(f32, Shot)> {
        if state.phase != Phase::Placing {
            return None;
        }

        let side = state.acting;
        let (min, max) = config.placement_band(state.arena.width);
        if !(min <= max) {
            log::warn!("Autoplay has no placement band on a {} wide arena", state.arena.width);
            return None;
        }
        let y = state.arena.baseline_y(side, config);

        let blocked = |x: f32| {
            state.bodies.iter().any(|b| {
                b.kind != BodyKind::Striker
                    && b.is_active()
                    && b.pos.distance(Vec2::new(x, y)) < b.radius + config.striker_radius + 1.0
            })
        };

        let x = (0..PLACEMENT_TRIES)
            .map(|_| self.rng.random_range(min..=max))
            .find(|&x| !blocked(x))
            .unwrap_or((min + max) / 2.0);
        let start = Vec2::new(x, y);

        // Own discs first, then the special disc, then anything left
        let own = BodyKind::disc_of(side);
        let target = [own, BodyKind::SpecialDisc]
            .into_iter()
            .find_map(|kind| nearest(state, start, |k| k == kind))
            .or_else(|| nearest(state, start, |k| k != BodyKind::Striker))?;

        let jitter = self.rng.random_range(-0.05f32..=0.05);
        let angle = angle_between(start, target) + jitter;
        let distance = start.distance(target);
        let power = (4.0 + distance * 0.04 + self.rng.random_range(0.0f32..=3.0)).min(config.max_power);

        log::debug!("Autoplay {:?}: place x={:.1}, aim {:.3} rad, power {:.2}", side, x, angle, power);
        Some((x, Shot { angle, power }))
    }
}

fn nearest(state: &RoundState, from: Vec2, matches: impl Fn(BodyKind) -> bool) -> Option<Vec2> {
    state
        .bodies
        .iter()
        .filter(|b| b.is_active() && matches(b.kind))
        .min_by(|a, b| {
            a.pos
                .distance_squared(from)
                .partial_cmp(&b.pos.distance_squared(from))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|b| b.pos)
}
