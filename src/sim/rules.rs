//! Settlement rules: fouls, scoring, the covering rule and turn possession
//!
//! Runs once per shot, after every body has come to rest.

use glam::Vec2;

use super::state::{BodyKind, BodyStatus, GameEvent, Phase, RoundState, Side};
use crate::config::EngineConfig;

/// Outcome of one settlement, mostly for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub foul: bool,
    pub own_captured: usize,
    pub retained: bool,
    pub round_over: bool,
}

/// Apply the rules to the captures of the finished shot and set up the next one
pub fn settle(state: &mut RoundState, config: &EngineConfig) -> (Verdict, Vec<GameEvent>) {
    let acting = state.acting;
    let captures = std::mem::take(&mut state.turn_captures);
    let mut events = Vec::new();

    let foul = captures.iter().any(|c| c.kind == BodyKind::Striker);
    let own_kind = BodyKind::disc_of(acting);
    let own_captured = captures.iter().filter(|c| c.kind == own_kind).count();
    let special_captured = captures.iter().any(|c| c.kind == BodyKind::SpecialDisc);

    // 1. Foul
    if foul {
        let awarded_to = acting.opponent();
        state.scores.add(awarded_to, config.foul_points);
        events.push(GameEvent::Foul {
            offender: acting,
            awarded_to,
            points: config.foul_points,
        });
    }

    // 2. Scoring discs go to their owner, whoever pocketed them
    for side in [Side::A, Side::B] {
        let kind = BodyKind::disc_of(side);
        let count = captures.iter().filter(|c| c.kind == kind).count() as u32;
        if count > 0 {
            let points = count * config.disc_points;
            state.scores.add(side, points);
            events.push(GameEvent::Scored { side, points });
        }
    }

    // 3. Covering rule
    let pending = state.pending_cover.take();
    let mut special_legal = false;
    if special_captured || pending.is_some() {
        let owed_by_acting = pending.is_none() || pending == Some(acting);
        if !foul && owed_by_acting && own_captured > 0 {
            state.scores.add(acting, config.special_points);
            events.push(GameEvent::SpecialCovered { side: acting });
            events.push(GameEvent::Scored {
                side: acting,
                points: config.special_points,
            });
            special_legal = true;
        } else if !foul && special_captured && pending.is_none() {
            state.pending_cover = Some(acting);
            events.push(GameEvent::SpecialPending { side: acting });
            special_legal = true;
        } else if let Some(pos) = return_special(state, config) {
            events.push(GameEvent::SpecialReturned { pos });
        }
    }

    // 4. Possession
    let retained = !foul && (own_captured > 0 || special_legal);

    for body in state.bodies.iter_mut() {
        body.vel = Vec2::ZERO;
    }

    // 5. Round over once a side has nothing left to pocket
    let round_over = state.active_discs(Side::A) == 0 || state.active_discs(Side::B) == 0;
    if round_over {
        state.phase = Phase::RoundOver;
        let winner = state.scores.leader();
        log::info!(
            "Round over after {} ticks: A={} B={} winner={:?}",
            state.time_ticks,
            state.scores.a,
            state.scores.b,
            winner
        );
        events.push(GameEvent::RoundOver {
            winner,
            scores: state.scores,
        });
    } else {
        let next = if retained { acting } else { acting.opponent() };
        state.acting = next;
        state.spawn_striker(next, config);
        state.phase = Phase::Placing;
        events.push(GameEvent::TurnChanged {
            next,
            changed: !retained,
        });
    }

    let verdict = Verdict {
        foul,
        own_captured,
        retained,
        round_over,
    };
    log::debug!("Settled shot for {:?}: {:?}", acting, verdict);
    (verdict, events)
}

/// Put a captured special disc back at the board center, or the nearest free spot
/// along the center column. Spots where either side's striker respawns count as taken.
/// Returns the new position, or `None` when the column is full and the disc stays out.
fn return_special(state: &mut RoundState, config: &EngineConfig) -> Option<Vec2> {
    let idx = state
        .bodies
        .iter()
        .position(|b| b.kind == BodyKind::SpecialDisc && !b.is_active())?;
    let radius = state.bodies[idx].radius;
    let center = state.arena.center();
    let step = radius * 2.0 + 1.0;
    let spawns = [Side::A, Side::B]
        .map(|side| Vec2::new(center.x, state.arena.baseline_y(side, config)));

    let is_free = |pos: Vec2| {
        let clear_of_bodies = state.bodies.iter().enumerate().all(|(i, b)| {
            i == idx
                || !b.is_active()
                // the striker is replaced before the next shot
                || b.kind == BodyKind::Striker
                || b.pos.distance(pos) >= b.radius + radius
        });
        clear_of_bodies
            && spawns
                .iter()
                .all(|spawn| spawn.distance(pos) >= config.striker_radius + radius)
    };

    let max_steps = ((state.arena.height / 2.0 - radius - config.pocket_radius) / step).max(0.0) as i32;
    let Some(pos) = (0..=max_steps)
        .flat_map(|k| [k, -k])
        .map(|k| center + Vec2::new(0.0, k as f32 * step))
        .find(|&pos| is_free(pos))
    else {
        log::warn!("No free spot on the center column; special disc stays out of play");
        return None;
    };

    let special = &mut state.bodies[idx];
    special.status = BodyStatus::Active;
    special.vel = Vec2::ZERO;
    special.pos = pos;
    log::debug!("Special disc returned to {:?}", pos);
    Some(pos)
}
