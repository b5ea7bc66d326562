//! Engine: command entry points and the per-tick step
//!
//! Owns one `RoundState`. Hosts drive it with `step()` (directly or through a
//! `FixedStep` clock) and issue commands between ticks.

use glam::Vec2;

use super::clock::FixedStep;
use super::layout::Layout;
use super::rules::settle;
use super::state::{Arena, Body, BodyKind, GameEvent, Phase, RoundState, Scores, Shot, Side, Snapshot};
use super::tick::physics_tick;
use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError, Inconsistency, PlacementFault, ShotFault};
use crate::heading;

/// Disc physics and turn rules for one round at a time
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    state: RoundState,
    /// Set once a structural violation is found; cleared by `reset`
    fault: Option<Inconsistency>,
}

impl Engine {
    /// Validate the config and start a fresh round
    pub fn new(
        config: EngineConfig,
        width: f32,
        height: f32,
        layout: &Layout,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        config.validate_arena(width, height)?;
        let state = RoundState::new(Arena::new(width, height), layout, &config);
        log::info!("New round on {}x{} board with {} discs", width, height, layout.discs.len());
        Ok(Self {
            config,
            state,
            fault: None,
        })
    }

    /// Resume from a saved round state
    pub fn from_state(config: EngineConfig, mut state: RoundState) -> Result<Self, ConfigError> {
        config.validate()?;
        config.validate_arena(state.arena.width, state.arena.height)?;
        state.normalize_order();
        Ok(Self {
            config,
            state,
            fault: None,
        })
    }

    /// Discard the current round and start over. A rejected arena leaves the
    /// current round untouched.
    pub fn reset(&mut self, width: f32, height: f32, layout: &Layout) -> Result<(), ConfigError> {
        self.config.validate_arena(width, height)?;
        self.state = RoundState::new(Arena::new(width, height), layout, &self.config);
        self.fault = None;
        log::info!("Round reset on {}x{} board with {} discs", width, height, layout.discs.len());
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn acting_side(&self) -> Side {
        self.state.acting
    }

    pub fn scores(&self) -> Scores {
        self.state.scores
    }

    /// Render-only view of the current state; never advances time
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, Vec::new())
    }

    fn check_fault(&self) -> Result<(), EngineError> {
        match self.fault {
            Some(what) => Err(what.into()),
            None => Ok(()),
        }
    }

    /// Record a fatal inconsistency and return it as an error
    fn halt(&mut self, what: Inconsistency) -> EngineError {
        log::error!("Round halted: {}", what);
        self.fault = Some(what);
        what.into()
    }

    /// The single striker, halting the round if there is not exactly one
    fn striker(&mut self) -> Result<&mut Body, EngineError> {
        let found = self.state.striker_count();
        if found != 1 {
            return Err(self.halt(Inconsistency::StrikerCount { found }));
        }
        self.state
            .striker_mut()
            .ok_or(EngineError::InternalInconsistency(Inconsistency::StrikerCount { found }))
    }

    /// Slide the striker along the baseline while placing (clamped, never rejected
    /// for range)
    pub fn move_striker(&mut self, x: f32) -> Result<(), EngineError> {
        self.check_fault()?;
        if self.state.phase != Phase::Placing {
            return Err(PlacementFault::WrongPhase.into());
        }
        if !x.is_finite() {
            return Err(PlacementFault::NotFinite.into());
        }
        let (min, max) = self.config.placement_band(self.state.arena.width);
        let y = self.state.arena.baseline_y(self.state.acting, &self.config);
        self.striker()?.pos = Vec2::new(x.clamp(min, max), y);
        Ok(())
    }

    /// Fix the striker start position and move on to aiming
    pub fn confirm_placement(&mut self, x: f32) -> Result<(), EngineError> {
        self.check_fault()?;
        if self.state.phase != Phase::Placing {
            return Err(PlacementFault::WrongPhase.into());
        }
        if !x.is_finite() {
            return Err(PlacementFault::NotFinite.into());
        }

        let (min, max) = self.config.placement_band(self.state.arena.width);
        if x < min || x > max {
            log::warn!("Rejected placement x={} outside [{}, {}]", x, min, max);
            return Err(PlacementFault::OutOfBand { x, min, max }.into());
        }

        let pos = Vec2::new(x, self.state.arena.baseline_y(self.state.acting, &self.config));
        let striker_radius = self.config.striker_radius;
        if let Some(blocker) = self.state.bodies.iter().find(|b| {
            b.kind != BodyKind::Striker
                && b.is_active()
                && b.pos.distance(pos) < b.radius + striker_radius
        }) {
            log::warn!("Rejected placement x={}: overlaps body {}", x, blocker.id);
            return Err(PlacementFault::Overlapping { body_id: blocker.id }.into());
        }

        self.striker()?.pos = pos;
        self.state.phase = Phase::Aiming;
        log::debug!("{:?} placed striker at {:?}", self.state.acting, pos);
        Ok(())
    }

    /// Go back from aiming to pick a different start position
    pub fn reposition(&mut self) -> Result<(), EngineError> {
        self.check_fault()?;
        if self.state.phase != Phase::Aiming {
            return Err(PlacementFault::WrongPhase.into());
        }
        self.state.phase = Phase::Placing;
        Ok(())
    }

    /// Launch the striker. Power above `max_power` is clamped.
    pub fn commit_shot(&mut self, angle: f32, power: f32) -> Result<(), EngineError> {
        self.check_fault()?;
        if self.state.phase != Phase::Aiming {
            return Err(ShotFault::WrongPhase.into());
        }
        if !angle.is_finite() || !power.is_finite() {
            return Err(ShotFault::NotFinite.into());
        }
        if power <= 0.0 {
            log::warn!("Rejected shot with power {}", power);
            return Err(ShotFault::NonPositivePower { power }.into());
        }

        let mut power = power;
        if power > self.config.max_power {
            log::warn!("Shot power {} clamped to {}", power, self.config.max_power);
            power = self.config.max_power;
        }

        let shot = Shot {
            angle: crate::normalize_angle(angle),
            power,
        };
        let vel = heading(shot.angle) * shot.power * self.config.power_scale;
        self.striker()?.vel = vel;
        self.state.turn_captures.clear();
        self.state.phase = Phase::Simulating;
        log::debug!("{:?} shot {:?}", self.state.acting, shot);
        Ok(())
    }

    /// Advance one logical tick.
    ///
    /// Physics only runs while `Simulating`; the tick after everything comes to rest
    /// evaluates the rules. In other phases this returns the current state unchanged.
    pub fn step(&mut self) -> Result<Snapshot, EngineError> {
        self.check_fault()?;

        let mut events = Vec::new();
        match self.state.phase {
            Phase::Simulating => {
                let report = physics_tick(&mut self.state, &self.config);
                events.extend(report.captures.iter().map(|c| GameEvent::Captured {
                    body_id: c.body_id,
                    kind: c.kind,
                    pocket: c.pocket,
                }));
                if self.state.at_rest(self.config.rest_speed) {
                    self.state.phase = Phase::Settling;
                }
            }
            Phase::Settling => {
                self.verify_settled()?;
                let (_, settled) = settle(&mut self.state, &self.config);
                events.extend(settled);
            }
            Phase::Placing | Phase::Aiming | Phase::RoundOver => {}
        }

        Ok(Snapshot::capture(&self.state, events))
    }

    fn verify_settled(&mut self) -> Result<(), EngineError> {
        let rest_speed = self.config.rest_speed;
        let moving = self
            .state
            .bodies
            .iter()
            .find(|b| b.is_active() && b.speed() >= rest_speed)
            .map(|b| Inconsistency::MovingAtSettlement {
                body_id: b.id,
                speed: b.speed(),
            });
        if let Some(what) = moving {
            return Err(self.halt(what));
        }
        let found = self.state.striker_count();
        if found != 1 {
            return Err(self.halt(Inconsistency::StrikerCount { found }));
        }
        Ok(())
    }

    /// Step until the shot is settled (or `max_ticks` is reached) and collect events
    pub fn run_until_settled(&mut self, max_ticks: u32) -> Result<Vec<GameEvent>, EngineError> {
        let mut events = Vec::new();
        for _ in 0..max_ticks {
            if !matches!(self.state.phase, Phase::Simulating | Phase::Settling) {
                break;
            }
            events.extend(self.step()?.events);
        }
        Ok(events)
    }

    /// Run as many ticks as the clock says are due for `elapsed` seconds of host time
    pub fn advance(
        &mut self,
        clock: &mut FixedStep,
        elapsed: f32,
    ) -> Result<Vec<Snapshot>, EngineError> {
        let ticks = clock.ticks_due(elapsed);
        let mut snapshots = Vec::with_capacity(ticks as usize);
        for _ in 0..ticks {
            snapshots.push(self.step()?);
        }
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn engine(layout: &Layout) -> Engine {
        Engine::new(EngineConfig::default(), 600.0, 600.0, layout).unwrap()
    }

    fn sample_layout() -> Layout {
        Layout::empty()
            .with_disc(BodyKind::SideADisc, Vec2::new(150.0, 150.0))
            .with_disc(BodyKind::SideBDisc, Vec2::new(450.0, 150.0))
    }

    #[test]
    fn test_placement_then_aiming() {
        let mut engine = engine(&sample_layout());
        assert_eq!(engine.phase(), Phase::Placing);
        engine.confirm_placement(250.0).unwrap();
        assert_eq!(engine.phase(), Phase::Aiming);
        assert_eq!(engine.state().striker().unwrap().pos, Vec2::new(250.0, 500.0));
    }

    #[test]
    fn test_placement_out_of_band_leaves_state() {
        let mut engine = engine(&sample_layout());
        let before = engine.state().clone();
        let err = engine.confirm_placement(50.0).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidPlacement(PlacementFault::OutOfBand { x: 50.0, min: 120.0, max: 480.0 })
        );
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_placement_overlapping_disc_rejected() {
        let layout = Layout::empty()
            .with_disc(BodyKind::SideADisc, Vec2::new(300.0, 505.0))
            .with_disc(BodyKind::SideBDisc, Vec2::new(450.0, 150.0));
        let mut engine = engine(&layout);
        let err = engine.confirm_placement(310.0).unwrap_err();
        assert_eq!(err, EngineError::InvalidPlacement(PlacementFault::Overlapping { body_id: 1 }));
        assert_eq!(engine.phase(), Phase::Placing);
    }

    #[test]
    fn test_move_striker_clamps_to_band() {
        let mut engine = engine(&sample_layout());
        engine.move_striker(5.0).unwrap();
        assert_eq!(engine.state().striker().unwrap().pos.x, 120.0);
        assert_eq!(engine.phase(), Phase::Placing);
    }

    #[test]
    fn test_shot_rejected_outside_aiming() {
        let mut engine = engine(&sample_layout());
        assert_eq!(
            engine.commit_shot(-FRAC_PI_2, 10.0),
            Err(EngineError::InvalidShot(ShotFault::WrongPhase))
        );
    }

    #[test]
    fn test_zero_power_rejected() {
        let mut engine = engine(&sample_layout());
        engine.confirm_placement(300.0).unwrap();
        let before = engine.state().clone();
        assert_eq!(
            engine.commit_shot(-FRAC_PI_2, 0.0),
            Err(EngineError::InvalidShot(ShotFault::NonPositivePower { power: 0.0 }))
        );
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.phase(), Phase::Aiming);
    }

    #[test]
    fn test_power_is_clamped() {
        let mut engine = engine(&sample_layout());
        engine.confirm_placement(300.0).unwrap();
        engine.commit_shot(-FRAC_PI_2, 1000.0).unwrap();
        let speed = engine.state().striker().unwrap().speed();
        assert!((speed - engine.config().max_power).abs() < 1e-3);
        assert_eq!(engine.phase(), Phase::Simulating);
    }

    #[test]
    fn test_reposition_returns_to_placing() {
        let mut engine = engine(&sample_layout());
        engine.confirm_placement(300.0).unwrap();
        engine.reposition().unwrap();
        assert_eq!(engine.phase(), Phase::Placing);
        assert!(engine.reposition().is_err());
    }

    #[test]
    fn test_step_outside_simulation_is_idle() {
        let mut engine = engine(&sample_layout());
        let snap = engine.step().unwrap();
        assert_eq!(snap.tick, 0);
        assert!(snap.events.is_empty());
        assert_eq!(snap, engine.snapshot());
    }

    #[test]
    fn test_settling_with_moving_body_halts_round() {
        let mut engine = engine(&sample_layout());
        let mut state = engine.state().clone();
        state.phase = Phase::Settling;
        state.bodies[0].vel = Vec2::new(3.0, 0.0);
        engine = Engine::from_state(EngineConfig::default(), state).unwrap();

        let err = engine.step().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InternalInconsistency(Inconsistency::MovingAtSettlement { body_id: 1, .. })
        ));
        // Stays halted until reset
        assert_eq!(engine.step().unwrap_err(), err);
        assert_eq!(engine.confirm_placement(300.0).unwrap_err(), err);

        engine.reset(600.0, 600.0, &sample_layout()).unwrap();
        assert!(engine.step().is_ok());
    }

    #[test]
    fn test_narrow_arena_rejected() {
        let err = Engine::new(EngineConfig::default(), 200.0, 600.0, &sample_layout()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "width", .. }));

        let mut engine = engine(&sample_layout());
        let err = engine.reset(200.0, 600.0, &sample_layout()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "width", .. }));
        assert_eq!(engine.state().arena, Arena::new(600.0, 600.0));
        engine.move_striker(100.0).unwrap();
        assert_eq!(engine.state().striker().unwrap().pos.x, 120.0);

        let mut state = engine.state().clone();
        state.arena = Arena::new(200.0, 600.0);
        assert!(Engine::from_state(EngineConfig::default(), state).is_err());
    }

    #[test]
    fn test_huge_angle_is_normalized() {
        let mut engine = engine(&sample_layout());
        engine.confirm_placement(300.0).unwrap();
        engine.commit_shot(1.0e9, 10.0).unwrap();
        assert_eq!(engine.phase(), Phase::Simulating);
        let striker = engine.state().striker().unwrap();
        assert!(striker.vel.is_finite());
        assert!((striker.speed() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_missing_striker_halts_round() {
        let engine = engine(&sample_layout());
        let mut state = engine.state().clone();
        state.bodies.retain(|b| b.kind != BodyKind::Striker);
        let mut engine = Engine::from_state(EngineConfig::default(), state).unwrap();
        let err = engine.confirm_placement(300.0).unwrap_err();
        assert_eq!(err, EngineError::InternalInconsistency(Inconsistency::StrikerCount { found: 0 }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_shot_settles_and_passes_turn() {
        let mut engine = engine(&sample_layout());
        engine.confirm_placement(300.0).unwrap();
        engine.commit_shot(-FRAC_PI_2, 5.0).unwrap();
        let events = engine.run_until_settled(10_000).unwrap();
        assert_eq!(events, vec![GameEvent::TurnChanged { next: Side::B, changed: true }]);
        assert_eq!(engine.phase(), Phase::Placing);
        assert_eq!(engine.acting_side(), Side::B);
        assert_eq!(engine.state().striker().unwrap().pos, Vec2::new(300.0, 100.0));
    }

    #[test]
    fn test_advance_runs_due_ticks() {
        let mut engine = engine(&sample_layout());
        engine.confirm_placement(300.0).unwrap();
        engine.commit_shot(-FRAC_PI_2, 5.0).unwrap();
        let mut clock = FixedStep::new(0.01, 8);
        let snapshots = engine.advance(&mut clock, 0.035).unwrap();
        assert_eq!(snapshots.len(), 3);
        assert_eq!(engine.state().time_ticks, 3);
    }
}
