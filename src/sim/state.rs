//! Round state and core simulation types
//!
//! Everything a round needs to be saved, restored and replayed lives in `RoundState`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layout::Layout;
use crate::config::EngineConfig;

/// The two competing sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Shoots from the baseline near y = height
    A,
    /// Shoots from the baseline near y = 0
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// What a body is, which decides how the rules treat its capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Striker,
    SideADisc,
    SideBDisc,
    /// Capturable by either side, subject to the covering rule
    SpecialDisc,
}

impl BodyKind {
    /// Side that owns this disc, if any
    pub fn owner(self) -> Option<Side> {
        match self {
            BodyKind::SideADisc => Some(Side::A),
            BodyKind::SideBDisc => Some(Side::B),
            BodyKind::Striker | BodyKind::SpecialDisc => None,
        }
    }

    /// Scoring disc kind owned by `side`
    pub fn disc_of(side: Side) -> BodyKind {
        match side {
            Side::A => BodyKind::SideADisc,
            Side::B => BodyKind::SideBDisc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyStatus {
    Active,
    Captured,
}

/// A disc on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub kind: BodyKind,
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub radius: f32,
    pub status: BodyStatus,
}

impl Body {
    pub fn new(id: u32, kind: BodyKind, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            radius,
            status: BodyStatus::Active,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == BodyStatus::Active
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Effective mass for collision response (radius stands in for mass)
    #[inline]
    pub fn mass(&self) -> f32 {
        self.radius
    }

    /// Mark captured and freeze in place
    pub fn capture(&mut self) {
        self.status = BodyStatus::Captured;
        self.vel = Vec2::ZERO;
    }
}

/// A circular capture region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pocket {
    pub pos: Vec2,
    pub radius: f32,
}

/// Bounding rectangle of the play area, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Four corner pockets, each inset by its own radius
    pub fn corner_pockets(&self, radius: f32) -> Vec<Pocket> {
        [
            Vec2::new(radius, radius),
            Vec2::new(self.width - radius, radius),
            Vec2::new(radius, self.height - radius),
            Vec2::new(self.width - radius, self.height - radius),
        ]
        .into_iter()
        .map(|pos| Pocket { pos, radius })
        .collect()
    }

    /// Striker center line for a side
    pub fn baseline_y(&self, side: Side, config: &EngineConfig) -> f32 {
        match side {
            Side::A => self.height - config.baseline_offset,
            Side::B => config.baseline_offset,
        }
    }
}

/// Shot command: direction in radians (0 = +x, -π/2 = toward y = 0) and power
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub angle: f32,
    pub power: f32,
}

/// Turn controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Acting side choosing the striker start position
    Placing,
    /// Placement fixed, angle and power being set
    Aiming,
    /// Physics running
    Simulating,
    /// Everything at rest, rules evaluated on the next step
    Settling,
    RoundOver,
}

/// Per-side points for the current round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub a: u32,
    pub b: u32,
}

impl Scores {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    pub fn add(&mut self, side: Side, points: u32) {
        match side {
            Side::A => self.a += points,
            Side::B => self.b += points,
        }
    }

    /// Side with the higher score, `None` on a tie
    pub fn leader(&self) -> Option<Side> {
        match self.a.cmp(&self.b) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Events emitted by `step()` for the presentation layer and score keeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A body entered pocket `pocket` (index into the round's pockets)
    Captured { body_id: u32, kind: BodyKind, pocket: usize },
    Scored { side: Side, points: u32 },
    Foul { offender: Side, awarded_to: Side, points: u32 },
    /// Special disc pocketed, the side must pocket an own disc on its next shot
    SpecialPending { side: Side },
    SpecialCovered { side: Side },
    /// Special disc put back on the board
    SpecialReturned { pos: Vec2 },
    /// Turn resolved; `changed` is false when the acting side keeps the turn
    TurnChanged { next: Side, changed: bool },
    RoundOver { winner: Option<Side>, scores: Scores },
}

/// A body captured during the current turn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    pub body_id: u32,
    pub kind: BodyKind,
    pub pocket: usize,
}

/// Complete round state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub arena: Arena,
    pub pockets: Vec<Pocket>,
    /// All bodies, sorted by id
    pub bodies: Vec<Body>,
    pub scores: Scores,
    /// Side taking the current shot
    pub acting: Side,
    pub phase: Phase,
    /// Captures since the last settlement
    pub turn_captures: Vec<Capture>,
    /// Side that pocketed the special disc and still has to cover it
    pub pending_cover: Option<Side>,
    /// Physics ticks run this round
    pub time_ticks: u64,
    next_id: u32,
}

impl RoundState {
    /// Fresh round: layout discs on the board, side A placing
    pub fn new(arena: Arena, layout: &Layout, config: &EngineConfig) -> Self {
        let mut state = Self {
            arena,
            pockets: arena.corner_pockets(config.pocket_radius),
            bodies: Vec::with_capacity(layout.discs.len() + 1),
            scores: Scores::default(),
            acting: Side::A,
            phase: Phase::Placing,
            turn_captures: Vec::new(),
            pending_cover: None,
            time_ticks: 0,
            next_id: 1,
        };

        for disc in &layout.discs {
            let id = state.next_entity_id();
            let radius = disc.radius.unwrap_or(config.disc_radius);
            state.bodies.push(Body::new(id, disc.kind, disc.pos, radius));
        }

        state.spawn_striker(Side::A, config);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace any striker with a fresh one at the side's baseline center
    pub fn spawn_striker(&mut self, side: Side, config: &EngineConfig) {
        self.bodies.retain(|b| b.kind != BodyKind::Striker);
        let id = self.next_entity_id();
        let pos = Vec2::new(self.arena.width / 2.0, self.arena.baseline_y(side, config));
        self.bodies.push(Body::new(id, BodyKind::Striker, pos, config.striker_radius));
    }

    pub fn striker(&self) -> Option<&Body> {
        self.bodies.iter().find(|b| b.kind == BodyKind::Striker)
    }

    pub fn striker_mut(&mut self) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.kind == BodyKind::Striker)
    }

    pub fn striker_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.kind == BodyKind::Striker).count()
    }

    /// Scoring discs of `side` still on the board
    pub fn active_discs(&self, side: Side) -> usize {
        let kind = BodyKind::disc_of(side);
        self.bodies
            .iter()
            .filter(|b| b.kind == kind && b.is_active())
            .count()
    }

    /// True when every active body is slower than `rest_speed`
    pub fn at_rest(&self, rest_speed: f32) -> bool {
        self.bodies
            .iter()
            .filter(|b| b.is_active())
            .all(|b| b.speed() < rest_speed)
    }

    /// Ensure bodies are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.bodies.sort_by_key(|b| b.id);
    }
}

/// What the presentation layer renders after each step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: Phase,
    pub acting_side: Side,
    pub scores: Scores,
    pub bodies: Vec<Body>,
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn capture(state: &RoundState, events: Vec<GameEvent>) -> Self {
        Self {
            tick: state.time_ticks,
            phase: state.phase,
            acting_side: state.acting,
            scores: state.scores,
            bodies: state.bodies.clone(),
            events,
        }
    }
}
