//! Engine and configuration errors
//!
//! Placement and shot errors are recoverable: the round state is untouched and the
//! caller re-issues a corrected command. An inconsistency is fatal to the round.

use std::fmt;

/// Why a striker placement was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementFault {
    /// Not in the `Placing` phase
    WrongPhase,
    /// Outside the legal baseline band
    OutOfBand { x: f32, min: f32, max: f32 },
    /// Striker would overlap a disc already on the board
    Overlapping { body_id: u32 },
    NotFinite,
}

impl fmt::Display for PlacementFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongPhase => write!(f, "striker can only be placed while placing"),
            Self::OutOfBand { x, min, max } => {
                write!(f, "x={x} is outside the baseline band [{min}, {max}]")
            }
            Self::Overlapping { body_id } => write!(f, "striker would overlap disc {body_id}"),
            Self::NotFinite => write!(f, "placement is not a finite number"),
        }
    }
}

/// Why a shot was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotFault {
    /// Not in the `Aiming` phase
    WrongPhase,
    /// Power must be strictly positive
    NonPositivePower { power: f32 },
    NotFinite,
}

impl fmt::Display for ShotFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongPhase => write!(f, "shots can only be committed while aiming"),
            Self::NonPositivePower { power } => write!(f, "shot power must be > 0, got {power}"),
            Self::NotFinite => write!(f, "shot angle or power is not a finite number"),
        }
    }
}

/// Structural violations that end the round
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inconsistency {
    /// Settlement reached while a body is still moving
    MovingAtSettlement { body_id: u32, speed: f32 },
    /// Expected exactly one striker on the board
    StrikerCount { found: usize },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MovingAtSettlement { body_id, speed } => {
                write!(f, "body {body_id} still moving at settlement (speed {speed})")
            }
            Self::StrikerCount { found } => write!(f, "expected one striker, found {found}"),
        }
    }
}

/// Errors returned by engine commands and `step()`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineError {
    InvalidPlacement(PlacementFault),
    InvalidShot(ShotFault),
    /// Round must be reset
    InternalInconsistency(Inconsistency),
}

impl EngineError {
    /// True when the caller can fix the command and try again
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InternalInconsistency(_))
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPlacement(fault) => write!(f, "invalid placement: {fault}"),
            Self::InvalidShot(fault) => write!(f, "invalid shot: {fault}"),
            Self::InternalInconsistency(what) => {
                write!(f, "internal inconsistency, round must be reset: {what}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl From<PlacementFault> for EngineError {
    fn from(fault: PlacementFault) -> Self {
        Self::InvalidPlacement(fault)
    }
}

impl From<ShotFault> for EngineError {
    fn from(fault: ShotFault) -> Self {
        Self::InvalidShot(fault)
    }
}

impl From<Inconsistency> for EngineError {
    fn from(what: Inconsistency) -> Self {
        Self::InternalInconsistency(what)
    }
}

/// Errors loading or validating an [`EngineConfig`](crate::EngineConfig)
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid config field `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
