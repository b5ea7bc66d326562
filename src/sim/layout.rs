//! Initial disc formations

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Arena, BodyKind};

/// One disc to place at round setup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscPlacement {
    pub kind: BodyKind,
    pub pos: Vec2,
    /// Overrides the configured disc radius
    #[serde(default)]
    pub radius: Option<f32>,
}

/// Disc set placed on the board when a round starts (the striker is added separately)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub discs: Vec<DiscPlacement>,
}

impl Layout {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a disc with the configured radius
    pub fn with_disc(mut self, kind: BodyKind, pos: Vec2) -> Self {
        self.discs.push(DiscPlacement { kind, pos, radius: None });
        self
    }

    pub fn with_sized_disc(mut self, kind: BodyKind, pos: Vec2, radius: f32) -> Self {
        self.discs.push(DiscPlacement { kind, pos, radius: Some(radius) });
        self
    }

    /// Standard carrom formation around the board center.
    ///
    /// ```text
    ///        outer ring: 12 discs, alternating sides
    ///      inner ring: 6 discs, alternating sides
    ///    special disc at the center
    /// ```
    /// Each side gets 9 discs.
    pub fn standard(arena: Arena, disc_radius: f32) -> Self {
        let center = arena.center();
        // Gap between neighbouring discs
        let gap = disc_radius * 2.0 + 1.0;

        let mut layout = Self::empty().with_disc(BodyKind::SpecialDisc, center);

        for i in 0..6 {
            let angle = i as f32 * std::f32::consts::FRAC_PI_3;
            let kind = if i % 2 == 0 { BodyKind::SideADisc } else { BodyKind::SideBDisc };
            layout = layout.with_disc(kind, center + crate::heading(angle) * gap);
        }

        for i in 0..12 {
            let angle = i as f32 * std::f32::consts::FRAC_PI_6;
            // Rotate the pattern so outer discs of a side sit beside inner discs of the other
            let kind = if i % 2 == 0 { BodyKind::SideBDisc } else { BodyKind::SideADisc };
            layout = layout.with_disc(kind, center + crate::heading(angle) * gap * 2.0);
        }

        layout
    }

    pub fn count(&self, kind: BodyKind) -> usize {
        self.discs.iter().filter(|d| d.kind == kind).count()
    }
}
