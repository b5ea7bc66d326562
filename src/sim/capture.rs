//! Pocket detection

use super::state::{Body, Capture, Pocket};

/// Check if a body overlaps a pocket
#[inline]
pub fn in_pocket(body: &Body, pocket: &Pocket) -> bool {
    body.pos.distance(pocket.pos) < pocket.radius + body.radius
}

/// Capture every active body that reached a pocket.
///
/// Captured bodies are frozen and skipped by every later stage, so each body is
/// reported at most once per round.
pub fn detect_captures(bodies: &mut [Body], pockets: &[Pocket]) -> Vec<Capture> {
    let mut captures = Vec::new();
    for body in bodies.iter_mut().filter(|b| b.is_active()) {
        if let Some(pocket) = pockets.iter().position(|p| in_pocket(body, p)) {
            body.capture();
            captures.push(Capture {
                body_id: body.id,
                kind: body.kind,
                pocket,
            });
        }
    }
    captures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Arena, BodyKind};
    use glam::Vec2;

    #[test]
    fn test_capture_in_corner() {
        let pockets = Arena::new(600.0, 600.0).corner_pockets(15.0);
        let mut bodies = vec![
            Body::new(1, BodyKind::SideADisc, Vec2::new(30.0, 25.0), 12.0),
            Body::new(2, BodyKind::SideBDisc, Vec2::new(300.0, 300.0), 12.0),
        ];
        bodies[0].vel = Vec2::new(-2.0, -2.0);

        let captures = detect_captures(&mut bodies, &pockets);
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].body_id, 1);
        assert_eq!(captures[0].pocket, 0);
        assert!(!bodies[0].is_active());
        assert_eq!(bodies[0].vel, Vec2::ZERO);
        assert!(bodies[1].is_active());
    }

    #[test]
    fn test_capture_reported_once() {
        let pockets = Arena::new(600.0, 600.0).corner_pockets(15.0);
        let mut bodies = vec![Body::new(1, BodyKind::Striker, Vec2::new(580.0, 580.0), 15.0)];
        assert_eq!(detect_captures(&mut bodies, &pockets).len(), 1);
        assert!(detect_captures(&mut bodies, &pockets).is_empty());
    }

    #[test]
    fn test_touching_edge_is_not_captured() {
        let pocket = Pocket { pos: Vec2::new(15.0, 15.0), radius: 15.0 };
        let body = Body::new(1, BodyKind::SideADisc, Vec2::new(42.0, 15.0), 12.0);
        assert!(!in_pocket(&body, &pocket));
    }
}
