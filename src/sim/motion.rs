//! Integration and wall response
//!
//! Velocities are in units per tick; one call advances exactly one tick.

use super::state::{Arena, Body};

/// Advance every active body by its velocity, then decay the velocity
pub fn integrate(bodies: &mut [Body], friction: f32) {
    for body in bodies.iter_mut().filter(|b| b.is_active()) {
        body.pos += body.vel;
        body.vel *= friction;
    }
}

/// Reflect off the arena walls and clamp back inside.
///
/// Returns true if any body touched a wall this tick.
pub fn resolve_walls(bodies: &mut [Body], arena: &Arena, restitution: f32) -> bool {
    let mut hit = false;
    for body in bodies.iter_mut().filter(|b| b.is_active()) {
        let r = body.radius;

        if body.pos.x - r < 0.0 {
            body.vel.x = -body.vel.x * restitution;
            body.pos.x = r;
            hit = true;
        } else if body.pos.x + r > arena.width {
            body.vel.x = -body.vel.x * restitution;
            body.pos.x = arena.width - r;
            hit = true;
        }

        if body.pos.y - r < 0.0 {
            body.vel.y = -body.vel.y * restitution;
            body.pos.y = r;
            hit = true;
        } else if body.pos.y + r > arena.height {
            body.vel.y = -body.vel.y * restitution;
            body.pos.y = arena.height - r;
            hit = true;
        }
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BodyKind;
    use glam::Vec2;

    fn disc(pos: Vec2, vel: Vec2) -> Body {
        let mut body = Body::new(1, BodyKind::SideADisc, pos, 12.0);
        body.vel = vel;
        body
    }

    #[test]
    fn test_integrate_moves_then_decays() {
        let mut bodies = vec![disc(Vec2::new(100.0, 100.0), Vec2::new(10.0, 0.0))];
        integrate(&mut bodies, 0.98);
        assert_eq!(bodies[0].pos, Vec2::new(110.0, 100.0));
        assert!((bodies[0].vel.x - 9.8).abs() < 1e-5);
    }

    #[test]
    fn test_integrate_skips_captured() {
        let mut bodies = vec![disc(Vec2::new(100.0, 100.0), Vec2::new(10.0, 0.0))];
        bodies[0].status = crate::sim::state::BodyStatus::Captured;
        integrate(&mut bodies, 0.98);
        assert_eq!(bodies[0].pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_wall_reflects_with_restitution_and_clamps() {
        let arena = Arena::new(600.0, 600.0);
        let mut bodies = vec![disc(Vec2::new(595.0, 300.0), Vec2::new(10.0, 0.0))];
        assert!(resolve_walls(&mut bodies, &arena, 0.8));
        assert_eq!(bodies[0].pos.x, 588.0);
        assert!((bodies[0].vel.x + 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_wall_top_edge() {
        let arena = Arena::new(600.0, 600.0);
        let mut bodies = vec![disc(Vec2::new(300.0, 5.0), Vec2::new(1.0, -5.0))];
        resolve_walls(&mut bodies, &arena, 0.8);
        assert_eq!(bodies[0].pos.y, 12.0);
        assert!((bodies[0].vel.y - 4.0).abs() < 1e-5);
        assert_eq!(bodies[0].vel.x, 1.0);
    }

    #[test]
    fn test_no_wall_contact() {
        let arena = Arena::new(600.0, 600.0);
        let mut bodies = vec![disc(Vec2::new(300.0, 300.0), Vec2::new(1.0, 1.0))];
        assert!(!resolve_walls(&mut bodies, &arena, 0.8));
        assert_eq!(bodies[0].vel, Vec2::new(1.0, 1.0));
    }
}
