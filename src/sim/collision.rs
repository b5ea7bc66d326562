//! Disc-disc collision detection and response
//!
//! Each overlapping pair is solved as a 1-D elastic collision along the line between
//! centers, with radius standing in for mass. Pairs are visited once per tick in body
//! index order; there is no iterative solver.

use glam::Vec2;

use super::state::Body;

/// Resolve one pair. Returns true if an impulse was applied.
///
/// Bodies that overlap but are already separating along the normal are left alone,
/// so the overlap left behind by a hit clears on its own instead of re-colliding.
pub fn resolve_pair(a: &mut Body, b: &mut Body) -> bool {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    if dist >= a.radius + b.radius || dist <= f32::EPSILON {
        return false;
    }

    // Rotate into the collision frame: x along the normal, y tangential
    let angle = delta.y.atan2(delta.x);
    let to_normal = Vec2::from_angle(-angle);
    let v1 = to_normal.rotate(a.vel);
    let v2 = to_normal.rotate(b.vel);

    if v1.x - v2.x <= 0.0 {
        return false;
    }

    let (m1, m2) = (a.mass(), b.mass());
    let total = m1 + m2;
    let n1 = ((m1 - m2) * v1.x + 2.0 * m2 * v2.x) / total;
    let n2 = ((m2 - m1) * v2.x + 2.0 * m1 * v1.x) / total;

    let to_world = Vec2::from_angle(angle);
    a.vel = to_world.rotate(Vec2::new(n1, v1.y));
    b.vel = to_world.rotate(Vec2::new(n2, v2.y));
    true
}

/// Resolve every active pair once. Returns the id pairs that collided.
pub fn resolve_collisions(bodies: &mut [Body]) -> Vec<(u32, u32)> {
    let mut hits = Vec::new();
    for i in 0..bodies.len() {
        if !bodies[i].is_active() {
            continue;
        }
        for j in (i + 1)..bodies.len() {
            let (left, right) = bodies.split_at_mut(j);
            let (a, b) = (&mut left[i], &mut right[0]);
            if b.is_active() && resolve_pair(a, b) {
                hits.push((a.id, b.id));
            }
        }
    }
    hits
}
