//! Collision detection and response against the arena wall
//!
//! The ball is confined to a circle, so the only contact is with the inside of
//! the arena boundary. Detection compares the distance from the arena center
//! with `arena.radius - ball_radius`; response clamps the ball back onto that
//! circle and reflects its velocity with restitution and tangential friction.

use glam::Vec2;

use super::arena::Arena;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Corrected ball center on the boundary (if hit)
    pub point: Vec2,
    /// Outward unit normal from the arena center through the ball
    pub normal: Vec2,
    /// How far the ball center went past the allowed circle
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Unit normal for an offset from the arena center
///
/// A ball exactly on the center has no direction; `(1, 0)` is used instead.
#[inline]
pub fn boundary_normal(offset: Vec2, dist: f32) -> Vec2 {
    if dist == 0.0 {
        Vec2::X
    } else {
        offset / dist
    }
}

/// Check whether a ball has left the circle its center is allowed in
pub fn ball_boundary_collision(ball_pos: Vec2, ball_radius: f32, arena: &Arena) -> CollisionResult {
    let offset = ball_pos - arena.center;
    let dist = offset.length();
    let max_dist = arena.radius - ball_radius;

    if dist > max_dist {
        let normal = boundary_normal(offset, dist);
        return CollisionResult {
            hit: true,
            point: arena.center + normal * max_dist,
            normal,
            penetration: dist - max_dist,
        };
    }

    CollisionResult::miss()
}

/// Reflect velocity off the wall, losing energy in both directions
///
/// The normal component is flipped and scaled by `restitution`; the tangential
/// component is scaled by `tangential_friction`. `normal` must be unit length.
#[inline]
pub fn reflect_with_losses(
    velocity: Vec2,
    normal: Vec2,
    restitution: f32,
    tangential_friction: f32,
) -> Vec2 {
    let vn = velocity.dot(normal);
    let vt = velocity - vn * normal;
    -vn * restitution * normal + vt * tangential_friction
}
