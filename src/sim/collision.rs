//! Collision detection and response for axis-aligned rectangles
//!
//! Moving bodies are resolved against static geometry one axis at a time:
//! X first, then Y. A body is grounded when the Y pass lands it on a tile
//! or the world floor stops its fall.

use glam::Vec2;

use super::entity::{Aabb, Body};
use crate::clamp_to_rect;

/// Overlap thinner than this on the cross axis is treated as edge contact
const CONTACT_EPSILON: f32 = 0.01;

/// Contacts produced by one move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    /// Landed on top of a tile or the world floor
    pub grounded: bool,
}

impl Contact {
    pub fn merge(self, other: Contact) -> Contact {
        Contact {
            grounded: self.grounded || other.grounded,
        }
    }
}

/// Per-axis overlap depth of two boxes (non-positive when separated)
#[inline]
pub fn penetration(a: &Aabb, b: &Aabb) -> Vec2 {
    Vec2::new(
        (a.max.x - b.min.x).min(b.max.x - a.min.x),
        (a.max.y - b.min.y).min(b.max.y - a.min.y),
    )
}

/// Integrate `body` by `dt` and push it out of `tiles`.
///
/// Velocity on a blocked axis is zeroed.
pub fn move_and_collide(body: &mut Body, dt: f32, tiles: &[Aabb]) -> Contact {
    let mut contact = Contact::default();
    let delta = body.vel * dt;
    let half = body.half_size();

    // X
    body.pos.x += delta.x;
    for tile in tiles {
        let pen = penetration(&body.aabb(), tile);
        if pen.x > 0.0 && pen.y > CONTACT_EPSILON {
            if delta.x > 0.0 {
                body.pos.x = tile.min.x - half.x;
            } else if delta.x < 0.0 {
                body.pos.x = tile.max.x + half.x;
            }
            body.vel.x = 0.0;
        }
    }

    // Y
    body.pos.y += delta.y;
    for tile in tiles {
        let pen = penetration(&body.aabb(), tile);
        if pen.y > 0.0 && pen.x > CONTACT_EPSILON {
            if delta.y > 0.0 {
                body.pos.y = tile.min.y - half.y;
                contact.grounded = true;
            } else if delta.y < 0.0 {
                body.pos.y = tile.max.y + half.y;
            }
            body.vel.y = 0.0;
        }
    }

    contact
}

/// Keep `body` fully inside `[0, world]`.
///
/// The bottom edge acts as a floor: a falling body stopped there is grounded.
pub fn clamp_to_bounds(body: &mut Body, world: Vec2) -> Contact {
    let half = body.half_size();
    let clamped = clamp_to_rect(body.pos, half, world - half);
    let mut contact = Contact::default();
    if clamped.x != body.pos.x {
        body.vel.x = 0.0;
    }
    if clamped.y != body.pos.y {
        contact.grounded = clamped.y < body.pos.y && body.vel.y >= 0.0;
        body.vel.y = 0.0;
    }
    body.pos = clamped;
    contact
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground() -> Vec<Aabb> {
        vec![
            Aabb::new(Vec2::new(0.0, 500.0), Vec2::new(64.0, 564.0)),
            Aabb::new(Vec2::new(64.0, 500.0), Vec2::new(128.0, 564.0)),
        ]
    }

    #[test]
    fn test_falling_body_lands() {
        let mut body = Body::new(Vec2::new(64.0, 472.0), Vec2::new(20.0, 40.0));
        body.vel = Vec2::new(0.0, 600.0);

        let contact = move_and_collide(&mut body, 1.0 / 60.0, &ground());
        assert!(contact.grounded);
        assert_eq!(body.pos.y, 480.0);
        assert_eq!(body.vel.y, 0.0);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_resting_body_can_run_across_seam() {
        let mut body = Body::new(Vec2::new(50.0, 480.0), Vec2::new(20.0, 40.0));
        body.vel = Vec2::new(200.0, 15.0);

        let contact = move_and_collide(&mut body, 0.1, &ground());
        assert!(contact.grounded);
        assert!((body.pos.x - 70.0).abs() < 0.001);
        assert_eq!(body.vel.x, 200.0);
    }

    #[test]
    fn test_airborne_body_has_no_contact() {
        let mut body = Body::new(Vec2::new(50.0, 300.0), Vec2::new(20.0, 40.0));
        body.vel = Vec2::new(0.0, -100.0);

        let contact = move_and_collide(&mut body, 1.0 / 60.0, &ground());
        assert_eq!(contact, Contact::default());
        assert!(body.pos.y < 300.0);
    }

    #[test]
    fn test_rising_into_ceiling() {
        let ceiling = vec![Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(128.0, 100.0))];
        let mut body = Body::new(Vec2::new(50.0, 125.0), Vec2::new(20.0, 40.0));
        body.vel = Vec2::new(0.0, -600.0);

        let contact = move_and_collide(&mut body, 1.0 / 60.0, &ceiling);
        assert!(!contact.grounded);
        assert_eq!(body.pos.y, 120.0);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_clamp_to_bounds() {
        let mut body = Body::new(Vec2::new(-5.0, 50.0), Vec2::new(20.0, 20.0));
        body.vel = Vec2::new(-100.0, 30.0);

        let contact = clamp_to_bounds(&mut body, Vec2::new(200.0, 100.0));
        assert!(!contact.grounded, "Side walls are not a floor");
        assert_eq!(body.pos, Vec2::new(10.0, 50.0));
        assert_eq!(body.vel, Vec2::new(0.0, 30.0));

        // Already inside
        assert_eq!(clamp_to_bounds(&mut body, Vec2::new(200.0, 100.0)), Contact::default());
    }

    #[test]
    fn test_world_floor_grounds_falling_body() {
        let mut body = Body::new(Vec2::new(50.0, 95.0), Vec2::new(20.0, 20.0));
        body.vel = Vec2::new(0.0, 15.0);

        let contact = clamp_to_bounds(&mut body, Vec2::new(200.0, 100.0));
        assert!(contact.grounded);
        assert_eq!(body.pos.y, 90.0);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_world_ceiling_does_not_ground() {
        let mut body = Body::new(Vec2::new(50.0, 5.0), Vec2::new(20.0, 20.0));
        body.vel = Vec2::new(0.0, -300.0);

        let contact = clamp_to_bounds(&mut body, Vec2::new(200.0, 100.0));
        assert!(!contact.grounded);
        assert_eq!(body.pos.y, 10.0);
    }
}
