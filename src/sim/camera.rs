//! Side-scrolling camera

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_to_rect;

/// A viewport that trails a target with exponential damping and never shows
/// anything outside the world rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Top-left corner of the view in world coordinates
    pub pos: Vec2,
    pub view: Vec2,
    world: Vec2,
    /// Catch-up rate (1/s); higher is snappier
    lerp: f32,
}

impl Camera {
    pub fn new(view: Vec2, world: Vec2, lerp: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            view,
            world,
            lerp,
        }
    }

    fn clamped(&self, pos: Vec2) -> Vec2 {
        clamp_to_rect(pos, Vec2::ZERO, self.world - self.view)
    }

    /// Jump straight to `target` (centered, then clamped)
    pub fn snap_to(&mut self, target: Vec2) {
        self.pos = self.clamped(target - self.view * 0.5);
    }

    /// Move part of the way toward centering `target`
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        let desired = self.clamped(target - self.view * 0.5);
        let t = 1.0 - (-self.lerp * dt).exp();
        self.pos = self.clamped(self.pos + (desired - self.pos) * t);
    }
}
