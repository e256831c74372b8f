//! Base positioned rectangle shared by every simulated object

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap; boxes that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// A positioned, velocity-bearing rectangle that can be switched off.
///
/// A disabled body neither moves nor takes part in collision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub enabled: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            enabled: true,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    /// True when both bodies are enabled and their boxes overlap
    pub fn touches(&self, other: &Body) -> bool {
        self.enabled && other.enabled && self.aabb().overlaps(&other.aabb())
    }

    /// Switch the body on or off. Switching off drops any velocity so the
    /// body resumes from rest.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.vel = Vec2::ZERO;
        }
    }
}
