//! The player-controlled runner

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Body;

/// Animation the host should play for the avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimState {
    #[default]
    Idle,
    Running,
    Jumping,
}

/// The avatar: a body plus movement state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub body: Body,
    /// Resting on terrain, as reported by the last collision pass
    pub grounded: bool,
    pub facing_right: bool,
    pub anim: AnimState,
    /// Seconds of hit flicker left (visual only)
    pub flicker: f32,
    /// Seconds left in which run input and obstacles are ignored
    pub stagger: f32,
}

impl Avatar {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            body: Body::new(pos, size),
            grounded: false,
            facing_right: true,
            anim: AnimState::Idle,
            flicker: 0.0,
            stagger: 0.0,
        }
    }

    /// Count down hit timers
    pub fn update_timers(&mut self, dt: f32) {
        self.flicker = (self.flicker - dt).max(0.0);
        self.stagger = (self.stagger - dt).max(0.0);
    }

    /// Record the contact flag from the collision pass
    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
        if !grounded {
            self.anim = AnimState::Jumping;
        }
    }

    /// Apply horizontal intent: full run speed forward, or stop.
    ///
    /// Ignored while staggered so a knock-back is not cancelled on the next
    /// step.
    pub fn apply_run(&mut self, active: bool, run_speed: f32) {
        if self.stagger > 0.0 {
            return;
        }
        if active {
            self.body.vel.x = run_speed;
            self.facing_right = true;
        } else {
            self.body.vel.x = 0.0;
        }
        if self.grounded {
            self.anim = if active {
                AnimState::Running
            } else {
                AnimState::Idle
            };
        }
    }

    /// Jump if resting on terrain. Airborne requests change nothing.
    pub fn try_jump(&mut self, impulse: f32) -> bool {
        if !self.grounded || !self.body.enabled {
            return false;
        }
        self.body.vel.y = -impulse;
        self.grounded = false;
        self.anim = AnimState::Jumping;
        true
    }

    /// Obstacles only bite when not already staggered
    pub fn can_be_knocked(&self) -> bool {
        self.stagger <= 0.0
    }

    /// Push the avatar back (against its facing) and up
    pub fn knock_back(&mut self, impulse: Vec2, stagger: f32, flicker: f32) {
        let back = if self.facing_right { -1.0 } else { 1.0 };
        self.body.vel = Vec2::new(back * impulse.x, -impulse.y);
        self.grounded = false;
        self.anim = AnimState::Jumping;
        self.stagger = stagger;
        self.flicker = flicker;
    }

    pub fn is_flickering(&self) -> bool {
        self.flicker > 0.0
    }
}
