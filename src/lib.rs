//! Quiz Runner - side-scrolling runner simulation core
//!
//! Core modules:
//! - `sim`: Fixed-timestep world simulation (avatar, terrain, props, camera, clock)
//! - `controller`: Session orchestration and the host protocol
//! - `config`: Data-driven world layout and tuning
//! - `hud`: Read-only scoreboard projection
//! - `web`: wasm-bindgen host binding (wasm32 only)

pub mod config;
pub mod controller;
pub mod hud;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{CollectibleLayout, ConfigError, GateSpec, ObstacleSpec, Tuning, WorldConfig};
pub use controller::{
    Callbacks, EndReason, NullHost, SessionError, SessionHost, SessionOutcome, SessionPhase,
    SimulationController,
};
pub use hud::Scoreboard;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Frame delta clamp for physics (the clock still sees real time)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Polled events kept when the host never drains
    pub const MAX_QUEUED_EVENTS: usize = 256;

    /// World dimensions (pixels, y grows downward)
    pub const WORLD_WIDTH: f32 = 3200.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    pub const GRAVITY: f32 = 900.0;
    /// Match length in seconds
    pub const MATCH_DURATION_SECS: u32 = 60;

    /// Terrain
    pub const GROUND_HEIGHT: f32 = 64.0;
    pub const TILE_WIDTH: f32 = 64.0;

    /// Avatar defaults
    pub const AVATAR_WIDTH: f32 = 32.0;
    pub const AVATAR_HEIGHT: f32 = 48.0;
    pub const AVATAR_SPAWN_X: f32 = 64.0;
    pub const RUN_SPEED: f32 = 200.0;
    pub const JUMP_IMPULSE: f32 = 450.0;

    /// Obstacle knock-back (backward, upward)
    pub const KNOCKBACK_X: f32 = 220.0;
    pub const KNOCKBACK_Y: f32 = 260.0;
    /// Seconds the avatar ignores run input and further obstacles after a hit
    pub const KNOCKBACK_SECS: f32 = 0.35;
    pub const FLICKER_SECS: f32 = 0.6;

    /// Prop sizes
    pub const COIN_SIZE: f32 = 24.0;
    pub const GATE_WIDTH: f32 = 40.0;
    pub const GATE_HEIGHT: f32 = 64.0;
    pub const OBSTACLE_SIZE: f32 = 32.0;

    /// Scoring
    pub const COIN_VALUE: u32 = 10;
    pub const ANSWER_BONUS: u32 = 50;

    /// Delay between the last gate and the session sealing
    pub const GRACE_SECS: f32 = 2.0;

    /// Camera
    pub const VIEW_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 600.0;
    pub const CAMERA_LERP: f32 = 5.0;
}

/// Clamp a point into the rectangle `[min, max]`, per axis.
///
/// Unlike `Vec2::clamp` this tolerates `min > max` (a view larger than the
/// world) by pinning to `min`.
#[inline]
pub fn clamp_to_rect(p: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    Vec2::new(p.x.min(max.x).max(min.x), p.y.min(max.y).max(min.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_rect_inside() {
        let p = clamp_to_rect(Vec2::new(5.0, 5.0), Vec2::ZERO, Vec2::splat(10.0));
        assert_eq!(p, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_clamp_to_rect_degenerate() {
        // max below min pins to min
        let p = clamp_to_rect(Vec2::new(50.0, -3.0), Vec2::ZERO, Vec2::new(-10.0, -10.0));
        assert_eq!(p, Vec2::ZERO);
    }
}
