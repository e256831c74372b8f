//! World layout and gameplay tuning
//!
//! Supplied by the host at session start and immutable afterwards. Every
//! field has a default so a host can send a partial JSON document.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected world configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("world dimensions must be positive (got {width}x{height})")]
    NonPositiveWorld { width: f32, height: f32 },
    #[error("gravity must be positive and finite (got {0})")]
    NonPositiveGravity(f32),
    #[error("question index {0} is bound to more than one gate")]
    DuplicateQuestion(u32),
    #[error("{what} at x={x} lies outside the world (width {width})")]
    OutOfBounds { what: &'static str, x: f32, width: f32 },
    #[error("invalid layout: {0}")]
    InvalidLayout(&'static str),
}

/// A question gate placement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateSpec {
    /// Horizontal center
    pub x: f32,
    /// Height of the gate's base above the ground
    #[serde(default)]
    pub elevation: f32,
    /// Index into the host's question bank
    pub question_index: u32,
}

/// An obstacle placement (always resting on the ground)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObstacleSpec {
    pub x: f32,
}

/// How collectibles are laid out across the world
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectibleLayout {
    /// No collectibles
    None,
    /// Explicit coin centers in world coordinates
    Positions { points: Vec<Vec2> },
    /// One coin every `spacing` units from `start_x`, each floating at one of
    /// `heights` (above ground) chosen by the seeded RNG
    Scatter {
        spacing: f32,
        start_x: f32,
        heights: Vec<f32>,
    },
}

impl Default for CollectibleLayout {
    fn default() -> Self {
        CollectibleLayout::Scatter {
            spacing: 160.0,
            start_x: 240.0,
            heights: vec![24.0, 72.0, 120.0],
        }
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub avatar_size: Vec2,
    /// Horizontal speed while run intent is held
    pub run_speed: f32,
    /// Upward velocity applied by a grounded jump
    pub jump_impulse: f32,
    /// Backward (x) and upward (y) knock-back magnitudes
    pub knockback: Vec2,
    pub knockback_secs: f32,
    pub flicker_secs: f32,
    pub coin_size: f32,
    pub gate_size: Vec2,
    pub obstacle_size: f32,
    /// Score per collectible
    pub coin_value: u32,
    /// Score per correct answer
    pub answer_bonus: u32,
    /// Delay between the last gate and the end of the session
    pub grace_secs: f32,
    pub view_size: Vec2,
    pub camera_lerp: f32,
    /// Disable the avatar body while a question is open
    pub freeze_on_question: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            avatar_size: Vec2::new(AVATAR_WIDTH, AVATAR_HEIGHT),
            run_speed: RUN_SPEED,
            jump_impulse: JUMP_IMPULSE,
            knockback: Vec2::new(KNOCKBACK_X, KNOCKBACK_Y),
            knockback_secs: KNOCKBACK_SECS,
            flicker_secs: FLICKER_SECS,
            coin_size: COIN_SIZE,
            gate_size: Vec2::new(GATE_WIDTH, GATE_HEIGHT),
            obstacle_size: OBSTACLE_SIZE,
            coin_value: COIN_VALUE,
            answer_bonus: ANSWER_BONUS,
            grace_secs: GRACE_SECS,
            view_size: Vec2::new(VIEW_WIDTH, VIEW_HEIGHT),
            camera_lerp: CAMERA_LERP,
            freeze_on_question: true,
        }
    }
}

/// Everything the host supplies at `start`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    pub duration_secs: u32,
    /// Thickness of the terrain strip along the bottom of the world
    pub ground_height: f32,
    pub tile_width: f32,
    pub spawn_x: f32,
    pub gates: Vec<GateSpec>,
    pub collectibles: CollectibleLayout,
    pub obstacles: Vec<ObstacleSpec>,
    /// Seed for the collectible scatter
    pub seed: u64,
    pub tuning: Tuning,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            gravity: GRAVITY,
            duration_secs: MATCH_DURATION_SECS,
            ground_height: GROUND_HEIGHT,
            tile_width: TILE_WIDTH,
            spawn_x: AVATAR_SPAWN_X,
            gates: Vec::new(),
            collectibles: CollectibleLayout::default(),
            obstacles: Vec::new(),
            seed: 1,
            tuning: Tuning::default(),
        }
    }
}

impl WorldConfig {
    /// An empty world: no gates, no coins, no obstacles
    pub fn empty(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            collectibles: CollectibleLayout::None,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Y coordinate of the top of the terrain
    pub fn ground_top(&self) -> f32 {
        self.height - self.ground_height
    }

    /// Check geometry and the one-gate-per-question invariant.
    ///
    /// Zero gates and zero duration are valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.width) || !positive(self.height) {
            return Err(ConfigError::NonPositiveWorld {
                width: self.width,
                height: self.height,
            });
        }
        if !positive(self.gravity) {
            return Err(ConfigError::NonPositiveGravity(self.gravity));
        }
        if !positive(self.tile_width) {
            return Err(ConfigError::InvalidLayout("tile_width must be positive"));
        }
        if !(self.ground_height >= 0.0 && self.ground_height < self.height) {
            return Err(ConfigError::InvalidLayout(
                "ground_height must be within the world height",
            ));
        }
        if !positive(self.tuning.avatar_size.x) || !positive(self.tuning.avatar_size.y) {
            return Err(ConfigError::InvalidLayout("avatar_size must be positive"));
        }

        let in_world = |x: f32| (0.0..=self.width).contains(&x);
        if !in_world(self.spawn_x) {
            return Err(ConfigError::OutOfBounds {
                what: "spawn",
                x: self.spawn_x,
                width: self.width,
            });
        }

        let mut seen = HashSet::new();
        for gate in &self.gates {
            if !seen.insert(gate.question_index) {
                return Err(ConfigError::DuplicateQuestion(gate.question_index));
            }
            if !in_world(gate.x) {
                return Err(ConfigError::OutOfBounds {
                    what: "gate",
                    x: gate.x,
                    width: self.width,
                });
            }
        }
        for obstacle in &self.obstacles {
            if !in_world(obstacle.x) {
                return Err(ConfigError::OutOfBounds {
                    what: "obstacle",
                    x: obstacle.x,
                    width: self.width,
                });
            }
        }

        match &self.collectibles {
            CollectibleLayout::None => {}
            CollectibleLayout::Positions { points } => {
                if let Some(p) = points.iter().find(|p| !in_world(p.x)) {
                    return Err(ConfigError::OutOfBounds {
                        what: "collectible",
                        x: p.x,
                        width: self.width,
                    });
                }
            }
            CollectibleLayout::Scatter {
                spacing, heights, ..
            } => {
                if !positive(*spacing) {
                    return Err(ConfigError::InvalidLayout("scatter spacing must be positive"));
                }
                if heights.is_empty() {
                    return Err(ConfigError::InvalidLayout("scatter needs at least one height"));
                }
            }
        }

        Ok(())
    }
}
