//! Props: everything the avatar can touch besides terrain
//!
//! Collectibles, question gates and obstacles share one closed variant so
//! overlap handling dispatches on kind in a single place.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Body;

/// What a prop does on avatar overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropKind {
    /// Destroyed on first touch, grants `value` points
    Collectible { value: u32 },
    /// Destroyed on first touch, opens question `question_index`
    Gate { question_index: u32, collected: bool },
    /// Never destroyed, knocks the avatar back
    Obstacle,
}

/// A prop in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prop {
    pub id: u32,
    pub body: Body,
    pub kind: PropKind,
}

impl Prop {
    pub fn collectible(id: u32, pos: Vec2, size: f32, value: u32) -> Self {
        Self {
            id,
            body: Body::new(pos, Vec2::splat(size)),
            kind: PropKind::Collectible { value },
        }
    }

    pub fn gate(id: u32, pos: Vec2, size: Vec2, question_index: u32) -> Self {
        Self {
            id,
            body: Body::new(pos, size),
            kind: PropKind::Gate {
                question_index,
                collected: false,
            },
        }
    }

    pub fn obstacle(id: u32, pos: Vec2, size: f32) -> Self {
        Self {
            id,
            body: Body::new(pos, Vec2::splat(size)),
            kind: PropKind::Obstacle,
        }
    }

    pub fn question_index(&self) -> Option<u32> {
        match self.kind {
            PropKind::Gate { question_index, .. } => Some(question_index),
            _ => None,
        }
    }
}
