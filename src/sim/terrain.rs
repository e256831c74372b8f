//! Static ground tiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Aabb;

/// Immovable collision geometry along the bottom of the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    tiles: Vec<Aabb>,
    top: f32,
}

impl Terrain {
    /// Tile the strip `[0, width] x [height - ground_height, height]`.
    ///
    /// The last tile is cut short so no tile sticks out past `width`.
    pub fn tiled(width: f32, height: f32, ground_height: f32, tile_width: f32) -> Self {
        let top = height - ground_height;
        let mut tiles = Vec::new();
        if ground_height > 0.0 {
            let mut x = 0.0;
            while x < width {
                let right = (x + tile_width).min(width);
                tiles.push(Aabb::new(Vec2::new(x, top), Vec2::new(right, height)));
                x = right;
            }
        }
        Self { tiles, top }
    }

    pub fn tiles(&self) -> &[Aabb] {
        &self.tiles
    }

    /// Y coordinate of the walking surface
    pub fn top(&self) -> f32 {
        self.top
    }
}
