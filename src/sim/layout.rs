//! Collectible placement

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::CollectibleLayout;

/// Resolve a collectible layout into coin centers.
///
/// Scatter heights are measured from `ground_top` to the bottom of the coin.
/// The same seed always yields the same coins.
pub fn collectible_positions(
    layout: &CollectibleLayout,
    world_width: f32,
    ground_top: f32,
    coin_size: f32,
    seed: u64,
) -> Vec<Vec2> {
    match layout {
        CollectibleLayout::None => Vec::new(),
        CollectibleLayout::Positions { points } => points.clone(),
        CollectibleLayout::Scatter {
            spacing,
            start_x,
            heights,
        } => {
            if heights.is_empty() || *spacing <= 0.0 {
                return Vec::new();
            }
            let mut rng = Pcg32::seed_from_u64(seed);
            let half = coin_size * 0.5;
            let mut out = Vec::new();
            let mut x = start_x.max(half);
            while x <= world_width - half {
                let h = heights[rng.random_range(0..heights.len())];
                out.push(Vec2::new(x, ground_top - h - half));
                x += spacing;
            }
            out
        }
    }
}
