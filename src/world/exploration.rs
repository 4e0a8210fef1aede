//! Chunk-based exploration memory for wander targets

use ahash::AHashSet;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cognition::collaborators::Explorer;
use crate::core::types::Vec2;

/// How many rings out from the current chunk to search
const MAX_SEARCH_RADIUS: i32 = 10;

#[derive(Debug, Clone)]
pub struct ChunkExplorer {
    chunk_size: f32,
    chunks_per_side: i32,
    visited: AHashSet<(i32, i32)>,
    rng: ChaCha8Rng,
}

impl ChunkExplorer {
    pub fn new(world_size: f32, chunk_size: f32, seed: u64) -> Self {
        let chunk_size = chunk_size.max(1.0);
        Self {
            chunk_size,
            chunks_per_side: (world_size / chunk_size).ceil().max(1.0) as i32,
            visited: AHashSet::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn chunk_of(&self, position: Vec2) -> (i32, i32) {
        (
            (position.x / self.chunk_size).floor() as i32,
            (position.y / self.chunk_size).floor() as i32,
        )
    }

    fn in_bounds(&self, (x, y): (i32, i32)) -> bool {
        (0..self.chunks_per_side).contains(&x) && (0..self.chunks_per_side).contains(&y)
    }

    pub fn is_visited(&self, position: Vec2) -> bool {
        self.visited.contains(&self.chunk_of(position))
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Unvisited in-bounds chunks on the square ring `radius` away from `center`
    fn ring(&self, (cx, cy): (i32, i32), radius: i32) -> Vec<(i32, i32)> {
        let mut chunks = Vec::new();
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx.abs().max(dy.abs()) != radius {
                    continue;
                }
                let chunk = (cx + dx, cy + dy);
                if self.in_bounds(chunk) && !self.visited.contains(&chunk) {
                    chunks.push(chunk);
                }
            }
        }
        chunks
    }
}

impl Explorer for ChunkExplorer {
    fn random_unexplored_point(&mut self, near: Vec2) -> Option<Vec2> {
        let center = self.chunk_of(near);
        for radius in 0..=MAX_SEARCH_RADIUS {
            let candidates = self.ring(center, radius);
            if candidates.is_empty() {
                continue;
            }
            let (x, y) = candidates[self.rng.gen_range(0..candidates.len())];
            let offset_x = self.rng.gen::<f32>() * self.chunk_size;
            let offset_y = self.rng.gen::<f32>() * self.chunk_size;
            return Some(Vec2::new(
                x as f32 * self.chunk_size + offset_x,
                y as f32 * self.chunk_size + offset_y,
            ));
        }
        None
    }

    fn mark_visited(&mut self, position: Vec2) {
        let chunk = self.chunk_of(position);
        if self.in_bounds(chunk) {
            self.visited.insert(chunk);
        }
    }
}
