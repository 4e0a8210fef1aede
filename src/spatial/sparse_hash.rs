//! Sparse hash grid for radius queries

use ahash::AHashMap;

use crate::core::types::Vec2;

/// Buckets items by the grid cell their position falls in
#[derive(Debug, Clone)]
pub struct SparseHashGrid<T> {
    cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<(T, Vec2)>>,
}

impl<T: Copy> SparseHashGrid<T> {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(f32::EPSILON),
            cells: AHashMap::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, item: T, pos: Vec2) {
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push((item, pos));
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Vec::is_empty)
    }

    /// Items within `radius` of `center`, with their distance
    pub fn query_radius(&self, center: Vec2, radius: f32) -> impl Iterator<Item = (T, f32)> + '_ {
        let (cx, cy) = self.cell_coord(center);
        let reach = (radius / self.cell_size).ceil().max(0.0) as i32;

        (-reach..=reach).flat_map(move |dx| {
            (-reach..=reach).flat_map(move |dy| {
                self.cells
                    .get(&(cx + dx, cy + dy))
                    .into_iter()
                    .flatten()
                    .filter_map(move |&(item, pos)| {
                        let distance = center.distance(&pos);
                        (distance <= radius).then_some((item, distance))
                    })
            })
        })
    }

    /// Rebuild grid from positions
    pub fn rebuild(&mut self, items: impl Iterator<Item = (T, Vec2)>) {
        self.clear();
        for (item, pos) in items {
            self.insert(item, pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_query_crosses_cells() {
        let mut grid = SparseHashGrid::new(10.0);
        grid.insert(1usize, Vec2::new(0.0, 0.0));
        grid.insert(2, Vec2::new(25.0, 0.0));
        grid.insert(3, Vec2::new(-29.0, 0.0));
        grid.insert(4, Vec2::new(0.0, 31.0));

        let mut found: Vec<usize> = grid.query_radius(Vec2::ZERO, 30.0).map(|(i, _)| i).collect();
        found.sort_unstable();
        assert_eq!(found, vec![1, 2, 3]);
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let mut grid = SparseHashGrid::new(5.0);
        grid.insert(1u32, Vec2::new(1.0, 1.0));
        grid.rebuild([(7u32, Vec2::new(50.0, 50.0))].into_iter());
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.query_radius(Vec2::new(50.0, 50.0), 1.0).count(), 1);
        assert_eq!(grid.query_radius(Vec2::new(1.0, 1.0), 1.0).count(), 0);
    }
}
