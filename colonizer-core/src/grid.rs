//! Uniform grid over node positions, used to accelerate nearest-node queries.
//!
//! The index is never the source of truth for positions: it only maps cell
//! keys to node ids, and can be rebuilt from the node list at any time.

use std::collections::HashMap;

use crate::{
    tree::Node,
    types::{NodeId, Point},
};

/// Integer cell coordinates.
pub type CellKey = (i32, i32);

/// Sparse bucket grid keyed by cell coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialIndex {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<NodeId>>,
}

impl SpatialIndex {
    /// Creates an empty index with square cells of side `cell_size`.
    pub fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing `pos`.
    #[inline]
    pub fn cell_of(&self, pos: Point) -> CellKey {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "far positions saturate to the edge cells"
        )]
        let key = (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        );
        key
    }

    /// Adds node `id` under the cell of its current position.
    ///
    /// Inserting an id that is already in that cell does nothing. Ids out of
    /// range for `nodes` are ignored.
    pub fn insert(&mut self, id: NodeId, nodes: &[Node]) {
        let Some(node) = nodes.get(id) else {
            return;
        };
        let bucket = self.cells.entry(self.cell_of(node.pos)).or_default();
        if !bucket.contains(&id) {
            bucket.push(id);
        }
    }

    /// Clears every bucket and reinserts all `nodes` by current position.
    pub fn rebuild(&mut self, nodes: &[Node]) {
        self.cells.clear();
        for id in 0..nodes.len() {
            self.insert(id, nodes);
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Node ids in every cell within `cell_radius` (Chebyshev) of `pos`'s cell.
    ///
    /// The result is sorted ascending with duplicates removed.
    pub fn query(&self, pos: Point, cell_radius: i32) -> Vec<NodeId> {
        let (gx, gy) = self.cell_of(pos);
        let mut out = Vec::new();
        for dy in -cell_radius..=cell_radius {
            for dx in -cell_radius..=cell_radius {
                let key = (gx.saturating_add(dx), gy.saturating_add(dy));
                if let Some(bucket) = self.cells.get(&key) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of entries across all cells.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn roots(points: &[(f32, f32)]) -> Vec<Node> {
        points
            .iter()
            .map(|&(x, y)| Node::new_root(Vec2::new(x, y)))
            .collect()
    }

    #[test]
    fn cell_of_floors_negative_coordinates() {
        let index = SpatialIndex::new(10.0);
        assert_eq!(index.cell_of(Vec2::new(0.0, 9.99)), (0, 0));
        assert_eq!(index.cell_of(Vec2::new(-0.1, 10.0)), (-1, 1));
        assert_eq!(index.cell_of(Vec2::new(-10.0, -10.1)), (-1, -2));
    }

    #[test]
    fn insert_is_idempotent() {
        let nodes = roots(&[(1.0, 1.0)]);
        let mut index = SpatialIndex::new(10.0);
        index.insert(0, &nodes);
        index.insert(0, &nodes);
        index.insert(5, &nodes);

        assert_eq!(index.len(), 1);
        assert_eq!(index.query(Vec2::new(1.0, 1.0), 0), vec![0]);
    }

    #[test]
    fn query_covers_chebyshev_neighbourhood() {
        let nodes = roots(&[(5.0, 5.0), (15.0, 15.0), (25.0, 5.0), (-5.0, -5.0)]);
        let mut index = SpatialIndex::new(10.0);
        index.rebuild(&nodes);

        assert_eq!(index.query(Vec2::new(5.0, 5.0), 0), vec![0]);
        assert_eq!(index.query(Vec2::new(5.0, 5.0), 1), vec![0, 1, 3]);
        assert_eq!(index.query(Vec2::new(5.0, 5.0), 2), vec![0, 1, 2, 3]);
        assert!(index.query(Vec2::new(500.0, 5.0), 3).is_empty());
    }

    #[test]
    fn far_positions_clamp_to_edge_cells() {
        let nodes = roots(&[(1.0e12, 0.0), (-1.0e12, -1.0e12)]);
        let mut index = SpatialIndex::new(10.0);
        index.rebuild(&nodes);

        assert_eq!(index.cell_of(Vec2::new(1.0e12, 0.0)), (i32::MAX, 0));
        assert_eq!(index.query(Vec2::new(1.0e12, 5.0), 3), vec![0]);
        assert_eq!(index.query(Vec2::new(-1.0e12, -1.0e12), 3), vec![1]);
    }

    #[test]
    fn rebuild_heals_missed_inserts() {
        let nodes = roots(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let mut index = SpatialIndex::new(10.0);
        index.insert(0, &nodes);

        assert_eq!(index.query(Vec2::ZERO, 1), vec![0]);
        index.rebuild(&nodes);
        assert_eq!(index.query(Vec2::ZERO, 1), vec![0, 1, 2]);
    }

    #[test]
    fn clear_empties_every_cell() {
        let nodes = roots(&[(1.0, 1.0), (100.0, 100.0)]);
        let mut index = SpatialIndex::new(10.0);
        index.rebuild(&nodes);
        assert_eq!(index.cell_count(), 2);

        index.clear();
        assert!(index.is_empty());
        assert!(index.query(Vec2::new(1.0, 1.0), 5).is_empty());
    }

    proptest! {
        #[test]
        fn rebuild_matches_incremental_inserts(
            points in prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 1..80),
            probe in (-500.0f32..500.0, -500.0f32..500.0),
            radius in 0i32..4,
            cell in 1.0f32..60.0,
        ) {
            let nodes = roots(&points);

            let mut incremental = SpatialIndex::new(cell);
            for id in 0..nodes.len() {
                incremental.insert(id, &nodes);
                // Repeat inserts must not create duplicates.
                incremental.insert(id / 2, &nodes);
            }

            let mut rebuilt = SpatialIndex::new(cell);
            rebuilt.rebuild(&nodes);

            let probe = Vec2::new(probe.0, probe.1);
            prop_assert_eq!(incremental.query(probe, radius), rebuilt.query(probe, radius));
            prop_assert_eq!(incremental.len(), nodes.len());
        }
    }
}
