use crate::types::NodeId;
use glam::Vec2;

/// Per-iteration side table of attraction pulls, keyed by node.
///
/// For each `NodeId`, this buffer stores:
///
/// - The sum of the unit directions from the node toward every attractor
///   that picked it as nearest this iteration.
/// - The number of those attractors.
///
/// The scratch state lives here rather than on the nodes themselves, so
/// finished nodes never carry stale accumulators. The engine clears the
/// table unconditionally at the start of every iteration.
#[derive(Debug, Default)]
pub struct InfluenceBuffer {
    /// Accumulated direction vectors for each node.
    dir: Vec<Vec2>,
    /// Number of contributions for each node.
    count: Vec<u32>,
}

impl InfluenceBuffer {
    /// Creates a new [`InfluenceBuffer`] covering `len` nodes.
    ///
    /// All accumulated directions start at `Vec2::ZERO` and all counts at `0`.
    pub fn with_len(len: usize) -> Self {
        Self {
            dir: vec![Vec2::ZERO; len],
            count: vec![0; len],
        }
    }

    /// Resizes the table to `len` nodes and clears every entry.
    ///
    /// Entries are cleared even if the length was already correct; callers
    /// rely on this to start each iteration from zero.
    ///
    /// ### Parameters
    /// - `len` - Number of nodes that existed before this iteration's spawns.
    pub fn ensure_len(&mut self, len: usize) {
        if self.dir.len() != len {
            self.dir.resize(len, Vec2::ZERO);
            self.count.resize(len, 0);
        }
        self.clear();
    }

    pub fn len(&self) -> usize {
        self.count.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count.is_empty()
    }

    /// Clears all accumulated influences without changing the length.
    pub fn clear(&mut self) {
        self.dir.fill(Vec2::ZERO);
        self.count.fill(0);
    }

    /// Adds one directional pull for the given node.
    ///
    /// ### Parameters
    /// - `id` - Node receiving the pull.
    /// - `dir` - Unit direction from the node toward the attractor.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds for the table.
    #[inline]
    pub fn add(&mut self, id: NodeId, dir: Vec2) {
        self.dir[id] += dir;
        self.count[id] += 1;
    }

    /// Returns the average pull on a node, or `Vec2::ZERO` if it has none.
    ///
    /// The average is not normalized; opposing pulls can cancel to zero.
    #[inline]
    pub fn avg_dir(&self, id: NodeId) -> Vec2 {
        let c = self.count[id];
        if c == 0 {
            Vec2::ZERO
        } else {
            self.dir[id] / (c as f32)
        }
    }

    /// Number of attractors that pulled on `id` this iteration.
    #[inline]
    pub fn count(&self, id: NodeId) -> u32 {
        self.count[id]
    }

    #[inline]
    pub fn is_influenced(&self, id: NodeId) -> bool {
        self.count[id] > 0
    }

    /// Iterates, in ascending order, over nodes with at least one pull.
    pub fn influenced_indices(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.count
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| if c > 0 { Some(i) } else { None })
    }
}
