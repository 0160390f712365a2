use crate::types::{NodeId, Point, TreeId};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub pos: Point,
    /// Always smaller than this node's own id.
    pub parent: Option<NodeId>,
}

/// The live, append-only node list of a growth run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeSequence {
    nodes: Vec<Node>,
}

/// Finished output of one growth run.
///
/// Immutable once produced, except for `visible`, which the host may toggle.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeRecord {
    pub id: TreeId,
    /// Provenance only: growth always starts from the configured seed nodes.
    pub seed: Point,
    pub nodes: Vec<Node>,
    pub killed_attractors: Vec<Point>,
    pub visible: bool,
}

impl Node {
    pub fn new_root(pos: Point) -> Self {
        Self { pos, parent: None }
    }

    pub fn new_child(pos: Point, parent: NodeId) -> Self {
        Self {
            pos,
            parent: Some(parent),
        }
    }
}

impl NodeSequence {
    pub fn from_roots(roots: &[Point]) -> Self {
        Self {
            nodes: roots.iter().map(|&p| Node::new_root(p)).collect(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn pos(&self, id: NodeId) -> Point {
        self.nodes[id].pos
    }

    /// Appends a child of `parent` and returns its id.
    ///
    /// ### Panics
    /// Panics if `parent` is not an existing node.
    pub fn push_child(&mut self, parent: NodeId, pos: Point) -> NodeId {
        assert!(parent < self.nodes.len(), "parent {parent} does not exist");
        let id = self.nodes.len();
        self.nodes.push(Node::new_child(pos, parent));
        id
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Takes the nodes out, leaving the sequence empty.
    pub fn take(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.nodes)
    }

    /// Exhaustive nearest-node scan; returns the id and squared distance.
    pub fn find_nearest_node(&self, pos: Point) -> Option<(NodeId, f32)> {
        let mut best = None;
        let mut best_d2 = f32::INFINITY;
        for (id, n) in self.nodes.iter().enumerate() {
            let d2 = (n.pos - pos).length_squared();
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some(id);
            }
        }
        best.map(|id| (id, best_d2))
    }
}

/// Parent-to-child segments of a node list, skipping dangling parent links.
pub fn edges(nodes: &[Node]) -> impl Iterator<Item = (Point, Point)> + '_ {
    nodes.iter().filter_map(|n| {
        let parent = nodes.get(n.parent?)?;
        Some((parent.pos, n.pos))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn push_child_links_to_parent() {
        let mut seq = NodeSequence::from_roots(&[Vec2::ZERO]);
        let a = seq.push_child(0, Vec2::new(1.0, 0.0));
        let b = seq.push_child(a, Vec2::new(2.0, 0.0));

        assert_eq!((a, b), (1, 2));
        assert_eq!(seq.nodes()[b].parent, Some(a));
        assert!(seq.nodes()[0].parent.is_none());
    }

    #[test]
    #[should_panic(expected = "does not exist")]
    fn push_child_rejects_missing_parent() {
        let mut seq = NodeSequence::from_roots(&[Vec2::ZERO]);
        seq.push_child(3, Vec2::ONE);
    }

    #[test]
    fn find_nearest_node_scans_everything() {
        let seq = NodeSequence::from_roots(&[Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]);
        assert_eq!(seq.find_nearest_node(Vec2::new(7.0, 0.0)), Some((1, 9.0)));
        assert_eq!(NodeSequence::default().find_nearest_node(Vec2::ZERO), None);
    }

    #[test]
    fn edges_skip_roots_and_dangling_links() {
        let nodes = vec![
            Node::new_root(Vec2::ZERO),
            Node::new_child(Vec2::new(1.0, 0.0), 0),
            Node::new_child(Vec2::new(5.0, 5.0), 9),
        ];
        let segs: Vec<_> = edges(&nodes).collect();
        assert_eq!(segs, vec![(Vec2::ZERO, Vec2::new(1.0, 0.0))]);
    }
}
