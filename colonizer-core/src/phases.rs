//! The phases of one growth iteration.
//!
//! A single iteration runs, in order:
//! 1. [`attraction_phase`]: every attractor finds its nearest node (see
//!    [`find_nearest_node`]) and is either consumed or pulls on that node,
//!    accumulating directions in an [`InfluenceBuffer`].
//! 2. [`growth_phase`]: every pulled node proposes one child along its
//!    averaged pull; proposals that crowd an existing node or an earlier
//!    proposal are dropped.
//! 3. [`commit_phase`]: the accepted children are appended to the
//!    [`NodeSequence`] and inserted into the [`SpatialIndex`].

use crate::{
    attractor::AttractorSet,
    config::Config,
    grid::SpatialIndex,
    influence_buffer::InfluenceBuffer,
    tree::{Node, NodeSequence},
    types::{NodeId, Point},
};

/// Finds the node nearest to `pos`, returning its id and squared distance.
///
/// The search walks outward through the index one cell ring at a time,
/// starting at radius 1 and stopping as soon as the best candidate lies
/// within `cfg.attraction_distance`, up to [`Config::max_search_cells`].
/// If that bound is reached without such a candidate, it falls back to an
/// exhaustive scan, so a stale or incomplete index can never hide a node.
///
/// ### Returns
/// `None` only when `nodes` is empty.
pub fn find_nearest_node(
    pos: Point,
    nodes: &NodeSequence,
    index: &SpatialIndex,
    cfg: &Config,
) -> Option<(NodeId, f32)> {
    if nodes.is_empty() {
        return None;
    }

    let attract2 = cfg.attraction_distance * cfg.attraction_distance;
    let mut best: Option<(NodeId, f32)> = None;

    for radius in 1..=cfg.max_search_cells() {
        let candidates = index.query(pos, radius);
        for id in candidates {
            let Some(node) = nodes.nodes().get(id) else {
                continue;
            };
            let d2 = node.pos.distance_squared(pos);
            if best.is_none_or(|(_, b)| d2 < b) {
                best = Some((id, d2));
            }
        }
        if best.is_some_and(|(_, d2)| d2 <= attract2) {
            return best;
        }
    }

    nodes.find_nearest_node(pos)
}

/// Consumes attractors within kill distance and accumulates the pull of
/// the rest onto their nearest nodes.
///
/// Attractors are visited from last to first, so removing the current one
/// with [`AttractorSet::swap_remove`] only moves an already-visited entry.
/// For each attractor, with `d` the distance to its nearest node:
///
/// - `d <= kill_distance`: the attractor is removed and appended to `killed`.
/// - otherwise, `d <= attraction_distance`: the unit direction from the node
///   toward the attractor is added to `acc` for that node.
///
/// `acc` is resized to the current node count and cleared first.
///
/// ### Returns
/// The number of attractors consumed.
pub fn attraction_phase(
    nodes: &NodeSequence,
    index: &SpatialIndex,
    attractors: &mut AttractorSet,
    killed: &mut Vec<Point>,
    cfg: &Config,
    acc: &mut InfluenceBuffer,
) -> usize {
    let kill2 = cfg.kill_distance * cfg.kill_distance;
    let attract2 = cfg.attraction_distance * cfg.attraction_distance;
    let mut consumed = 0;

    acc.ensure_len(nodes.len());

    for i in (0..attractors.len()).rev() {
        let a = attractors.points[i];
        let Some((id, d2)) = find_nearest_node(a, nodes, index, cfg) else {
            continue;
        };

        if d2 <= kill2 {
            killed.push(attractors.swap_remove(i));
            consumed += 1;
        } else if d2 <= attract2 {
            let dir = (a - nodes.pos(id)).normalize_or_zero();
            acc.add(id, dir);
        }
    }

    consumed
}

/// Proposes one child for every node that was pulled this iteration.
///
/// Only nodes covered by `acc` (those that existed before this iteration)
/// are considered, so no node spawns twice per iteration. A proposal sits
/// `cfg.segment_length` from its parent along the normalized average pull.
/// It is dropped when:
///
/// - the average pull is zero (attractors cancelled out), or
/// - an existing node or an earlier accepted proposal lies closer than
///   `segment_length / 2`.
///
/// Existing nodes are checked through the index, or by scanning every node
/// when the gap spans more cells than [`Config::max_search_cells`].
///
/// ### Returns
/// The accepted children, in parent order, not yet part of `nodes`.
pub fn growth_phase(
    nodes: &NodeSequence,
    index: &SpatialIndex,
    acc: &InfluenceBuffer,
    cfg: &Config,
) -> Vec<Node> {
    let min_gap = cfg.segment_length * 0.5;
    let min_gap2 = min_gap * min_gap;
    #[allow(
        clippy::cast_possible_truncation,
        reason = "segment length is validated finite and comparable to the cell size"
    )]
    let gap_cells = ((min_gap / index.cell_size()).ceil() as i32).max(1);
    // Past the nearest-search bound a ring query costs more than a plain scan.
    let scan_all = gap_cells > cfg.max_search_cells();

    let mut spawned: Vec<Node> = Vec::with_capacity(16);

    for id in acc.influenced_indices() {
        let avg = acc.avg_dir(id);
        if avg.length_squared() == 0.0 {
            continue;
        }
        let dir = avg.normalize();
        let candidate = nodes.pos(id) + dir * cfg.segment_length;

        let too_close = |n: &Node| n.pos.distance_squared(candidate) < min_gap2;
        let crowds_existing = if scan_all {
            nodes.nodes().iter().any(too_close)
        } else {
            index
                .query(candidate, gap_cells)
                .into_iter()
                .any(|other| nodes.nodes().get(other).is_some_and(too_close))
        };
        if crowds_existing {
            continue;
        }

        let crowds_spawned = spawned
            .iter()
            .any(|n| n.pos.distance_squared(candidate) < min_gap2);
        if crowds_spawned {
            continue;
        }

        spawned.push(Node::new_child(candidate, id));
    }

    spawned
}

/// Appends `spawned` to `nodes` and registers each new node in `index`.
///
/// ### Returns
/// The ids assigned to the new nodes, in order.
pub fn commit_phase(
    nodes: &mut NodeSequence,
    index: &mut SpatialIndex,
    spawned: Vec<Node>,
) -> Vec<NodeId> {
    let mut new_ids = Vec::with_capacity(spawned.len());
    for node in spawned {
        let Some(parent) = node.parent else {
            continue;
        };
        let id = nodes.push_child(parent, node.pos);
        index.insert(id, nodes.nodes());
        new_ids.push(id);
    }
    new_ids
}
