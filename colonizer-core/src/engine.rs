//! The growth engine: one run at a time, advanced one iteration per call.

use log::{debug, info, trace};

use crate::{
    attractor::AttractorSet,
    config::Config,
    error::ConfigError,
    grid::SpatialIndex,
    influence_buffer::InfluenceBuffer,
    phases,
    tree::{Node, NodeSequence, TreeRecord},
    types::{Point, TreeId},
};

/// What a call to [`GrowthEngine::step`] did.
#[derive(Debug, PartialEq)]
pub enum StepOutcome {
    /// No run is active; nothing happened.
    Idle,
    /// One iteration ran and the run continues.
    Grew {
        /// Nodes appended this iteration.
        spawned: usize,
        /// Attractors consumed this iteration.
        consumed: usize,
    },
    /// One iteration ran and ended the run.
    Finished(TreeRecord),
}

/// Owns every piece of mutable growth state.
///
/// Nothing outside the engine can touch the node sequence or the index, and
/// attractors are only changed through [`GrowthEngine::set_attractors`] and
/// [`GrowthEngine::clear_attractors`]. Iterations run only when the host
/// calls [`GrowthEngine::step`].
#[derive(Debug)]
pub struct GrowthEngine {
    cfg: Config,
    attractors: AttractorSet,
    nodes: NodeSequence,
    index: SpatialIndex,
    acc: InfluenceBuffer,
    killed: Vec<Point>,
    iteration: u32,
    running: bool,
    seed: Point,
    next_tree_id: TreeId,
}

impl GrowthEngine {
    /// Creates an idle engine after validating `cfg`.
    pub fn new(cfg: Config) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let index = SpatialIndex::new(cfg.cell_size());
        Ok(Self {
            cfg,
            attractors: AttractorSet::default(),
            nodes: NodeSequence::default(),
            index,
            acc: InfluenceBuffer::default(),
            killed: Vec::new(),
            iteration: 0,
            running: false,
            seed: Point::ZERO,
            next_tree_id: 1,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn attractors(&self) -> &AttractorSet {
        &self.attractors
    }

    /// Replaces the attractor field. Allowed mid-run.
    pub fn set_attractors(&mut self, positions: Vec<Point>) {
        self.attractors.replace(positions);
    }

    /// Empties the attractor field; a live run then ends on its next step.
    pub fn clear_attractors(&mut self) {
        self.attractors.clear();
    }

    /// Live nodes of the current run; empty when idle.
    pub fn nodes(&self) -> &[Node] {
        self.nodes.nodes()
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Attractors consumed so far in the current run.
    pub fn killed(&self) -> &[Point] {
        &self.killed
    }

    /// Iterations completed in the current run.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn seed(&self) -> Point {
        self.seed
    }

    /// Begins a run from the configured seed nodes.
    ///
    /// `seed` is recorded on the finished [`TreeRecord`] as provenance; it
    /// does not move the starting nodes. Does nothing if a run is active.
    pub fn start(&mut self, seed: Point) {
        if self.running {
            debug!("start ignored: growth already running");
            return;
        }

        self.nodes = NodeSequence::from_roots(&self.cfg.seed_nodes);
        self.killed.clear();
        self.acc.ensure_len(0);
        self.iteration = 0;
        self.seed = seed;
        self.index.clear();
        self.index.rebuild(self.nodes.nodes());
        self.running = true;

        debug!(
            "growth started: {} seed nodes, {} attractors, {} index cells",
            self.nodes.len(),
            self.attractors.len(),
            self.index.cell_count()
        );
    }

    /// Halts the run and discards its partial growth without producing a record.
    ///
    /// Attractors consumed during the run go back into the field. Does
    /// nothing when idle.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.nodes.clear();
        self.index.clear();
        let restored = self.killed.len();
        self.attractors.points.extend(self.killed.drain(..));
        debug!(
            "growth stopped after {} iterations, {restored} attractors restored",
            self.iteration
        );
        self.iteration = 0;
    }

    /// Swaps in new parameters, ending any active run without a record.
    ///
    /// Attractors and tree id allocation carry over. On error the engine
    /// is left untouched.
    pub fn reconfigure(&mut self, cfg: Config) -> Result<(), ConfigError> {
        cfg.validate()?;
        self.stop();
        self.index = SpatialIndex::new(cfg.cell_size());
        self.cfg = cfg;
        Ok(())
    }

    /// Forces a full rebuild of the spatial index from the live nodes.
    pub fn rebuild_index(&mut self) {
        self.index.rebuild(self.nodes.nodes());
    }

    /// Runs exactly one iteration if a run is active.
    pub fn step(&mut self) -> StepOutcome {
        if !self.running {
            return StepOutcome::Idle;
        }
        self.iteration += 1;

        let consumed = phases::attraction_phase(
            &self.nodes,
            &self.index,
            &mut self.attractors,
            &mut self.killed,
            &self.cfg,
            &mut self.acc,
        );
        let proposals = phases::growth_phase(&self.nodes, &self.index, &self.acc, &self.cfg);
        let spawned = phases::commit_phase(&mut self.nodes, &mut self.index, proposals).len();

        if self.iteration % self.cfg.rebuild_interval == 0 {
            trace!("iteration {}: rebuilding spatial index", self.iteration);
            self.rebuild_index();
        }

        if self.attractors.is_empty()
            || self.iteration > self.cfg.max_iterations
            || self.nodes.len() > self.cfg.max_nodes
        {
            return StepOutcome::Finished(self.finish());
        }

        StepOutcome::Grew { spawned, consumed }
    }

    fn finish(&mut self) -> TreeRecord {
        self.running = false;
        self.index.clear();

        let record = TreeRecord {
            id: self.next_tree_id,
            seed: self.seed,
            nodes: self.nodes.take(),
            killed_attractors: std::mem::take(&mut self.killed),
            visible: true,
        };
        self.next_tree_id += 1;

        info!(
            "growth finished after {} iterations: {} nodes, {} consumed, {} attractors left",
            self.iteration,
            record.nodes.len(),
            record.killed_attractors.len(),
            self.attractors.len()
        );
        record
    }
}
