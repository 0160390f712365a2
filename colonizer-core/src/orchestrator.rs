//! Lifecycle owner: drives the engine from host ticks and keeps finished trees.

use std::fmt;

use glam::Vec2;
use log::debug;

use crate::{
    config::Config,
    engine::{GrowthEngine, StepOutcome},
    error::ConfigError,
    render::FrameState,
    tree::TreeRecord,
    types::{Point, TreeId},
};

/// Control messages a host sends to the [`Orchestrator`].
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Start(Point),
    Stop,
    SetCollapsed(bool),
    ToggleCollapsed,
    SetTreeVisible { id: TreeId, visible: bool },
    ReplaceAttractors(Vec<Point>),
    ClearAttractors,
    RebuildIndex,
}

type FinishCallback = Box<dyn FnMut(&TreeRecord)>;

/// Owns one [`GrowthEngine`], the finished trees, and the display mode.
///
/// The host calls [`Orchestrator::tick`] once per scheduling slot; each
/// tick runs at most one iteration.
pub struct Orchestrator {
    engine: GrowthEngine,
    saved: Vec<TreeRecord>,
    collapsed: bool,
    on_finish: Option<FinishCallback>,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("engine", &self.engine)
            .field("saved", &self.saved.len())
            .field("collapsed", &self.collapsed)
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}

impl Orchestrator {
    pub fn new(cfg: Config) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: GrowthEngine::new(cfg)?,
            saved: Vec::new(),
            collapsed: false,
            on_finish: None,
        })
    }

    /// Registers the callback invoked once per naturally finished run.
    pub fn with_on_finish(mut self, callback: impl FnMut(&TreeRecord) + 'static) -> Self {
        self.on_finish = Some(Box::new(callback));
        self
    }

    pub fn engine(&self) -> &GrowthEngine {
        &self.engine
    }

    pub fn start(&mut self, seed: Point) {
        self.engine.start(seed);
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn saved_trees(&self) -> &[TreeRecord] {
        &self.saved
    }

    pub fn latest_tree(&self) -> Option<&TreeRecord> {
        self.saved.last()
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Stops any run and applies new parameters. See [`GrowthEngine::reconfigure`].
    pub fn reconfigure(&mut self, cfg: Config) -> Result<(), ConfigError> {
        self.engine.reconfigure(cfg)
    }

    /// Runs one scheduled unit of work.
    ///
    /// Returns `true` while a run remains active afterwards, so the host
    /// knows whether to schedule another tick.
    pub fn tick(&mut self) -> bool {
        match self.engine.step() {
            StepOutcome::Idle => false,
            StepOutcome::Grew { .. } => true,
            StepOutcome::Finished(record) => {
                if let Some(callback) = self.on_finish.as_mut() {
                    callback(&record);
                }
                self.saved.push(record);
                false
            }
        }
    }

    /// Applies one control message.
    pub fn send(&mut self, command: Command) {
        debug!("command: {command:?}");
        match command {
            Command::Start(seed) => self.start(seed),
            Command::Stop => self.stop(),
            Command::SetCollapsed(collapsed) => self.collapsed = collapsed,
            Command::ToggleCollapsed => self.collapsed = !self.collapsed,
            Command::SetTreeVisible { id, visible } => {
                if let Some(tree) = self.saved.iter_mut().find(|t| t.id == id) {
                    tree.visible = visible;
                }
            }
            Command::ReplaceAttractors(points) => self.engine.set_attractors(points),
            Command::ClearAttractors => self.engine.clear_attractors(),
            Command::RebuildIndex => self.engine.rebuild_index(),
        }
    }

    /// Collects the renderer input for the current state.
    pub fn frame(&self, viewport: Vec2, shift: f32, hover: Option<usize>) -> FrameState<'_> {
        FrameState {
            viewport,
            shift,
            attractors: &self.engine.attractors().points,
            hover,
            running: self.engine.is_running(),
            live_nodes: self.engine.nodes(),
            saved_trees: &self.saved,
            collapsed: self.collapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    fn orchestrator(attractors: Vec<Point>) -> Orchestrator {
        let cfg = Config {
            attraction_distance: 50.0,
            kill_distance: 3.0,
            segment_length: 5.0,
            seed_nodes: vec![Vec2::ZERO],
            ..Config::default()
        };
        let mut orch = Orchestrator::new(cfg).expect("valid config");
        orch.send(Command::ReplaceAttractors(attractors));
        orch
    }

    #[test]
    fn natural_finish_saves_tree_and_calls_back() {
        let seen: Rc<RefCell<Vec<TreeId>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let mut orch = orchestrator(vec![Vec2::new(20.0, 0.0)])
            .with_on_finish(move |tree| sink.borrow_mut().push(tree.id));

        orch.start(Vec2::new(7.0, 7.0));
        let mut ticks = 0;
        while orch.tick() {
            ticks += 1;
            assert!(ticks < 100, "growth never finished");
        }

        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(orch.saved_trees().len(), 1);
        let tree = orch.latest_tree().expect("one saved tree");
        assert_eq!(tree.seed, Vec2::new(7.0, 7.0));
        assert_eq!(tree.killed_attractors, vec![Vec2::new(20.0, 0.0)]);
        assert!(orch.engine().attractors().is_empty());

        // Nothing more happens once finished.
        assert!(!orch.tick());
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn manual_stop_produces_no_record() {
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        let mut orch = orchestrator(vec![Vec2::new(40.0, 0.0)])
            .with_on_finish(move |_| *sink.borrow_mut() += 1);

        orch.send(Command::Start(Vec2::ZERO));
        assert!(orch.tick());
        orch.send(Command::Stop);

        assert!(!orch.is_running());
        assert!(!orch.tick());
        assert!(orch.saved_trees().is_empty());
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn commands_toggle_display_state() {
        let mut orch = orchestrator(Vec::new());
        orch.start(Vec2::ZERO);
        assert!(!orch.tick());
        let id = orch.latest_tree().expect("finished at once").id;

        orch.send(Command::ToggleCollapsed);
        assert!(orch.is_collapsed());
        orch.send(Command::SetCollapsed(false));
        assert!(!orch.is_collapsed());

        orch.send(Command::SetTreeVisible { id, visible: false });
        assert!(!orch.saved_trees()[0].visible);
        // Unknown ids are ignored.
        orch.send(Command::SetTreeVisible {
            id: 99,
            visible: true,
        });
        assert!(!orch.saved_trees()[0].visible);
    }

    #[test]
    fn frame_reflects_live_state() {
        let mut orch = orchestrator(vec![Vec2::new(30.0, 0.0)]);
        orch.start(Vec2::ZERO);
        orch.tick();

        let frame = orch.frame(Vec2::new(100.0, 100.0), -4.0, Some(0));
        assert!(frame.running);
        assert_eq!(frame.live_nodes.len(), 2);
        assert_eq!(frame.attractors, &[Vec2::new(30.0, 0.0)]);
        assert_eq!(frame.shift, -4.0);
        assert!(frame.saved_trees.is_empty());
    }
}
