//! Space-colonization growth toward a field of attractor points.
//!
//! Main components:
//! - [`grid`]: uniform-grid spatial index over node positions.
//! - [`phases`]: the attraction, growth, and commit phases of one iteration.
//! - [`engine`]: the growth state machine and its termination policy.
//! - [`render`]: pure frame rendering onto a [`render::Surface`].
//! - [`orchestrator`]: run lifecycle, finished trees, and host commands.
//! - [`attractor`]: attractor sets and field scattering.
//! - [`tree`]: nodes, the live node sequence, and finished tree records.
//! - [`influence_buffer`]: per-iteration pull accumulators.
//! - [`config`]: growth parameters.
//! - [`error`]: configuration errors.
//! - [`types`]: shared type aliases and IDs.

pub mod attractor;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod influence_buffer;
pub mod orchestrator;
pub mod phases;
pub mod render;
pub mod tree;
pub mod types;

pub use config::Config;
pub use engine::{GrowthEngine, StepOutcome};
pub use error::ConfigError;
pub use orchestrator::{Command, Orchestrator};
pub use tree::TreeRecord;
