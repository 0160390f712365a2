use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, types::Point};

/// Fixed initial seed layout, as offsets in units of the viewport's shorter side.
///
/// Six stubs on a shallow arc: the start of a branching pattern.
pub const SEED_LAYOUT: [[f32; 2]; 6] = [
    [-0.30, 0.04],
    [-0.18, 0.01],
    [-0.06, 0.0],
    [0.06, 0.0],
    [0.18, 0.01],
    [0.30, 0.04],
];

/// Growth parameters, fixed for the lifetime of a [`crate::engine::GrowthEngine`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Nodes farther than this from an attractor ignore it.
    pub attraction_distance: f32,
    /// An attractor this close to its nearest node is consumed.
    pub kill_distance: f32,
    /// Distance a new node advances from its parent.
    pub segment_length: f32,
    pub max_iterations: u32,
    pub max_nodes: usize,
    /// Iterations between forced full rebuilds of the spatial index.
    pub rebuild_interval: u32,
    /// Root nodes every run starts from.
    pub seed_nodes: Vec<Point>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attraction_distance: 180.0,
            kill_distance: 4.0,
            segment_length: 5.0,
            max_iterations: 100,
            max_nodes: 20_000,
            rebuild_interval: 60,
            seed_nodes: seed_nodes_around(Vec2::ZERO, 100.0),
        }
    }
}

/// Lays [`SEED_LAYOUT`] out around `center`, scaled by `scale`.
pub fn seed_nodes_around(center: Point, scale: f32) -> Vec<Point> {
    SEED_LAYOUT
        .iter()
        .map(|&[x, y]| center + Vec2::new(x, y) * scale)
        .collect()
}

impl Config {
    /// Derives viewport-proportional parameters.
    ///
    /// Distances shrink with the smaller of the two axes so that dense
    /// attractor fields on small screens still grow at a similar pace.
    pub fn for_viewport(width: f32, height: f32) -> Self {
        let attraction = (width / 40.0).floor().min((height / 80.0).floor()).max(1.0);
        let kill = (width / 150.0)
            .floor()
            .min((height / 300.0).floor())
            .max(1.0)
            .min(attraction - 1.0);
        let segment = (width / 180.0)
            .floor()
            .min((height / 360.0).floor())
            .max(1.0);

        Self {
            attraction_distance: attraction,
            kill_distance: kill,
            segment_length: segment,
            max_iterations: 1000,
            seed_nodes: seed_nodes_around(
                Vec2::new(width, height) * 0.5,
                width.min(height),
            ),
            ..Self::default()
        }
    }

    /// Parses a JSON document and validates the result.
    ///
    /// Fields missing from the document keep their [`Default`] values.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Side length of one spatial index cell.
    ///
    /// A third of the attraction distance keeps cross-cell misses rare.
    pub fn cell_size(&self) -> f32 {
        (self.attraction_distance / 3.0).floor().max(1.0)
    }

    /// Upper bound on the cell radius of the expanding nearest-node search.
    pub fn max_search_cells(&self) -> i32 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "attraction distance is validated finite; the ratio is small"
        )]
        let cells = (self.attraction_distance / self.cell_size()).ceil() as i32 + 1;
        cells.max(1)
    }

    /// Checks every parameter, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_distance("attraction_distance", self.attraction_distance, false)?;
        check_distance("kill_distance", self.kill_distance, true)?;
        check_distance("segment_length", self.segment_length, false)?;

        if self.kill_distance >= self.attraction_distance {
            return Err(ConfigError::KillNotBelowAttraction {
                kill: self.kill_distance,
                attraction: self.attraction_distance,
            });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "max_iterations",
            });
        }
        if self.max_nodes == 0 {
            return Err(ConfigError::ZeroLimit { name: "max_nodes" });
        }
        if self.rebuild_interval == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "rebuild_interval",
            });
        }
        if self.seed_nodes.is_empty() || !self.seed_nodes.iter().all(|p| p.is_finite()) {
            return Err(ConfigError::NoSeedNodes);
        }
        Ok(())
    }
}

fn check_distance(name: &'static str, value: f32, allow_zero: bool) -> Result<(), ConfigError> {
    let in_range = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if value.is_finite() && in_range {
        Ok(())
    } else {
        Err(ConfigError::InvalidDistance { name, value })
    }
}
