//! Error types for configuration and construction.
//!
//! The growth loop itself never fails: degenerate geometry is resolved by
//! fallbacks inside the phases. Only building an engine from a bad
//! [`crate::config::Config`] or parsing one can go wrong.

use thiserror::Error;

/// Reasons a [`crate::config::Config`] is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A distance parameter is non-finite or out of its allowed range.
    #[error("{name} must be a finite positive distance, got {value}")]
    InvalidDistance {
        /// Name of the offending field.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// Attractors would be consumed before they could ever attract.
    #[error("kill_distance ({kill}) must be smaller than attraction_distance ({attraction})")]
    KillNotBelowAttraction {
        /// Configured kill distance.
        kill: f32,
        /// Configured attraction distance.
        attraction: f32,
    },
    /// A count limit is zero.
    #[error("{name} must be greater than zero")]
    ZeroLimit {
        /// Name of the offending field.
        name: &'static str,
    },
    /// Growth needs at least one finite seed node to start from.
    #[error("seed_nodes must contain at least one finite point")]
    NoSeedNodes,
    /// The configuration text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
