/// A 2-D coordinate, used for attractors and node positions alike.
pub type Point = glam::Vec2;

/// Identifier for a node in a [`crate::tree::NodeSequence`].
///
/// This is an index into the sequence, and is only meaningful within
/// the lifetime of a given growth run. Parent links are stored as
/// `NodeId`s, so the sequence is never reordered or compacted.
pub type NodeId = usize;

/// Identifier of a finished [`crate::tree::TreeRecord`].
///
/// Allocated monotonically by the engine that produced the record.
pub type TreeId = u64;
