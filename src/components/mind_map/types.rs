use std::fmt;

use thiserror::Error;

/// Index of a node inside a [`NodeStore`](super::store::NodeStore) arena.
///
/// Ids are only minted by the store, which never removes nodes, so an id
/// handed out by a store stays valid for that store's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub text: String,
	pub x: f64,
	pub y: f64,
	pub parent: Option<NodeId>,
	pub level: u32,
	/// Position among siblings, used to order the outline.
	pub index: Option<u32>,
	pub(crate) children: Vec<NodeId>,
}

/// Nested view of the map, rebuilt from the arena for the outline.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchicalNode {
	pub id: String,
	pub text: String,
	pub level: u32,
	pub children: Vec<HierarchicalNode>,
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum MindMapError {
	#[error("node {0} not found")]
	NodeNotFound(NodeId),
	#[error("unknown placement strategy `{0}`")]
	UnknownPlacement(String),
	#[error("invalid zoom bounds: min {min}, max {max}")]
	InvalidZoomBounds { min: f64, max: f64 },
}
