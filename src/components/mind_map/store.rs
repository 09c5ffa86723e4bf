use log::{debug, info};

use super::layout::LayoutConfig;
use super::types::{MindMapError, Node, NodeId};

pub const ROOT_KEY: &str = "root";
pub const ROOT_TEXT: &str = "Central Topic";
pub const NEW_TOPIC_TEXT: &str = "New Topic";

#[cfg(target_arch = "wasm32")]
fn now_millis() -> u64 {
	js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_millis() -> u64 {
	use std::time::{SystemTime, UNIX_EPOCH};
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_millis() as u64)
		.unwrap_or_default()
}

/// Append-only arena of mind map nodes.
///
/// A parent is always pushed before its children and nodes are never
/// removed, so every `parent` link points at a live, earlier slot.
#[derive(Clone, Debug)]
pub struct NodeStore {
	nodes: Vec<Node>,
	roots: Vec<NodeId>,
	layout: LayoutConfig,
	last_stamp: u64,
}

impl NodeStore {
	/// A store holding only the central topic.
	pub fn new(layout: LayoutConfig) -> Self {
		let mut store = Self::empty(layout);
		let (x, y) = store.layout.root_position(&[]);
		store.push(ROOT_KEY.to_string(), ROOT_TEXT, None, 0, (x, y));
		store
	}

	pub fn empty(layout: LayoutConfig) -> Self {
		Self {
			nodes: Vec::new(),
			roots: Vec::new(),
			layout,
			last_stamp: 0,
		}
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn get(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(id.0)
	}

	fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, MindMapError> {
		self.nodes.get_mut(id.0).ok_or(MindMapError::NodeNotFound(id))
	}

	#[cfg(test)]
	pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
		&mut self.nodes[id.0]
	}

	/// Looks a node up by its string key.
	#[cfg(test)]
	pub fn find(&self, key: &str) -> Option<NodeId> {
		self.nodes.iter().position(|n| n.id == key).map(NodeId)
	}

	pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NodeId, &Node)> {
		self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
	}

	pub fn roots(&self) -> &[NodeId] {
		&self.roots
	}

	pub fn children(&self, id: NodeId) -> &[NodeId] {
		self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
	}

	/// Parent/child pairs, one per node that has a parent.
	pub fn edges(&self) -> impl Iterator<Item = (&Node, &Node)> {
		self.nodes
			.iter()
			.filter_map(|child| child.parent.and_then(|p| self.get(p)).map(|p| (p, child)))
	}

	pub fn add_root(&mut self) -> NodeId {
		let roots = self.positions(self.roots());
		let position = self.layout.root_position(&roots);
		let key = self.next_key();
		let id = self.push(key, NEW_TOPIC_TEXT, None, 0, position);
		info!("Added topic {} at {:?}", id, position);
		id
	}

	pub fn add_child(&mut self, parent: NodeId) -> Result<NodeId, MindMapError> {
		let parent_node = self.get(parent).ok_or(MindMapError::NodeNotFound(parent))?;
		let level = parent_node.level + 1;
		let anchor = (parent_node.x, parent_node.y);
		let grandparent = parent_node
			.parent
			.and_then(|g| self.get(g))
			.map(|g| (g.x, g.y));
		let siblings = self.positions(self.children(parent));
		let position = self.layout.child_position(anchor, grandparent, &siblings);

		let key = self.next_key();
		let id = self.push(key, NEW_TOPIC_TEXT, Some(parent), level, position);
		info!("Added child {} of {} at level {}", id, parent, level);
		Ok(id)
	}

	/// Adds a node next to `node`: same parent, same level, after the
	/// existing siblings. Siblings of a root become new roots.
	pub fn add_sibling(&mut self, node: NodeId) -> Result<NodeId, MindMapError> {
		let current = self.get(node).ok_or(MindMapError::NodeNotFound(node))?;
		match current.parent {
			Some(parent) => self.add_child(parent),
			None => Ok(self.add_root()),
		}
	}

	pub fn update_node_position(&mut self, id: NodeId, x: f64, y: f64) -> Result<(), MindMapError> {
		let node = self.get_mut(id)?;
		node.x = x;
		node.y = y;
		Ok(())
	}

	pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), MindMapError> {
		self.get_mut(id)?.text = text.into();
		Ok(())
	}

	fn positions(&self, ids: &[NodeId]) -> Vec<(f64, f64)> {
		ids.iter()
			.filter_map(|&id| self.get(id))
			.map(|n| (n.x, n.y))
			.collect()
	}

	/// Timestamp-derived key, bumped past the previous one so two nodes
	/// created within the same millisecond still differ.
	fn next_key(&mut self) -> String {
		let stamp = now_millis().max(self.last_stamp + 1);
		self.last_stamp = stamp;
		let key = format!("node-{}", stamp);
		debug!("Generated node key {}", key);
		key
	}

	fn push(
		&mut self,
		key: String,
		text: &str,
		parent: Option<NodeId>,
		level: u32,
		(x, y): (f64, f64),
	) -> NodeId {
		let id = NodeId(self.nodes.len());
		let siblings = match parent {
			Some(p) => &mut self.nodes[p.0].children,
			None => &mut self.roots,
		};
		let index = siblings.len() as u32;
		siblings.push(id);
		self.nodes.push(Node {
			id: key,
			text: text.to_string(),
			x,
			y,
			parent,
			level,
			index: Some(index),
			children: Vec::new(),
		});
		id
	}
}

impl Default for NodeStore {
	fn default() -> Self {
		Self::new(LayoutConfig::default())
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;
	use crate::components::mind_map::layout::Placement;

	fn root(store: &NodeStore) -> NodeId {
		store.find(ROOT_KEY).unwrap()
	}

	fn assert_parents_exist(store: &NodeStore) {
		for (_, node) in store.iter() {
			if let Some(parent) = node.parent {
				assert!(store.get(parent).is_some(), "dangling parent on {}", node.id);
			}
		}
	}

	#[test]
	fn starts_with_central_topic() {
		let store = NodeStore::default();
		assert_eq!(store.len(), 1);
		let node = store.get(root(&store)).unwrap();
		assert_eq!(node.text, ROOT_TEXT);
		assert_eq!((node.x, node.y), (400.0, 300.0));
		assert_eq!(node.level, 0);
		assert_eq!(node.parent, None);
	}

	#[test]
	fn add_child_of_root() {
		let mut store = NodeStore::default();
		let root = root(&store);
		let child = store.add_child(root).unwrap();

		assert_eq!(store.len(), 2);
		let node = store.get(child).unwrap();
		assert_eq!(node.level, 1);
		assert_eq!(store.get(node.parent.unwrap()).unwrap().id, "root");
		assert_eq!(node.index, Some(0));
		assert_eq!(node.text, NEW_TOPIC_TEXT);
		assert_eq!(store.children(root), &[child]);
	}

	#[test]
	fn add_child_increments_level_at_depth() {
		let mut store = NodeStore::default();
		let mut parent = root(&store);
		for depth in 1..=5 {
			let before = store.len();
			parent = store.add_child(parent).unwrap();
			assert_eq!(store.len(), before + 1);
			assert_eq!(store.get(parent).unwrap().level, depth);
		}
		assert_parents_exist(&store);
	}

	#[test]
	fn sibling_keeps_parent_and_level() {
		let mut store = NodeStore::default();
		let root = root(&store);
		let first = store.add_child(root).unwrap();
		let second = store.add_sibling(first).unwrap();

		let (a, b) = (store.get(first).unwrap(), store.get(second).unwrap());
		assert_eq!(a.parent, b.parent);
		assert_eq!(a.level, b.level);
		assert_eq!(b.index, Some(1));
		assert!(b.y > a.y);
	}

	#[test]
	fn sibling_of_root_is_a_new_root() {
		let mut store = NodeStore::default();
		let root = root(&store);
		let other = store.add_sibling(root).unwrap();
		let node = store.get(other).unwrap();
		assert_eq!(node.parent, None);
		assert_eq!(node.level, 0);
		assert_eq!(store.roots(), &[root, other]);
	}

	#[test]
	fn missing_nodes_leave_store_untouched() {
		let mut store = NodeStore::default();
		let ghost = NodeId(42);
		let before = store.clone().iter().map(|(_, n)| n.clone()).collect::<Vec<_>>();

		assert_eq!(store.add_child(ghost), Err(MindMapError::NodeNotFound(ghost)));
		assert_eq!(store.add_sibling(ghost), Err(MindMapError::NodeNotFound(ghost)));
		assert!(store.update_node_position(ghost, 1.0, 2.0).is_err());
		assert!(store.set_text(ghost, "x").is_err());

		let after = store.iter().map(|(_, n)| n.clone()).collect::<Vec<_>>();
		assert_eq!(before, after);
	}

	#[test]
	fn update_position_touches_only_target() {
		let mut store = NodeStore::default();
		let root = root(&store);
		let a = store.add_child(root).unwrap();
		let b = store.add_child(root).unwrap();
		let before: Vec<Node> = store.iter().map(|(_, n)| n.clone()).collect();

		store.update_node_position(a, -10.0, 25.5).unwrap();

		for ((id, node), old) in store.iter().zip(&before) {
			assert_eq!(node.id, old.id);
			if id == a {
				assert_eq!((node.x, node.y), (-10.0, 25.5));
			} else {
				assert_eq!(node, old);
			}
		}
		assert_eq!(store.get(b).unwrap(), &before[b.0]);
	}

	#[test]
	fn keys_are_unique_within_a_burst() {
		let mut store = NodeStore::default();
		let root = root(&store);
		for _ in 0..50 {
			store.add_child(root).unwrap();
		}
		let keys: HashSet<&str> = store.iter().map(|(_, n)| n.id.as_str()).collect();
		assert_eq!(keys.len(), store.len());
	}

	#[test]
	fn edges_pair_each_child_with_its_parent() {
		let mut store = NodeStore::new(LayoutConfig {
			placement: Placement::Fan,
			..LayoutConfig::default()
		});
		let root = root(&store);
		let a = store.add_child(root).unwrap();
		store.add_child(a).unwrap();
		store.add_root();

		let edges: Vec<(&str, u32)> = store.edges().map(|(p, c)| (p.id.as_str(), c.level)).collect();
		assert_eq!(edges.len(), 2);
		assert_eq!(edges[0], ("root", 1));
		assert_eq!(edges[1].1, 2);
	}
}
