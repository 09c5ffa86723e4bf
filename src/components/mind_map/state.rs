use log::debug;

use super::config::MindMapConfig;
use super::hierarchy::build_hierarchy;
use super::store::NodeStore;
use super::types::{HierarchicalNode, MindMapError, Node, NodeId};
use super::viewport::ViewportController;

pub const NODE_HEIGHT: f64 = 48.0;
pub const NODE_PADDING: f64 = 16.0;
pub const MIN_NODE_WIDTH: f64 = 120.0;
pub const MAX_NODE_WIDTH: f64 = 320.0;
pub const CHAR_WIDTH: f64 = 8.0;
/// World-space radius of the "+" add-child handle.
pub const HANDLE_RADIUS: f64 = 11.0;

/// Box size of a node, estimated from its text.
pub fn node_size(text: &str) -> (f64, f64) {
	let width = (text.chars().count() as f64 * CHAR_WIDTH + 2.0 * NODE_PADDING)
		.clamp(MIN_NODE_WIDTH, MAX_NODE_WIDTH);
	(width, NODE_HEIGHT)
}

/// Centre of the add-child handle, on the node's bottom-right corner.
pub fn handle_center(node: &Node) -> (f64, f64) {
	let (w, h) = node_size(&node.text);
	(node.x + w / 2.0, node.y + h / 2.0)
}

fn contains(node: &Node, wx: f64, wy: f64) -> bool {
	let (w, h) = node_size(&node.text);
	(wx - node.x).abs() <= w / 2.0 && (wy - node.y).abs() <= h / 2.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
	Handle(NodeId),
	Node(NodeId),
	Canvas,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<NodeId>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

/// Screen-space placement of the inline text editor.
#[derive(Clone, Debug, PartialEq)]
pub struct EditTarget {
	pub id: NodeId,
	pub text: String,
	pub left: f64,
	pub top: f64,
	pub width: f64,
	pub height: f64,
	pub scale: f64,
}

pub struct MindMapState {
	pub store: NodeStore,
	pub viewport: ViewportController,
	pub drag: DragState,
	pub selected: Option<NodeId>,
	pub hovered: Option<NodeId>,
	pub editing: Option<NodeId>,
	pub width: f64,
	pub height: f64,
	dirty: bool,
	outline_dirty: bool,
}

impl MindMapState {
	pub fn new(config: &MindMapConfig, width: f64, height: f64) -> Self {
		Self {
			store: NodeStore::new(config.layout.clone()),
			viewport: ViewportController::new(config.zoom.clone()),
			drag: DragState::default(),
			selected: None,
			hovered: None,
			editing: None,
			width,
			height,
			dirty: true,
			outline_dirty: true,
		}
	}

	pub fn is_dragging(&self, id: NodeId) -> bool {
		self.drag.active && self.drag.node == Some(id)
	}

	/// Returns whether a redraw is due and clears the flag.
	pub fn take_dirty(&mut self) -> bool {
		std::mem::take(&mut self.dirty)
	}

	/// Returns whether the outline changed since the last call.
	pub fn take_outline_dirty(&mut self) -> bool {
		std::mem::take(&mut self.outline_dirty)
	}

	pub fn hierarchy(&self) -> Vec<HierarchicalNode> {
		build_hierarchy(&self.store)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let (wx, wy) = self.viewport.state.screen_to_world(sx, sy);
		// Last drawn is on top.
		self.store
			.iter()
			.rev()
			.find(|(_, node)| contains(node, wx, wy))
			.map(|(id, _)| id)
	}

	pub fn hit_test(&self, sx: f64, sy: f64) -> Hit {
		let (wx, wy) = self.viewport.state.screen_to_world(sx, sy);
		for id in [self.selected, self.hovered].into_iter().flatten() {
			if let Some(node) = self.store.get(id) {
				let (hx, hy) = handle_center(node);
				let (dx, dy) = (wx - hx, wy - hy);
				if (dx * dx + dy * dy).sqrt() <= HANDLE_RADIUS {
					return Hit::Handle(id);
				}
			}
		}
		self.node_at_position(sx, sy).map_or(Hit::Canvas, Hit::Node)
	}

	fn select(&mut self, id: NodeId) {
		self.selected = Some(id);
		self.dirty = true;
	}

	fn created(&mut self, id: NodeId) -> NodeId {
		debug!("Map now holds {} nodes", self.store.len());
		self.select(id);
		self.outline_dirty = true;
		id
	}

	pub fn add_topic(&mut self) -> NodeId {
		let id = self.store.add_root();
		self.created(id)
	}

	pub fn add_child(&mut self, parent: NodeId) -> Result<NodeId, MindMapError> {
		let id = self.store.add_child(parent)?;
		Ok(self.created(id))
	}

	pub fn add_sibling(&mut self, node: NodeId) -> Result<NodeId, MindMapError> {
		let id = self.store.add_sibling(node)?;
		Ok(self.created(id))
	}

	pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), MindMapError> {
		self.store.set_text(id, text)?;
		self.dirty = true;
		self.outline_dirty = true;
		Ok(())
	}

	/// Mouse-down. Nodes take the gesture for dragging, so panning only
	/// starts on empty canvas.
	///
	/// `clicks` is the browser's click count; the handle adds one child per
	/// click sequence, not one per press of a double-click.
	pub fn pointer_down(&mut self, sx: f64, sy: f64, clicks: i32) -> Hit {
		let hit = self.hit_test(sx, sy);
		match hit {
			Hit::Handle(_) if clicks > 1 => {}
			Hit::Handle(id) => {
				if let Err(e) = self.add_child(id) {
					debug!("Ignoring add-child handle: {}", e);
				}
			}
			Hit::Node(id) => {
				self.select(id);
				if let Some(node) = self.store.get(id) {
					self.drag = DragState {
						active: true,
						node: Some(id),
						start_x: sx,
						start_y: sy,
						node_start_x: node.x,
						node_start_y: node.y,
					};
				}
			}
			Hit::Canvas => self.viewport.begin_pan(sx, sy),
		}
		hit
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if self.drag.active {
			if let Some(id) = self.drag.node {
				let k = self.viewport.state.scale;
				let (nx, ny) = (
					self.drag.node_start_x + (sx - self.drag.start_x) / k,
					self.drag.node_start_y + (sy - self.drag.start_y) / k,
				);
				if let Err(e) = self.store.update_node_position(id, nx, ny) {
					debug!("Dropping drag: {}", e);
					self.drag = DragState::default();
				}
				self.dirty = true;
			}
		} else if self.viewport.pan_to(sx, sy) {
			self.dirty = true;
		} else {
			let hovered = match self.hit_test(sx, sy) {
				Hit::Handle(id) | Hit::Node(id) => Some(id),
				Hit::Canvas => None,
			};
			if hovered != self.hovered {
				self.hovered = hovered;
				self.dirty = true;
			}
		}
	}

	pub fn pointer_up(&mut self) {
		if self.drag.active || self.viewport.is_panning() {
			self.dirty = true;
		}
		self.drag = DragState::default();
		self.viewport.end_pan();
	}

	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		if self.hovered.take().is_some() {
			self.dirty = true;
		}
	}

	pub fn wheel(&mut self, delta_y: f64, sx: f64, sy: f64) {
		self.viewport.wheel(delta_y, sx, sy);
		self.dirty = true;
	}

	/// Keyboard shortcuts on the selected node. Returns true when handled.
	pub fn handle_key(&mut self, key: &str) -> bool {
		if self.editing.is_some() {
			return false;
		}
		let Some(selected) = self.selected else {
			return false;
		};
		let result = match key {
			"Tab" => self.add_child(selected),
			"Enter" => self.add_sibling(selected),
			_ => return false,
		};
		if let Err(e) = result {
			debug!("Ignoring {} shortcut: {}", key, e);
		}
		true
	}

	/// Starts editing the node under the pointer, if any.
	pub fn begin_edit_at(&mut self, sx: f64, sy: f64) -> Option<EditTarget> {
		let id = self.node_at_position(sx, sy)?;
		self.select(id);
		self.editing = Some(id);
		self.edit_target()
	}

	pub fn edit_target(&self) -> Option<EditTarget> {
		let id = self.editing?;
		let node = self.store.get(id)?;
		let (w, h) = node_size(&node.text);
		let k = self.viewport.state.scale;
		let (cx, cy) = self.viewport.state.world_to_screen(node.x, node.y);
		Some(EditTarget {
			id,
			text: node.text.clone(),
			left: cx - w * k / 2.0,
			top: cy - h * k / 2.0,
			width: w * k,
			height: h * k,
			scale: k,
		})
	}

	pub fn end_edit(&mut self) {
		if self.editing.take().is_some() {
			self.dirty = true;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.dirty = true;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mind_map::store::ROOT_KEY;

	fn state() -> MindMapState {
		MindMapState::new(&MindMapConfig::default(), 800.0, 600.0)
	}

	fn root(s: &MindMapState) -> NodeId {
		s.store.find(ROOT_KEY).unwrap()
	}

	#[test]
	fn node_size_is_bounded() {
		assert_eq!(node_size("").0, MIN_NODE_WIDTH);
		assert_eq!(node_size(&"x".repeat(500)).0, MAX_NODE_WIDTH);
		assert_eq!(node_size("abcdefghijklmnop").0, 16.0 * CHAR_WIDTH + 2.0 * NODE_PADDING);
	}

	#[test]
	fn hit_test_finds_root_and_empty_canvas() {
		let s = state();
		assert_eq!(s.hit_test(400.0, 300.0), Hit::Node(root(&s)));
		assert_eq!(s.hit_test(10.0, 10.0), Hit::Canvas);
	}

	#[test]
	fn dragging_a_node_moves_it_without_panning() {
		let mut s = state();
		let root = root(&s);
		assert_eq!(s.pointer_down(400.0, 300.0, 1), Hit::Node(root));
		assert_eq!(s.selected, Some(root));
		assert!(s.is_dragging(root));

		s.pointer_move(450.0, 320.0);
		s.pointer_up();

		let node = s.store.get(root).unwrap();
		assert_eq!((node.x, node.y), (450.0, 320.0));
		assert_eq!(s.viewport.state.offset_x, 0.0);
		assert_eq!(s.viewport.state.offset_y, 0.0);
		assert!(!s.drag.active);
	}

	#[test]
	fn drag_delta_is_divided_by_scale() {
		let mut s = state();
		let root = root(&s);
		s.viewport.state.scale = 2.0;
		s.viewport.state.offset_x = -400.0;
		s.viewport.state.offset_y = -300.0;
		// Root centre is now at screen (400, 300).
		s.pointer_down(400.0, 300.0, 1);
		s.pointer_move(500.0, 300.0);
		assert_eq!(s.store.get(root).unwrap().x, 450.0);
	}

	#[test]
	fn background_drag_pans() {
		let mut s = state();
		assert_eq!(s.pointer_down(10.0, 10.0, 1), Hit::Canvas);
		s.pointer_move(60.0, 30.0);
		s.pointer_leave();
		assert_eq!((s.viewport.state.offset_x, s.viewport.state.offset_y), (50.0, 20.0));
		assert!(!s.viewport.is_panning());
		assert_eq!(s.store.get(root(&s)).unwrap().x, 400.0);
	}

	#[test]
	fn handle_adds_child_to_selected_node() {
		let mut s = state();
		let root = root(&s);
		s.pointer_down(400.0, 300.0, 1);
		s.pointer_up();

		let (hx, hy) = handle_center(s.store.get(root).unwrap());
		let hit = s.pointer_down(hx, hy, 1);
		assert_eq!(hit, Hit::Handle(root));
		assert_eq!(s.store.len(), 2);
		let child = s.selected.unwrap();
		assert_eq!(s.store.get(child).unwrap().parent, Some(root));
		assert!(!s.viewport.is_panning());
	}

	#[test]
	fn keyboard_shortcuts_need_a_selection() {
		let mut s = state();
		assert!(!s.handle_key("Tab"));
		assert!(!s.handle_key("Enter"));
		assert_eq!(s.store.len(), 1);

		s.selected = Some(root(&s));
		assert!(s.handle_key("Tab"));
		let child = s.selected.unwrap();
		assert_eq!(s.store.get(child).unwrap().level, 1);

		assert!(s.handle_key("Enter"));
		let sibling = s.selected.unwrap();
		assert_ne!(sibling, child);
		assert_eq!(s.store.get(sibling).unwrap().parent, Some(root(&s)));
		assert_eq!(s.store.len(), 3);

		assert!(!s.handle_key("a"));
		assert!(s.take_outline_dirty());
		assert!(!s.take_outline_dirty());
	}

	#[test]
	fn editing_blocks_shortcuts_and_updates_text() {
		let mut s = state();
		let root = root(&s);
		let target = s.begin_edit_at(400.0, 300.0).unwrap();
		assert_eq!(target.id, root);
		assert_eq!(target.text, "Central Topic");
		let (w, h) = node_size("Central Topic");
		assert_eq!(target.width, w);
		assert_eq!(target.left, 400.0 - w / 2.0);
		assert_eq!(target.top, 300.0 - h / 2.0);

		assert!(!s.handle_key("Tab"));
		s.set_text(root, "Ideas").unwrap();
		s.end_edit();
		assert!(s.editing.is_none());
		assert_eq!(s.hierarchy()[0].text, "Ideas");
	}

	#[test]
	fn hover_tracks_pointer() {
		let mut s = state();
		s.pointer_move(400.0, 300.0);
		assert_eq!(s.hovered, Some(root(&s)));
		s.pointer_leave();
		assert_eq!(s.hovered, None);
	}

	#[test]
	fn hovering_the_handle_keeps_it_reachable() {
		let mut s = state();
		let root = root(&s);
		s.pointer_move(400.0, 300.0);
		assert_eq!(s.hovered, Some(root));

		// Just outside the box corner, still inside the handle circle.
		let (hx, hy) = handle_center(s.store.get(root).unwrap());
		let (px, py) = (hx + HANDLE_RADIUS * 0.6, hy + HANDLE_RADIUS * 0.6);
		assert_eq!(s.node_at_position(px, py), None);
		s.pointer_move(px, py);
		assert_eq!(s.hovered, Some(root));

		assert_eq!(s.pointer_down(px, py, 1), Hit::Handle(root));
		assert_eq!(s.store.len(), 2);
	}

	#[test]
	fn double_click_on_handle_adds_one_child() {
		let mut s = state();
		let root = root(&s);
		s.selected = Some(root);
		let (hx, hy) = handle_center(s.store.get(root).unwrap());

		assert_eq!(s.pointer_down(hx, hy, 1), Hit::Handle(root));
		s.pointer_up();
		s.selected = Some(root);
		assert_eq!(s.pointer_down(hx, hy, 2), Hit::Handle(root));
		s.pointer_up();

		assert_eq!(s.store.children(root).len(), 1);
		assert_eq!(s.store.len(), 2);
	}
}
