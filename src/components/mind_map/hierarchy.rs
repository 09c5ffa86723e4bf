use std::collections::HashMap;

use super::store::NodeStore;
use super::types::{HierarchicalNode, NodeId};

const INDENT: &str = "    ";

/// Rebuilds the nested outline from the flat node list.
///
/// Nodes are grouped by parent and siblings ordered by their `index`
/// (missing indices sort as 0; ties keep list order).
pub fn build_hierarchy(store: &NodeStore) -> Vec<HierarchicalNode> {
	let mut by_parent: HashMap<Option<NodeId>, Vec<NodeId>> = HashMap::new();
	for (id, node) in store.iter() {
		by_parent.entry(node.parent).or_default().push(id);
	}
	for group in by_parent.values_mut() {
		group.sort_by_key(|&id| store.get(id).and_then(|n| n.index).unwrap_or(0));
	}
	build_level(store, &by_parent, None)
}

fn build_level(
	store: &NodeStore,
	by_parent: &HashMap<Option<NodeId>, Vec<NodeId>>,
	parent: Option<NodeId>,
) -> Vec<HierarchicalNode> {
	let Some(group) = by_parent.get(&parent) else {
		return Vec::new();
	};
	group
		.iter()
		.filter_map(|&id| {
			let node = store.get(id)?;
			Some(HierarchicalNode {
				id: node.id.clone(),
				text: node.text.clone(),
				level: node.level,
				children: build_level(store, by_parent, Some(id)),
			})
		})
		.collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutlineLine {
	pub id: String,
	pub text: String,
}

/// Depth-first lines of the outline, indented four spaces per level.
pub fn outline_lines(forest: &[HierarchicalNode]) -> Vec<OutlineLine> {
	fn walk(node: &HierarchicalNode, out: &mut Vec<OutlineLine>) {
		out.push(OutlineLine {
			id: node.id.clone(),
			text: format!("{}{}", INDENT.repeat(node.level as usize), node.text),
		});
		for child in &node.children {
			walk(child, out);
		}
	}

	let mut out = Vec::new();
	for node in forest {
		walk(node, &mut out);
	}
	out
}

pub fn outline_text(forest: &[HierarchicalNode]) -> String {
	outline_lines(forest)
		.into_iter()
		.map(|line| line.text)
		.collect::<Vec<_>>()
		.join("\n")
}
