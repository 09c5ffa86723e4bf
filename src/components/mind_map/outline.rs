use leptos::prelude::*;

use super::hierarchy::outline_lines;
use super::types::HierarchicalNode;

/// Indented text view of the mind map hierarchy.
#[component]
pub fn HierarchicalView(#[prop(into)] nodes: Signal<Vec<HierarchicalNode>>) -> impl IntoView {
	view! {
		<div class="outline-panel">
			<h3 class="outline-title">"Hierarchical View"</h3>
			<div class="outline-body">
				{move || {
					nodes
						.with(|forest| outline_lines(forest))
						.into_iter()
						.map(|line| view! { <pre class="outline-line" data-id=line.id>{line.text}</pre> })
						.collect_view()
				}}
			</div>
		</div>
	}
}
