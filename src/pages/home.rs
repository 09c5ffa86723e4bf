use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use log::debug;

use crate::components::mind_map::{
	HierarchicalNode, HierarchicalView, MindMapCanvas, MindMapConfig, outline_text,
};

/// Editor page: header with the outline toggle, the canvas and the
/// optional outline panel.
#[component]
pub fn Home() -> impl IntoView {
	let query = use_query_map();
	let config = query.with_untracked(|q| MindMapConfig::from_query(|key| q.get(key)));
	let outline = RwSignal::new(Vec::<HierarchicalNode>::new());
	let show_outline = RwSignal::new(config.show_outline);

	let toggle_outline = move |_: web_sys::MouseEvent| {
		show_outline.update(|open| *open = !*open);
		if show_outline.get_untracked() {
			debug!("Outline:\n{}", outline.with_untracked(|forest| outline_text(forest)));
		}
	};

	view! {
		<div class="page">
			<header class="page-header">
				<h1 class="brand">"MindFlow"</h1>
				<button class="toolbar-button" on:click=toggle_outline>
					{move || if show_outline.get() { "Hide outline" } else { "Show outline" }}
				</button>
			</header>
			<main class="page-main">
				<MindMapCanvas config=config outline=outline />
				<Show when=move || show_outline.get()>
					<div class="outline-overlay">
						<HierarchicalView nodes=outline />
					</div>
				</Show>
			</main>
		</div>
	}
}
