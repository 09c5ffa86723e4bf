//! MindFlow: a browser mind map editor drawn on a canvas.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

mod components;
mod pages;

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Console log level: everything in debug builds, info and up in release.
fn log_level() -> Level {
	if cfg!(debug_assertions) {
		Level::Debug
	} else {
		Level::Info
	}
}

/// Routes `log` output to the browser console and reports panics there.
pub fn init_logging() {
	let level = log_level();
	let _ = console_log::init_with_level(level);
	console_error_panic_hook::set_once();
	info!("MindFlow logging at {}", level);
}

/// Document head plus the editor routes. `/` and `/map` open the editor;
/// its query string (`?layout=fan&outline=1`) configures the map.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="MindFlow" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Meta name="description" content="Sketch ideas as a tree of topics on an infinite canvas." />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/map") view=Home />
			</Routes>
		</Router>
	}
}
