use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::ev;
use leptos::prelude::*;
use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Event, FocusEvent, HtmlCanvasElement, HtmlInputElement,
	KeyboardEvent, MouseEvent, WheelEvent,
};

use super::config::MindMapConfig;
use super::render;
use super::state::{EditTarget, MindMapState};
use super::types::HierarchicalNode;

type SharedState = Rc<RefCell<Option<MindMapState>>>;

const FONT_SIZE: f64 = 15.0;

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn measure(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		if let Some(win) = web_sys::window() {
			return (
				win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0),
				win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0),
			);
		}
	}
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)),
		height.unwrap_or_else(|| parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)),
	)
}

/// Pushes a fresh outline to `outline` if the node list or any text changed.
fn sync_outline(state: &mut MindMapState, outline: Option<RwSignal<Vec<HierarchicalNode>>>) {
	if state.take_outline_dirty() {
		if let Some(outline) = outline {
			outline.set(state.hierarchy());
		}
	}
}

fn finish_edit(state: &SharedState, edit_box: RwSignal<Option<EditTarget>>) {
	if let Some(ref mut s) = *state.borrow_mut() {
		s.end_edit();
	}
	edit_box.set(None);
}

fn edit_style(target: &Option<EditTarget>) -> String {
	match target {
		Some(t) => format!(
			"display: block; position: absolute; left: {}px; top: {}px; width: {}px; height: {}px; font-size: {}px;",
			t.left,
			t.top,
			t.width,
			t.height,
			FONT_SIZE * t.scale
		),
		None => "display: none;".to_string(),
	}
}

#[component]
pub fn MindMapCanvas(
	#[prop(default = MindMapConfig::default())] config: MindMapConfig,
	#[prop(optional)] outline: Option<RwSignal<Vec<HierarchicalNode>>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let input_ref = NodeRef::<leptos::html::Input>::new();
	let edit_box = RwSignal::new(None::<EditTarget>);
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init) = (state.clone(), animate.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("No window available, mind map disabled");
			return;
		};

		let (w, h) = measure(&canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("Canvas 2d context unavailable");
				return;
			}
		};

		let mut initial = MindMapState::new(&config, w, h);
		sync_outline(&mut initial, outline);
		*state_init.borrow_mut() = Some(initial);
		info!("Mind map ready ({}x{}, {:?} layout)", w, h, config.layout.placement);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		let resize = window_event_listener(ev::resize, move |_| {
			let (nw, nh) = measure(&canvas_resize, fullscreen, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		});

		let state_key = state_init.clone();
		let keydown = window_event_listener(ev::keydown, move |ev: KeyboardEvent| {
			// Typing in the inline editor or a toolbar field is not a shortcut.
			let from_input = ev
				.target()
				.and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
				.is_some();
			if from_input {
				return;
			}
			if let Some(ref mut s) = *state_key.borrow_mut() {
				if s.handle_key(&ev.key()) {
					ev.prevent_default();
					sync_outline(s, outline);
				}
			}
		});

		let running = Arc::new(AtomicBool::new(true));
		let (state_anim, animate_inner, running_anim) =
			(state_init.clone(), animate_init.clone(), running.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !running_anim.load(Ordering::Relaxed) {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.take_dirty() {
					render::render(s, &ctx);
				}
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}

		on_cleanup(move || {
			debug!("Mind map unmounted, removing window listeners");
			running.store(false, Ordering::Relaxed);
			resize.remove();
			keydown.remove();
		});
	});

	// Focus the editor once per opened node; text refreshes only move the box.
	let editing_id = Memo::new(move |_| edit_box.with(|b| b.as_ref().map(|t| t.id)));
	Effect::new(move |_| {
		if editing_id.get().is_none() {
			return;
		}
		let Some(input) = input_ref.get_untracked() else {
			return;
		};
		let text = edit_box.with_untracked(|b| b.as_ref().map(|t| t.text.clone()));
		input.set_value(&text.unwrap_or_default());
		let _ = input.focus();
		input.select();
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			let hit = s.pointer_down(x, y, ev.detail());
			debug!("Pointer down at ({}, {}): {:?}", x, y, hit);
			sync_outline(s, outline);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		if edit_box.with_untracked(Option::is_some) {
			finish_edit(&state_wh, edit_box);
		}
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(ev.delta_y(), x, y);
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		let target = match *state_dc.borrow_mut() {
			Some(ref mut s) => s.begin_edit_at(x, y),
			None => None,
		};
		if target.is_some() {
			edit_box.set(target);
		}
	};

	let state_in = state.clone();
	let on_edit_input = move |ev: Event| {
		let value = event_target_value(&ev);
		if let Some(ref mut s) = *state_in.borrow_mut() {
			if let Some(id) = s.editing {
				if let Err(e) = s.set_text(id, value) {
					debug!("Dropping edit: {}", e);
				}
				sync_outline(s, outline);
				edit_box.set(s.edit_target());
			}
		}
	};

	let state_ek = state.clone();
	let on_edit_keydown = move |ev: KeyboardEvent| {
		ev.stop_propagation();
		if matches!(ev.key().as_str(), "Enter" | "Escape") {
			ev.prevent_default();
			finish_edit(&state_ek, edit_box);
		}
	};

	let state_eb = state.clone();
	let on_edit_blur = move |_: FocusEvent| finish_edit(&state_eb, edit_box);

	let state_nt = state.clone();
	let on_new_topic = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_nt.borrow_mut() {
			s.add_topic();
			sync_outline(s, outline);
		}
	};

	let state_ac = state.clone();
	let on_add_child = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ac.borrow_mut() {
			match s.selected {
				Some(id) => {
					if let Err(e) = s.add_child(id) {
						debug!("Ignoring add child: {}", e);
					}
					sync_outline(s, outline);
				}
				None => debug!("Add child with nothing selected"),
			}
		}
	};

	view! {
		<div class="mindmap">
			<canvas
				node_ref=canvas_ref
				class="mindmap-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:dblclick=on_dblclick
				style="display: block; cursor: grab;"
			/>
			<input
				node_ref=input_ref
				type="text"
				class="mindmap-editor"
				style=move || edit_style(&edit_box.get())
				on:input=on_edit_input
				on:keydown=on_edit_keydown
				on:blur=on_edit_blur
			/>
			<div class="mindmap-toolbar">
				<button class="toolbar-button" title="Add child to selected topic" on:click=on_add_child>
					"Add child"
				</button>
				<button class="toolbar-button round" title="New topic" on:click=on_new_topic>
					"+"
				</button>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mind_map::types::NodeId;

	#[test]
	fn editor_is_hidden_without_a_target() {
		assert_eq!(edit_style(&None), "display: none;");
	}

	#[test]
	fn editor_covers_the_node_box() {
		let target = EditTarget {
			id: NodeId(0),
			text: "Central Topic".into(),
			left: 332.0,
			top: 276.0,
			width: 136.0,
			height: 48.0,
			scale: 2.0,
		};
		let style = edit_style(&Some(target));
		assert!(style.starts_with("display: block;"));
		assert!(style.contains("left: 332px;"));
		assert!(style.contains("top: 276px;"));
		assert!(style.contains("width: 136px;"));
		assert!(style.contains("font-size: 30px;"));
	}
}
