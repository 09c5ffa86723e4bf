use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{HANDLE_RADIUS, MindMapState, handle_center, node_size};
use super::types::Node;

const CONNECTOR_COLOR: &str = "#4F46E5";
const RING_COLOR: &str = "#3B82F6";
const CORNER_RADIUS: f64 = 8.0;

/// Quadratic connector from a parent to a child.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connector {
	pub start: (f64, f64),
	pub control: (f64, f64),
	pub end: (f64, f64),
}

pub fn connector(parent: &Node, child: &Node) -> Connector {
	let (sx, sy, ex, ey) = (parent.x, parent.y, child.x, child.y);
	Connector {
		start: (sx, sy),
		control: (sx + (ex - sx) * 0.5, sy + (ey - sy) * 0.5),
		end: (ex, ey),
	}
}

pub fn render(state: &MindMapState, ctx: &CanvasRenderingContext2d) {
	draw_background(state, ctx);
	let view = state.viewport.state;
	ctx.save();
	let _ = ctx.translate(view.offset_x, view.offset_y);
	let _ = ctx.scale(view.scale, view.scale);
	draw_connectors(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_background(state: &MindMapState, ctx: &CanvasRenderingContext2d) {
	let gradient = ctx.create_linear_gradient(0.0, 0.0, state.width, state.height);
	let _ = gradient.add_color_stop(0.0, "#EFF6FF");
	let _ = gradient.add_color_stop(1.0, "#EEF2FF");
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_connectors(state: &MindMapState, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(CONNECTOR_COLOR);
	ctx.set_line_width(2.0);
	for (parent, child) in state.store.edges() {
		let c = connector(parent, child);
		ctx.begin_path();
		ctx.move_to(c.start.0, c.start.1);
		ctx.quadratic_curve_to(c.control.0, c.control.1, c.end.0, c.end.1);
		ctx.stroke();
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_nodes(state: &MindMapState, ctx: &CanvasRenderingContext2d) {
	let k = state.viewport.state.scale;
	ctx.set_font("15px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for (id, node) in state.store.iter() {
		let (w, h) = node_size(&node.text);
		let (left, top) = (node.x - w / 2.0, node.y - h / 2.0);
		let selected = state.selected == Some(id);

		ctx.set_global_alpha(if state.is_dragging(id) { 0.5 } else { 1.0 });

		// Card with a soft drop shadow; the shadow is reset before the ring.
		ctx.set_shadow_color("rgba(15, 23, 42, 0.15)");
		ctx.set_shadow_blur(if state.hovered == Some(id) { 14.0 } else { 8.0 });
		ctx.set_shadow_offset_y(2.0);
		rounded_rect(ctx, left, top, w, h, CORNER_RADIUS);
		ctx.set_fill_style_str("#FFFFFF");
		ctx.fill();
		ctx.set_shadow_color("transparent");
		ctx.set_shadow_blur(0.0);
		ctx.set_shadow_offset_y(0.0);

		if selected {
			rounded_rect(ctx, left - 2.0, top - 2.0, w + 4.0, h + 4.0, CORNER_RADIUS + 2.0);
			ctx.set_stroke_style_str(RING_COLOR);
			ctx.set_line_width(2.0);
			ctx.stroke();
		}

		if state.editing != Some(id) {
			ctx.set_fill_style_str("#0F172A");
			let _ = ctx.fill_text_with_max_width(&node.text, node.x, node.y, w - 16.0);
		}

		if selected || state.hovered == Some(id) {
			draw_handle(ctx, node, k);
		}
		ctx.set_global_alpha(1.0);
	}
}

fn draw_handle(ctx: &CanvasRenderingContext2d, node: &Node, k: f64) {
	let (x, y) = handle_center(node);
	ctx.begin_path();
	let _ = ctx.arc(x, y, HANDLE_RADIUS, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(RING_COLOR);
	ctx.fill();

	let arm = HANDLE_RADIUS * 0.5;
	ctx.begin_path();
	ctx.move_to(x - arm, y);
	ctx.line_to(x + arm, y);
	ctx.move_to(x, y - arm);
	ctx.line_to(x, y + arm);
	ctx.set_stroke_style_str("#FFFFFF");
	ctx.set_line_width(2.0 / k.max(0.5));
	ctx.stroke();
}
