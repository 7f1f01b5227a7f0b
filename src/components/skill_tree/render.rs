//! Canvas rendering for the skill tree.
//!
//! Draws in three passes so that nodes always sit above the lines that join
//! them:
//! 1. Background (screen space)
//! 2. Edges with a glow for their activity level (world space)
//! 3. Nodes, then their labels (world space)

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::node::NodeLookup;
use super::state::SkillTreeState;
use super::theme::{Shadow, Theme};

/// Offsets of the label anchor relative to the node radius.
const LABEL_OFFSET_X: f64 = 1.2;
const LABEL_OFFSET_Y: f64 = 0.6;

/// Renders the complete graph to the canvas.
pub fn render(state: &SkillTreeState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, theme);
	draw_nodes(state, ctx, theme);
	draw_labels(state, ctx, theme);

	ctx.restore();
}

fn draw_background(state: &SkillTreeState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	clear_shadow(ctx);
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_edges(state: &SkillTreeState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_stroke_style_str(&theme.edge.color.to_css());
	ctx.set_line_width(theme.edge.width);

	for edge in state.graph.edges() {
		let (from, to) = edge.endpoints();
		let (Some(source), Some(target)) = (state.graph.node(from), state.graph.node(to)) else {
			continue;
		};
		let (x1, y1) = source.position();
		let (x2, y2) = target.position();

		apply_shadow(ctx, &theme.edge.shadow(edge.activity()));
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}

	clear_shadow(ctx);
}

fn draw_nodes(state: &SkillTreeState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	for node in state.graph.nodes() {
		let look = node.look(theme.profile(node.status()));
		let radius = state.radii.radius(node, theme);
		let (x, y) = node.position();

		apply_shadow(ctx, &look.shadow);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, PI * 2.0);
		ctx.set_fill_style_str(&look.fill.to_css());
		ctx.fill();

		ctx.set_stroke_style_str(&look.stroke.to_css());
		ctx.set_line_width(look.stroke_width);
		ctx.stroke();
	}

	clear_shadow(ctx);
}

fn draw_labels(state: &SkillTreeState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let label = &theme.label;
	ctx.set_font(&label.font());
	ctx.set_fill_style_str(&label.fill.to_css());
	ctx.set_text_align("left");
	ctx.set_text_baseline("alphabetic");

	for node in state.graph.nodes() {
		let radius = state.radii.radius(node, theme);
		let (x, y) = node.position();

		apply_shadow(ctx, &label.shadow(node.status()));
		let _ = ctx.fill_text(
			node.name(),
			x + radius * LABEL_OFFSET_X,
			y - radius * LABEL_OFFSET_Y,
		);
	}

	clear_shadow(ctx);
}

fn apply_shadow(ctx: &CanvasRenderingContext2d, shadow: &Shadow) {
	ctx.set_shadow_color(&shadow.color.to_css());
	ctx.set_shadow_blur(shadow.blur);
	ctx.set_shadow_offset_x(shadow.offset_x);
	ctx.set_shadow_offset_y(shadow.offset_y);
}

fn clear_shadow(ctx: &CanvasRenderingContext2d) {
	ctx.set_shadow_color("rgba(0, 0, 0, 0)");
	ctx.set_shadow_blur(0.0);
	ctx.set_shadow_offset_x(0.0);
	ctx.set_shadow_offset_y(0.0);
}
