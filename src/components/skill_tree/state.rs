//! View state and interaction tracking for the skill tree canvas.
//!
//! Wraps the [`SkillGraph`] with the view transform for pan/zoom, the pointer
//! adapter, and per-node radius transitions so size changes between visual
//! states animate smoothly instead of jumping.

use std::collections::HashMap;

use super::adapter::{Feedback, InteractionAdapter, NodeDetails, PointerEvent, Surface};
use super::error::Result;
use super::graph::SkillGraph;
use super::node::{NodeId, SkillNode};
use super::theme::Theme;

/// Furthest the wheel zooms out.
pub const MIN_ZOOM: f64 = 0.3;
/// Furthest the wheel zooms in.
pub const MAX_ZOOM: f64 = 1.5;

/// Pointer travel (screen pixels) beyond which a press counts as a pan, not a click.
const CLICK_SLOP: f64 = 4.0;

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal pan in screen pixels.
	pub x: f64,
	/// Vertical pan in screen pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to `MIN_ZOOM..=MAX_ZOOM`).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

/// Tracks an in-progress press on the canvas, which may turn into a pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// A press is in progress on the background.
	pub active: bool,
	/// Set once the pointer has travelled far enough to be a drag.
	pub moved: bool,
	/// Screen x where the press started.
	pub start_x: f64,
	/// Screen y where the press started.
	pub start_y: f64,
	/// Transform x when the press started.
	pub transform_start_x: f64,
	/// Transform y when the press started.
	pub transform_start_y: f64,
}

/// Smoothly animates each node's drawn radius towards the radius of its
/// current look.
///
/// Uses exponential smoothing, which eases out as the value approaches its
/// target. Nodes seen for the first time start at their target radius.
#[derive(Clone, Debug, Default)]
pub struct RadiusTransitions {
	radius: HashMap<NodeId, f64>,
	settled: bool,
}

impl RadiusTransitions {
	/// Higher = faster. Reaches ~95% of the way in about 50ms.
	const SPEED: f64 = 60.0;
	/// Below this distance from the target a radius snaps into place.
	const EPSILON: f64 = 0.01;

	/// Moves every radius one frame of `dt` seconds towards its target.
	pub fn tick(&mut self, dt: f64, graph: &SkillGraph, theme: &Theme) {
		let factor = 1.0 - (-Self::SPEED * dt).exp();
		let mut settled = true;

		for node in graph.nodes() {
			let target = target_radius(node, theme);
			let radius = self.radius.entry(node.id()).or_insert(target);
			*radius += (target - *radius) * factor;
			if (target - *radius).abs() < Self::EPSILON {
				*radius = target;
			} else {
				settled = false;
			}
		}

		self.settled = settled;
	}

	/// The drawn radius of `node`, or its target if it has not been animated yet.
	pub fn radius(&self, node: &SkillNode, theme: &Theme) -> f64 {
		self.radius
			.get(&node.id())
			.copied()
			.unwrap_or_else(|| target_radius(node, theme))
	}

	/// Whether every radius reached its target on the last tick.
	pub fn is_settled(&self) -> bool {
		self.settled
	}
}

fn target_radius(node: &SkillNode, theme: &Theme) -> f64 {
	node.look(theme.profile(node.status())).radius
}

/// Redraw requests collected from the adapter between frames.
#[derive(Clone, Debug, Default)]
pub struct FrameRequest {
	pending: bool,
}

impl Surface for FrameRequest {
	fn request_redraw(&mut self) {
		self.pending = true;
	}
}

/// Core view state combining the skill graph with interaction tracking.
///
/// Created once when the component mounts, then mutated by pointer events and
/// each animation frame.
pub struct SkillTreeState {
	/// The skill graph being shown.
	pub graph: SkillGraph,
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// Background press in progress, if any.
	pub pan: PanState,
	/// Animated node radii.
	pub radii: RadiusTransitions,
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Node the current press started on. Such a press never pans.
	pressed: Option<NodeId>,
	adapter: InteractionAdapter,
	frame: FrameRequest,
}

impl SkillTreeState {
	/// View state for `graph` on a canvas of the given size, with a first frame pending.
	pub fn new(graph: SkillGraph, width: f64, height: f64) -> Self {
		Self {
			graph,
			transform: ViewTransform::default(),
			pan: PanState::default(),
			radii: RadiusTransitions::default(),
			width,
			height,
			pressed: None,
			adapter: InteractionAdapter::new(),
			frame: FrameRequest { pending: true },
		}
	}

	/// Converts a screen position to graph coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// The topmost node under a screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64, theme: &Theme) -> Option<NodeId> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.graph
			.nodes()
			.filter(|node| {
				let (x, y) = node.position();
				let (dx, dy) = (x - gx, y - gy);
				(dx * dx + dy * dy).sqrt() < self.radii.radius(node, theme)
			})
			.last()
			.map(SkillNode::id)
	}

	/// The node currently under the pointer.
	pub fn hovered(&self) -> Option<NodeId> {
		self.adapter.hovered()
	}

	/// Starts a press. On a node it arms a click on that node; on the
	/// background it arms a pan.
	pub fn pointer_down(&mut self, sx: f64, sy: f64, theme: &Theme) {
		self.pressed = self.node_at_position(sx, sy, theme);
		if self.pressed.is_some() {
			self.pan = PanState::default();
			return;
		}
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Pans while a background press is dragging; otherwise updates hover.
	pub fn pointer_moved(&mut self, sx: f64, sy: f64, theme: &Theme) -> Result<()> {
		if self.pan.active {
			let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
			if !self.pan.moved && (dx * dx + dy * dy).sqrt() > CLICK_SLOP {
				self.pan.moved = true;
			}
			if self.pan.moved {
				self.transform.x = self.pan.transform_start_x + dx;
				self.transform.y = self.pan.transform_start_y + dy;
				self.frame.request_redraw();
				return Ok(());
			}
		}
		let hit = self.node_at_position(sx, sy, theme);
		self.adapter.pointer_moved(&mut self.graph, hit, &mut self.frame)
	}

	/// Ends a press. A press that started on a node clicks that node however
	/// far the pointer travelled; a background press that did not pan is a
	/// click on whatever is under the pointer.
	pub fn pointer_up(&mut self, sx: f64, sy: f64, theme: &Theme) -> Result<Feedback> {
		let was_pan = self.pan.active && self.pan.moved;
		self.pan = PanState::default();
		let hit = match self.pressed.take() {
			Some(id) => Some(id),
			None if was_pan => return Ok(Feedback::None),
			None => self.node_at_position(sx, sy, theme),
		};
		self.adapter
			.handle(&mut self.graph, PointerEvent::Click(hit), &mut self.frame)
	}

	/// Pointer left the canvas: ends any press and clears hover.
	pub fn pointer_left(&mut self) -> Result<()> {
		self.pan = PanState::default();
		self.pressed = None;
		self.adapter.pointer_moved(&mut self.graph, None, &mut self.frame)
	}

	/// Zooms by the wheel delta, keeping the point under the cursor fixed.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let new_k = (self.transform.k - delta_y / 1000.0).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
		self.frame.request_redraw();
	}

	/// The panel's complete/revert button.
	pub fn toggle_selected(&mut self) -> Result<Feedback> {
		self.adapter.toggle_selected(&mut self.graph, &mut self.frame)
	}

	/// The panel's close button.
	pub fn close_details(&mut self) -> Feedback {
		self.adapter.close_details(&mut self.graph, &mut self.frame)
	}

	/// Details of the selected node, if any.
	pub fn details(&self) -> Option<NodeDetails> {
		InteractionAdapter::details(&self.graph)
	}

	/// Advances radius transitions by `dt` seconds.
	pub fn tick(&mut self, dt: f64, theme: &Theme) {
		self.radii.tick(dt, &self.graph, theme);
	}

	/// Whether the next frame must be painted. Clears pending redraw requests.
	pub fn take_frame(&mut self) -> bool {
		let pending = std::mem::take(&mut self.frame.pending);
		pending || !self.radii.is_settled()
	}

	/// Canvas was resized.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.frame.request_redraw();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::skill_tree::node::{CompletionStatus, NodeLookup, VisualState};
	use crate::components::skill_tree::types::{LinkInfo, NodeInfo};

	fn state() -> SkillTreeState {
		let node = |id: i64, x: f64, y: f64| NodeInfo {
			id: NodeId(id),
			x,
			y,
			label: format!("skill {id}"),
			description: String::new(),
			is_completed: false,
		};
		let graph = SkillGraph::from_parts(
			&[node(1, 100.0, 100.0), node(2, 300.0, 100.0)],
			&[LinkInfo {
				source_id: NodeId(1),
				target_id: NodeId(2),
			}],
		)
		.unwrap();
		SkillTreeState::new(graph, 800.0, 600.0)
	}

	#[test]
	fn screen_and_graph_coordinates_agree() {
		let mut state = state();
		state.transform = ViewTransform { x: 50.0, y: -20.0, k: 0.5 };
		assert_eq!(state.screen_to_graph(100.0, 30.0), (100.0, 100.0));
	}

	#[test]
	fn hit_test_uses_node_radius() {
		let theme = Theme::default();
		let state = state();
		assert_eq!(state.node_at_position(110.0, 110.0, &theme), Some(NodeId(1)));
		assert_eq!(state.node_at_position(300.0, 125.0, &theme), Some(NodeId(2)));
		assert_eq!(state.node_at_position(200.0, 100.0, &theme), None);
	}

	#[test]
	fn wheel_zoom_is_clamped_and_anchored() {
		let mut state = state();
		state.wheel(400.0, 300.0, -200.0);
		assert!((state.transform.k - 1.2).abs() < 1e-9);
		let (gx, gy) = state.screen_to_graph(400.0, 300.0);
		assert!((gx - 400.0).abs() < 1e-9 && (gy - 300.0).abs() < 1e-9);

		state.wheel(400.0, 300.0, -5000.0);
		assert_eq!(state.transform.k, MAX_ZOOM);
		state.wheel(0.0, 0.0, 5000.0);
		assert_eq!(state.transform.k, MIN_ZOOM);
	}

	#[test]
	fn press_and_release_on_node_selects_it() {
		let theme = Theme::default();
		let mut state = state();
		state.pointer_down(100.0, 100.0, &theme);
		let feedback = state.pointer_up(101.0, 100.0, &theme).unwrap();
		assert_eq!(feedback, Feedback::Selected(NodeId(1)));
		assert_eq!(state.details().unwrap().id, NodeId(1));
	}

	#[test]
	fn dragging_pans_instead_of_clicking() {
		let theme = Theme::default();
		let mut state = state();
		state.pointer_down(500.0, 500.0, &theme);
		state.pointer_moved(540.0, 530.0, &theme).unwrap();
		assert_eq!((state.transform.x, state.transform.y), (40.0, 30.0));

		let feedback = state.pointer_up(540.0, 530.0, &theme).unwrap();
		assert_eq!(feedback, Feedback::None);
		assert!(!state.pan.active);
		assert_eq!(state.graph.active_id(), None);
	}

	#[test]
	fn drag_from_node_still_selects() {
		let theme = Theme::default();
		let mut state = state();
		state.pointer_down(100.0, 100.0, &theme);
		assert!(!state.pan.active);

		state.pointer_moved(140.0, 100.0, &theme).unwrap();
		assert_eq!(state.transform, ViewTransform::default());

		let feedback = state.pointer_up(140.0, 100.0, &theme).unwrap();
		assert_eq!(feedback, Feedback::Selected(NodeId(1)));
		assert_eq!(state.graph.active_id(), Some(NodeId(1)));
	}

	#[test]
	fn hovering_animates_radius_until_settled() {
		let theme = Theme::default();
		let mut state = state();
		state.tick(0.016, &theme);
		assert!(state.radii.is_settled());
		assert!(state.take_frame());
		assert!(!state.take_frame());

		state.pointer_moved(100.0, 100.0, &theme).unwrap();
		assert_eq!(state.hovered(), Some(NodeId(1)));
		assert_eq!(state.graph.node(NodeId(1)).unwrap().visual(), VisualState::Hover);

		state.tick(0.016, &theme);
		let node = state.graph.node(NodeId(1)).unwrap();
		let radius = state.radii.radius(node, &theme);
		assert!(radius > theme.uncompleted.idle_size && radius < theme.uncompleted.active_size);
		assert!(state.take_frame());

		for _ in 0..60 {
			state.tick(0.016, &theme);
		}
		let node = state.graph.node(NodeId(1)).unwrap();
		assert_eq!(state.radii.radius(node, &theme), theme.uncompleted.active_size);
		assert!(!state.take_frame());
	}

	#[test]
	fn leaving_canvas_clears_hover() {
		let theme = Theme::default();
		let mut state = state();
		state.pointer_moved(300.0, 100.0, &theme).unwrap();
		state.pointer_left().unwrap();
		assert_eq!(state.hovered(), None);
		assert_eq!(state.graph.node(NodeId(2)).unwrap().visual(), VisualState::Idle);
	}

	#[test]
	fn panel_buttons_drive_the_graph() {
		let theme = Theme::default();
		let mut state = state();
		state.pointer_down(100.0, 100.0, &theme);
		state.pointer_up(100.0, 100.0, &theme).unwrap();

		assert!(matches!(state.toggle_selected(), Ok(Feedback::Toggled { .. })));
		assert_eq!(state.details().unwrap().status, CompletionStatus::Completed);

		assert_eq!(state.close_details(), Feedback::Deselected);
		assert!(state.details().is_none());
	}
}
