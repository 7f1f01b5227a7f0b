//! Translation between pointer input and skill graph operations.
//!
//! The adapter owns no graph state besides which node the pointer is over. It
//! turns hit-test results into hover enter/leave pairs, clicks into selection,
//! panel buttons into toggles, and reports back what the view should show.
//! Every visible change is followed by [`Surface::request_redraw`].

use log::{info, warn};

use super::error::Result;
use super::graph::SkillGraph;
use super::node::{CompletionStatus, NodeId, SkillNode};

/// Something that can display the graph and be asked to repaint it.
pub trait Surface {
	/// Asks for the graph to be painted again on the next frame.
	fn request_redraw(&mut self);
}

/// A discrete pointer event, already resolved to the node under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
	/// Click on a node, or on the background (`None`).
	Click(Option<NodeId>),
	/// Pointer moved onto a node.
	HoverEnter(NodeId),
	/// Pointer moved off a node.
	HoverLeave(NodeId),
}

/// What the details panel should react to after an event.
#[derive(Clone, Debug, PartialEq)]
pub enum Feedback {
	/// Nothing for the panel to change.
	None,
	/// A node became the selection.
	Selected(NodeId),
	/// The selection was cleared.
	Deselected,
	/// The selected node flipped to `status`.
	Toggled {
		/// Node that flipped.
		id: NodeId,
		/// Its new status.
		status: CompletionStatus,
	},
	/// The selected node cannot flip right now.
	Rejected(NodeId),
}

/// Snapshot of a node for the details panel.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDetails {
	/// Node being described.
	pub id: NodeId,
	/// Display name.
	pub label: String,
	/// Longer text shown in the panel body.
	pub description: String,
	/// Completion status at the time of the snapshot.
	pub status: CompletionStatus,
}

impl From<&SkillNode> for NodeDetails {
	fn from(node: &SkillNode) -> Self {
		Self {
			id: node.id(),
			label: node.name().to_string(),
			description: node.description().to_string(),
			status: node.status(),
		}
	}
}

/// Turns pointer input and panel buttons into graph operations.
#[derive(Clone, Debug, Default)]
pub struct InteractionAdapter {
	hovered: Option<NodeId>,
}

impl InteractionAdapter {
	/// An adapter with nothing hovered.
	pub fn new() -> Self {
		Self::default()
	}

	/// The node currently under the pointer.
	pub fn hovered(&self) -> Option<NodeId> {
		self.hovered
	}

	/// Feeds the latest hit-test result, emitting leave/enter as needed.
	pub fn pointer_moved(
		&mut self,
		graph: &mut SkillGraph,
		hit: Option<NodeId>,
		surface: &mut impl Surface,
	) -> Result<()> {
		if self.hovered == hit {
			return Ok(());
		}
		if let Some(previous) = self.hovered {
			self.handle(graph, PointerEvent::HoverLeave(previous), surface)?;
		}
		if let Some(id) = hit {
			self.handle(graph, PointerEvent::HoverEnter(id), surface)?;
		}
		Ok(())
	}

	/// Applies one pointer event to the graph.
	pub fn handle(
		&mut self,
		graph: &mut SkillGraph,
		event: PointerEvent,
		surface: &mut impl Surface,
	) -> Result<Feedback> {
		match event {
			PointerEvent::Click(None) => Ok(Feedback::None),
			PointerEvent::Click(Some(id)) => {
				if graph.active_id() == Some(id) {
					return Ok(Feedback::None);
				}
				graph.select(id)?;
				surface.request_redraw();
				Ok(Feedback::Selected(id))
			}
			PointerEvent::HoverEnter(id) => {
				self.hovered = Some(id);
				if graph.hover_enter(id)? {
					surface.request_redraw();
				}
				Ok(Feedback::None)
			}
			PointerEvent::HoverLeave(id) => {
				if self.hovered == Some(id) {
					self.hovered = None;
				}
				if graph.hover_leave(id)? {
					surface.request_redraw();
				}
				Ok(Feedback::None)
			}
		}
	}

	/// The panel's complete/revert button.
	pub fn toggle_selected(
		&mut self,
		graph: &mut SkillGraph,
		surface: &mut impl Surface,
	) -> Result<Feedback> {
		let toggled = graph.toggle_active()?;
		let Some(node) = graph.active() else {
			return Ok(Feedback::None);
		};
		let id = node.id();
		if !toggled {
			warn!("skill-tree: node {} cannot be toggled right now", id);
			return Ok(Feedback::Rejected(id));
		}
		let status = node.status();
		info!("skill-tree: node {} marked {}", id, status);
		surface.request_redraw();
		Ok(Feedback::Toggled { id, status })
	}

	/// The panel's close button.
	pub fn close_details(&mut self, graph: &mut SkillGraph, surface: &mut impl Surface) -> Feedback {
		if graph.active_id().is_none() {
			return Feedback::None;
		}
		graph.deselect();
		surface.request_redraw();
		Feedback::Deselected
	}

	/// Details of the selected node, if any.
	pub fn details(graph: &SkillGraph) -> Option<NodeDetails> {
		graph.active().map(NodeDetails::from)
	}
}
