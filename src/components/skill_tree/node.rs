//! Skill nodes and their completion rules.
//!
//! A node is one record tagged with its [`CompletionStatus`]. Flipping the tag
//! never happens in place: [`SkillNode::toggled`] builds a fresh record with a
//! new revision and the owning graph swaps it in. Neighbours are referenced by
//! [`NodeHandle`] and resolved through a [`NodeLookup`], so nodes never hold
//! pointers to each other.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::theme::{NodeLook, StatusProfile};

/// Stable node identifier taken from the input data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Reference to one specific variant of a node.
///
/// The id is the node's logical identity; the revision changes every time the
/// node is replaced by a toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle {
	/// Logical identity of the node.
	pub id: NodeId,
	/// Which variant of the node this handle names.
	pub revision: u64,
}

/// Whether a skill has been completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionStatus {
	/// The skill is done and unlocks its dependents.
	Completed,
	/// The skill is still open.
	Uncompleted,
}

impl CompletionStatus {
	/// Status for an `isCompleted` input flag.
	pub fn from_flag(is_completed: bool) -> Self {
		if is_completed {
			Self::Completed
		} else {
			Self::Uncompleted
		}
	}

	/// Whether this is [`CompletionStatus::Completed`].
	pub fn is_completed(self) -> bool {
		self == Self::Completed
	}

	/// The status a toggle flips to.
	pub fn opposite(self) -> Self {
		match self {
			Self::Completed => Self::Uncompleted,
			Self::Uncompleted => Self::Completed,
		}
	}
}

impl fmt::Display for CompletionStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Completed => write!(f, "completed"),
			Self::Uncompleted => write!(f, "uncompleted"),
		}
	}
}

/// Interactive visual state, orthogonal to completion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VisualState {
	/// Resting look.
	#[default]
	Idle,
	/// Pointer is over the node.
	Hover,
	/// Node is the selection.
	Active,
}

/// Read access to the live node variants of a graph.
pub trait NodeLookup {
	/// The live variant of `id`, if the graph has that node.
	fn node(&self, id: NodeId) -> Option<&SkillNode>;

	/// Whether `id` exists and is completed.
	fn is_completed(&self, id: NodeId) -> bool {
		self.node(id).is_some_and(|n| n.status().is_completed())
	}
}

/// A vertex of the skill tree.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillNode {
	handle: NodeHandle,
	name: String,
	description: String,
	position: (f64, f64),
	status: CompletionStatus,
	visual: VisualState,
	pub(super) parents: Vec<NodeHandle>,
	pub(super) children: Vec<NodeHandle>,
	/// Indices of edges ending at this node.
	pub(super) incoming: Vec<usize>,
	/// Indices of edges starting at this node.
	pub(super) outgoing: Vec<usize>,
}

impl SkillNode {
	/// A new idle node.
	pub fn new(
		handle: NodeHandle,
		name: impl Into<String>,
		description: impl Into<String>,
		position: (f64, f64),
		status: CompletionStatus,
	) -> Self {
		Self {
			handle,
			name: name.into(),
			description: description.into(),
			position,
			status,
			visual: VisualState::Idle,
			parents: Vec::new(),
			children: Vec::new(),
			incoming: Vec::new(),
			outgoing: Vec::new(),
		}
	}

	/// Logical node id.
	pub fn id(&self) -> NodeId {
		self.handle.id
	}

	/// Handle naming this exact variant.
	pub fn handle(&self) -> NodeHandle {
		self.handle
	}

	/// Display name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Longer text shown in the details panel.
	pub fn description(&self) -> &str {
		&self.description
	}

	/// Fixed position in graph coordinates.
	pub fn position(&self) -> (f64, f64) {
		self.position
	}

	/// Completion status of this variant.
	pub fn status(&self) -> CompletionStatus {
		self.status
	}

	/// Current visual state.
	pub fn visual(&self) -> VisualState {
		self.visual
	}

	/// Handles of the prerequisites of this node.
	pub fn parents(&self) -> &[NodeHandle] {
		&self.parents
	}

	/// Handles of the nodes this one unlocks.
	pub fn children(&self) -> &[NodeHandle] {
		&self.children
	}

	/// Indices of edges ending at this node.
	pub fn incoming_edges(&self) -> &[usize] {
		&self.incoming
	}

	/// Indices of edges starting at this node.
	pub fn outgoing_edges(&self) -> &[usize] {
		&self.outgoing
	}

	/// Whether the completion status may flip given the neighbours in `nodes`.
	///
	/// An uncompleted node needs no parents or at least one completed parent.
	/// A completed node may revert only if each of its completed children keeps
	/// another completed parent.
	pub fn can_toggle(&self, nodes: &impl NodeLookup) -> bool {
		match self.status {
			CompletionStatus::Uncompleted => {
				self.parents.is_empty() || self.parents.iter().any(|p| nodes.is_completed(p.id))
			}
			CompletionStatus::Completed => self
				.children
				.iter()
				.filter_map(|c| nodes.node(c.id))
				.filter(|child| child.status.is_completed())
				.all(|child| {
					child
						.parents
						.iter()
						.any(|p| p.id != self.id() && nodes.is_completed(p.id))
				}),
		}
	}

	/// Builds the opposite-status variant under `revision`, or `None` if the
	/// toggle is not legal. `self` is left untouched.
	pub fn toggled(&self, nodes: &impl NodeLookup, revision: u64) -> Option<SkillNode> {
		if !self.can_toggle(nodes) {
			return None;
		}
		Some(SkillNode {
			handle: NodeHandle {
				id: self.id(),
				revision,
			},
			status: self.status.opposite(),
			..self.clone()
		})
	}

	/// Returns to the resting look.
	pub fn set_idle(&mut self) {
		self.visual = VisualState::Idle;
	}

	/// Shows the hover look.
	pub fn set_hover(&mut self) {
		self.visual = VisualState::Hover;
	}

	/// Shows the selected look.
	pub fn set_active(&mut self) {
		self.visual = VisualState::Active;
	}

	/// Drawing parameters for the current visual state under `profile`.
	pub fn look(&self, profile: &StatusProfile) -> NodeLook {
		profile.look(self.visual)
	}

	pub(super) fn replace_parent(&mut self, handle: NodeHandle) {
		for parent in self.parents.iter_mut().filter(|p| p.id == handle.id) {
			*parent = handle;
		}
	}

	pub(super) fn replace_child(&mut self, handle: NodeHandle) {
		for child in self.children.iter_mut().filter(|c| c.id == handle.id) {
			*child = handle;
		}
	}
}
