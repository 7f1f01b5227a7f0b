//! Dependency edges between skill nodes.
//!
//! An edge is created once when the graph is built and lives as long as the
//! graph. Toggling a node rebinds the endpoint handle to the new variant and
//! recomputes the derived [`ActivityLevel`].

use super::node::{CompletionStatus, NodeHandle, NodeId, NodeLookup};

/// How lit an edge is, derived from the completion of its endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActivityLevel {
	/// Source not completed.
	Inactive,
	/// Source completed, target not yet.
	SemiActive,
	/// Both endpoints completed.
	Active,
}

impl ActivityLevel {
	/// Activity of an edge whose endpoints have these statuses.
	pub fn from_statuses(source: CompletionStatus, target: CompletionStatus) -> Self {
		match (source, target) {
			(CompletionStatus::Completed, CompletionStatus::Completed) => Self::Active,
			(CompletionStatus::Completed, CompletionStatus::Uncompleted) => Self::SemiActive,
			(CompletionStatus::Uncompleted, _) => Self::Inactive,
		}
	}
}

/// A directed prerequisite relation `source -> target`.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	source: NodeHandle,
	target: NodeHandle,
	activity: ActivityLevel,
}

impl Edge {
	/// An edge between two node variants, with activity read from `nodes`.
	pub fn new(source: NodeHandle, target: NodeHandle, nodes: &impl NodeLookup) -> Self {
		let mut edge = Self {
			source,
			target,
			activity: ActivityLevel::Inactive,
		};
		edge.refresh_activity(nodes);
		edge
	}

	/// Variant of the prerequisite this edge currently points at.
	pub fn source(&self) -> NodeHandle {
		self.source
	}

	/// Variant of the dependent this edge currently points at.
	pub fn target(&self) -> NodeHandle {
		self.target
	}

	/// The logical `(source, target)` pair, stable across rebinds.
	pub fn endpoints(&self) -> (NodeId, NodeId) {
		(self.source.id, self.target.id)
	}

	/// Current derived activity level.
	pub fn activity(&self) -> ActivityLevel {
		self.activity
	}

	/// Recomputes the activity level from the live endpoint statuses. A missing
	/// endpoint counts as uncompleted.
	pub fn refresh_activity(&mut self, nodes: &impl NodeLookup) {
		let status = |id| CompletionStatus::from_flag(nodes.is_completed(id));
		self.activity = ActivityLevel::from_statuses(status(self.source.id), status(self.target.id));
	}

	/// Points the source at a new variant of the same node. Returns `false`
	/// and leaves the edge unchanged if `handle` belongs to another node.
	#[must_use]
	pub fn rebind_source(&mut self, handle: NodeHandle) -> bool {
		if handle.id != self.source.id {
			return false;
		}
		self.source = handle;
		true
	}

	/// Points the target at a new variant of the same node. Returns `false`
	/// and leaves the edge unchanged if `handle` belongs to another node.
	#[must_use]
	pub fn rebind_target(&mut self, handle: NodeHandle) -> bool {
		if handle.id != self.target.id {
			return false;
		}
		self.target = handle;
		true
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;
	use crate::components::skill_tree::node::SkillNode;

	struct Nodes(HashMap<NodeId, SkillNode>);

	impl NodeLookup for Nodes {
		fn node(&self, id: NodeId) -> Option<&SkillNode> {
			self.0.get(&id)
		}
	}

	fn handle(id: i64, revision: u64) -> NodeHandle {
		NodeHandle {
			id: NodeId(id),
			revision,
		}
	}

	fn nodes(statuses: &[(i64, CompletionStatus)]) -> Nodes {
		Nodes(
			statuses
				.iter()
				.map(|&(id, status)| {
					(
						NodeId(id),
						SkillNode::new(handle(id, 0), "", "", (0.0, 0.0), status),
					)
				})
				.collect(),
		)
	}

	#[test]
	fn activity_follows_endpoint_statuses() {
		use super::CompletionStatus::{Completed as C, Uncompleted as U};
		let cases = [
			(C, C, ActivityLevel::Active),
			(C, U, ActivityLevel::SemiActive),
			(U, C, ActivityLevel::Inactive),
			(U, U, ActivityLevel::Inactive),
		];
		for (source, target, expected) in cases {
			let nodes = nodes(&[(1, source), (2, target)]);
			let edge = Edge::new(handle(1, 0), handle(2, 0), &nodes);
			assert_eq!(edge.activity(), expected, "{source} -> {target}");
		}
	}

	#[test]
	fn refresh_picks_up_status_changes() {
		let mut edge = Edge::new(
			handle(1, 0),
			handle(2, 0),
			&nodes(&[(1, CompletionStatus::Uncompleted), (2, CompletionStatus::Uncompleted)]),
		);
		assert_eq!(edge.activity(), ActivityLevel::Inactive);

		edge.refresh_activity(&nodes(&[
			(1, CompletionStatus::Completed),
			(2, CompletionStatus::Uncompleted),
		]));
		assert_eq!(edge.activity(), ActivityLevel::SemiActive);
	}

	#[test]
	fn rebind_keeps_logical_endpoints() {
		let nodes = nodes(&[(1, CompletionStatus::Uncompleted), (2, CompletionStatus::Uncompleted)]);
		let mut edge = Edge::new(handle(1, 0), handle(2, 0), &nodes);

		assert!(edge.rebind_source(handle(1, 5)));
		assert!(edge.rebind_target(handle(2, 6)));
		assert_eq!(edge.source(), handle(1, 5));
		assert_eq!(edge.target(), handle(2, 6));
		assert_eq!(edge.endpoints(), (NodeId(1), NodeId(2)));
	}

	#[test]
	fn rebind_refuses_foreign_node() {
		let nodes = nodes(&[(1, CompletionStatus::Uncompleted), (2, CompletionStatus::Uncompleted)]);
		let mut edge = Edge::new(handle(1, 0), handle(2, 0), &nodes);

		assert!(!edge.rebind_source(handle(2, 9)));
		assert!(!edge.rebind_target(handle(1, 9)));
		assert_eq!(edge.endpoints(), (NodeId(1), NodeId(2)));
		assert_eq!(edge.source().revision, 0);
	}
}
