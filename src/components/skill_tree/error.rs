//! Error taxonomy for building and driving a skill graph.
//!
//! A blocked toggle is not represented here: it is the ordinary `Ok(false)`
//! outcome of [`SkillGraph::toggle_active`](super::graph::SkillGraph::toggle_active).

use thiserror::Error;

use super::node::NodeId;

/// Failures when building or driving a [`SkillGraph`](super::graph::SkillGraph).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
	/// Two node descriptions share an id.
	#[error("duplicate node id {0}")]
	DuplicateId(NodeId),
	/// A link names a node id absent from the node set.
	#[error("link {from} -> {to} references unknown node {missing}")]
	DanglingReference {
		/// Source of the offending link.
		from: NodeId,
		/// Target of the offending link.
		to: NodeId,
		/// The endpoint that does not exist.
		missing: NodeId,
	},
	/// A link points from a node to itself.
	#[error("node {0} cannot be its own prerequisite")]
	SelfReference(NodeId),
	/// `toggle_active` was called with nothing selected.
	#[error("no node is selected")]
	NoActiveNode,
	/// An operation named an id that is not in the graph.
	#[error("unknown node {0}")]
	UnknownNode(NodeId),
}

/// Result of skill graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
