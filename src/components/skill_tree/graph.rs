//! The skill graph: node arena, edges, selection and the toggle transaction.
//!
//! Nodes live in an arena in input order and are addressed by [`NodeId`].
//! Neighbour lists and edge endpoints hold [`NodeHandle`]s, so replacing a
//! node on toggle is a re-index of those handles rather than pointer surgery.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::edge::Edge;
use super::error::{GraphError, Result};
use super::node::{CompletionStatus, NodeHandle, NodeId, NodeLookup, SkillNode, VisualState};
use super::types::{GraphData, LinkInfo, NodeInfo};

/// Node storage keyed by id, preserving insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
struct NodeArena {
	nodes: Vec<SkillNode>,
	index: HashMap<NodeId, usize>,
}

impl NodeArena {
	fn slot(&self, id: NodeId) -> Option<usize> {
		self.index.get(&id).copied()
	}

	fn get_mut(&mut self, id: NodeId) -> Option<&mut SkillNode> {
		let slot = self.slot(id)?;
		self.nodes.get_mut(slot)
	}
}

impl NodeLookup for NodeArena {
	fn node(&self, id: NodeId) -> Option<&SkillNode> {
		self.nodes.get(self.slot(id)?)
	}
}

/// A skill tree and its interaction state.
///
/// Built once from [`GraphData`], then driven by [`select`](Self::select),
/// [`deselect`](Self::deselect) and [`toggle_active`](Self::toggle_active).
/// At most one node is selected (and visually active) at a time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillGraph {
	arena: NodeArena,
	edges: Vec<Edge>,
	active: Option<NodeId>,
	next_revision: u64,
}

impl NodeLookup for SkillGraph {
	fn node(&self, id: NodeId) -> Option<&SkillNode> {
		self.arena.node(id)
	}
}

impl SkillGraph {
	/// Builds a graph from page data. See [`from_parts`](Self::from_parts).
	pub fn build(data: &GraphData) -> Result<Self> {
		Self::from_parts(&data.nodes, &data.links)
	}

	/// Builds a graph from node and link descriptions.
	///
	/// Fails on duplicate node ids, links naming unknown nodes, and links from a
	/// node to itself. Repeated links collapse into the first one.
	pub fn from_parts(nodes: &[NodeInfo], links: &[LinkInfo]) -> Result<Self> {
		let mut graph = Self {
			arena: NodeArena::default(),
			edges: Vec::with_capacity(links.len()),
			active: None,
			next_revision: 0,
		};

		for info in nodes {
			if graph.arena.index.contains_key(&info.id) {
				return Err(GraphError::DuplicateId(info.id));
			}
			let handle = graph.fresh_handle(info.id);
			let node = SkillNode::new(
				handle,
				&info.label,
				&info.description,
				(info.x, info.y),
				CompletionStatus::from_flag(info.is_completed),
			);
			graph.arena.index.insert(info.id, graph.arena.nodes.len());
			graph.arena.nodes.push(node);
		}

		let mut seen = HashSet::new();
		for link in links {
			let (from, to) = (link.source_id, link.target_id);
			let (Some(src), Some(tgt)) = (graph.arena.slot(from), graph.arena.slot(to)) else {
				let missing = if graph.arena.slot(from).is_none() { from } else { to };
				return Err(GraphError::DanglingReference { from, to, missing });
			};
			if from == to {
				return Err(GraphError::SelfReference(from));
			}
			if !seen.insert((from, to)) {
				warn!("skill-tree: ignoring repeated link {} -> {}", from, to);
				continue;
			}

			let edge_idx = graph.edges.len();
			let src_handle = graph.arena.nodes[src].handle();
			let tgt_handle = graph.arena.nodes[tgt].handle();
			let edge = Edge::new(src_handle, tgt_handle, &graph.arena);
			graph.edges.push(edge);

			let source = &mut graph.arena.nodes[src];
			source.children.push(tgt_handle);
			source.outgoing.push(edge_idx);
			let target = &mut graph.arena.nodes[tgt];
			target.parents.push(src_handle);
			target.incoming.push(edge_idx);
		}

		debug!(
			"skill-tree: built graph with {} nodes, {} edges",
			graph.arena.nodes.len(),
			graph.edges.len()
		);
		Ok(graph)
	}

	fn fresh_handle(&mut self, id: NodeId) -> NodeHandle {
		let revision = self.next_revision;
		self.next_revision += 1;
		NodeHandle { id, revision }
	}

	/// All nodes in input order.
	pub fn nodes(&self) -> impl Iterator<Item = &SkillNode> {
		self.arena.nodes.iter()
	}

	/// All edges in link order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// The edge `from -> to`, if the graph has one.
	pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
		let source = self.node(from)?;
		source
			.outgoing_edges()
			.iter()
			.map(|&e| &self.edges[e])
			.find(|edge| edge.endpoints() == (from, to))
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.arena.nodes.len()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Id of the selected node, if any.
	pub fn active_id(&self) -> Option<NodeId> {
		self.active
	}

	/// The currently selected node.
	pub fn active(&self) -> Option<&SkillNode> {
		self.node(self.active?)
	}

	/// Selects `id`, returning the previously active node to idle first.
	pub fn select(&mut self, id: NodeId) -> Result<()> {
		if self.arena.slot(id).is_none() {
			return Err(GraphError::UnknownNode(id));
		}
		if let Some(previous) = self.active.filter(|&prev| prev != id) {
			if let Some(node) = self.arena.get_mut(previous) {
				node.set_idle();
			}
		}
		if let Some(node) = self.arena.get_mut(id) {
			node.set_active();
		}
		self.active = Some(id);
		debug!("skill-tree: selected node {}", id);
		Ok(())
	}

	/// Clears the selection. Does nothing when no node is selected.
	pub fn deselect(&mut self) {
		if let Some(id) = self.active.take() {
			if let Some(node) = self.arena.get_mut(id) {
				node.set_idle();
			}
			debug!("skill-tree: deselected node {}", id);
		}
	}

	/// Pointer entered `id`. Only an idle node starts hovering.
	///
	/// Returns whether the visual state changed.
	pub fn hover_enter(&mut self, id: NodeId) -> Result<bool> {
		let node = self.arena.get_mut(id).ok_or(GraphError::UnknownNode(id))?;
		if node.visual() != VisualState::Idle {
			return Ok(false);
		}
		node.set_hover();
		Ok(true)
	}

	/// Pointer left `id`. Only a hovering node returns to idle.
	///
	/// Returns whether the visual state changed.
	pub fn hover_leave(&mut self, id: NodeId) -> Result<bool> {
		let node = self.arena.get_mut(id).ok_or(GraphError::UnknownNode(id))?;
		if node.visual() != VisualState::Hover {
			return Ok(false);
		}
		node.set_idle();
		Ok(true)
	}

	/// Flips the completion status of the selected node.
	///
	/// Returns `Ok(false)` without touching anything when the flip is not
	/// allowed. On success the node is replaced by a new variant, every
	/// neighbour list and touching edge is rebound to it, the touching edges'
	/// activity is recomputed, and the new variant stays selected.
	pub fn toggle_active(&mut self) -> Result<bool> {
		let id = self.active.ok_or(GraphError::NoActiveNode)?;
		let slot = self.arena.slot(id).ok_or(GraphError::UnknownNode(id))?;

		let Some(mut next) = self.arena.nodes[slot].toggled(&self.arena, self.next_revision) else {
			debug!("skill-tree: toggle of node {} blocked", id);
			return Ok(false);
		};
		self.next_revision += 1;
		let handle = next.handle();

		for &e in next.outgoing_edges() {
			let rebound = self.edges[e].rebind_source(handle);
			debug_assert!(rebound, "edge {e} does not start at node {id}");
		}
		for &e in next.incoming_edges() {
			let rebound = self.edges[e].rebind_target(handle);
			debug_assert!(rebound, "edge {e} does not end at node {id}");
		}
		for parent in next.parents() {
			if let Some(node) = self.arena.get_mut(parent.id) {
				node.replace_child(handle);
			}
		}
		for child in next.children() {
			if let Some(node) = self.arena.get_mut(child.id) {
				node.replace_parent(handle);
			}
		}

		next.set_active();
		let touching: Vec<usize> = next
			.outgoing_edges()
			.iter()
			.chain(next.incoming_edges())
			.copied()
			.collect();
		let status = next.status();
		self.arena.nodes[slot] = next;
		for e in touching {
			self.edges[e].refresh_activity(&self.arena);
		}

		self.active = Some(id);
		debug!("skill-tree: node {} is now {}", id, status);
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::skill_tree::edge::ActivityLevel;

	fn info(id: i64, is_completed: bool) -> NodeInfo {
		NodeInfo {
			id: NodeId(id),
			x: id as f64 * 10.0,
			y: 0.0,
			label: format!("skill {id}"),
			description: String::new(),
			is_completed,
		}
	}

	fn link(from: i64, to: i64) -> LinkInfo {
		LinkInfo {
			source_id: NodeId(from),
			target_id: NodeId(to),
		}
	}

	fn status(graph: &SkillGraph, id: i64) -> CompletionStatus {
		graph.node(NodeId(id)).unwrap().status()
	}

	fn visual(graph: &SkillGraph, id: i64) -> VisualState {
		graph.node(NodeId(id)).unwrap().visual()
	}

	#[test]
	fn build_wires_parents_children_and_edges() {
		let graph = SkillGraph::from_parts(
			&[info(1, true), info(2, false), info(3, false)],
			&[link(1, 2), link(1, 3)],
		)
		.unwrap();

		assert_eq!(graph.node_count(), 3);
		assert_eq!(graph.edge_count(), 2);
		let root = graph.node(NodeId(1)).unwrap();
		assert_eq!(root.outgoing_edges(), &[0, 1]);
		assert!(root.parents().is_empty());
		let ids: Vec<NodeId> = root.children().iter().map(|h| h.id).collect();
		assert_eq!(ids, vec![NodeId(2), NodeId(3)]);
		assert_eq!(graph.node(NodeId(3)).unwrap().parents(), &[root.handle()]);
		assert_eq!(
			graph.edge(NodeId(1), NodeId(2)).unwrap().activity(),
			ActivityLevel::SemiActive
		);
		assert!(graph.edge(NodeId(2), NodeId(1)).is_none());
	}

	#[test]
	fn build_keeps_input_order() {
		let graph = SkillGraph::from_parts(&[info(5, false), info(2, false), info(9, false)], &[])
			.unwrap();
		let ids: Vec<i64> = graph.nodes().map(|n| n.id().0).collect();
		assert_eq!(ids, vec![5, 2, 9]);
	}

	#[test]
	fn build_rejects_duplicate_ids() {
		let err = SkillGraph::from_parts(&[info(1, false), info(1, true)], &[]).unwrap_err();
		assert_eq!(err, GraphError::DuplicateId(NodeId(1)));
	}

	#[test]
	fn build_rejects_dangling_links() {
		let err = SkillGraph::from_parts(&[info(1, false)], &[link(1, 7)]).unwrap_err();
		assert_eq!(
			err,
			GraphError::DanglingReference {
				from: NodeId(1),
				to: NodeId(7),
				missing: NodeId(7),
			}
		);

		let err = SkillGraph::from_parts(&[info(1, false)], &[link(3, 1)]).unwrap_err();
		assert!(matches!(
			err,
			GraphError::DanglingReference {
				missing: NodeId(3),
				..
			}
		));
	}

	#[test]
	fn build_rejects_self_links() {
		let err = SkillGraph::from_parts(&[info(1, false)], &[link(1, 1)]).unwrap_err();
		assert_eq!(err, GraphError::SelfReference(NodeId(1)));
	}

	#[test]
	fn build_collapses_repeated_links() {
		let graph =
			SkillGraph::from_parts(&[info(1, false), info(2, false)], &[link(1, 2), link(1, 2)])
				.unwrap();
		assert_eq!(graph.edge_count(), 1);
		assert_eq!(graph.node(NodeId(2)).unwrap().parents().len(), 1);
	}

	#[test]
	fn selection_is_exclusive() {
		let mut graph =
			SkillGraph::from_parts(&[info(1, false), info(2, false)], &[link(1, 2)]).unwrap();

		graph.select(NodeId(1)).unwrap();
		assert_eq!(visual(&graph, 1), VisualState::Active);

		graph.select(NodeId(2)).unwrap();
		assert_eq!(visual(&graph, 1), VisualState::Idle);
		assert_eq!(visual(&graph, 2), VisualState::Active);
		assert_eq!(graph.active_id(), Some(NodeId(2)));

		let active = graph
			.nodes()
			.filter(|n| n.visual() == VisualState::Active)
			.count();
		assert_eq!(active, 1);
	}

	#[test]
	fn reselecting_keeps_node_active() {
		let mut graph = SkillGraph::from_parts(&[info(1, false)], &[]).unwrap();
		graph.select(NodeId(1)).unwrap();
		graph.select(NodeId(1)).unwrap();
		assert_eq!(visual(&graph, 1), VisualState::Active);
	}

	#[test]
	fn select_unknown_node_changes_nothing() {
		let mut graph = SkillGraph::from_parts(&[info(1, false)], &[]).unwrap();
		graph.select(NodeId(1)).unwrap();
		let before = graph.clone();

		assert_eq!(graph.select(NodeId(4)), Err(GraphError::UnknownNode(NodeId(4))));
		assert_eq!(graph, before);
	}

	#[test]
	fn deselect_returns_node_to_idle() {
		let mut graph = SkillGraph::from_parts(&[info(1, false)], &[]).unwrap();
		graph.deselect();
		assert_eq!(graph.active_id(), None);

		graph.select(NodeId(1)).unwrap();
		graph.deselect();
		assert_eq!(graph.active_id(), None);
		assert!(graph.active().is_none());
		assert_eq!(visual(&graph, 1), VisualState::Idle);
	}

	#[test]
	fn hover_never_interrupts_active() {
		let mut graph = SkillGraph::from_parts(&[info(1, false), info(2, false)], &[]).unwrap();

		assert!(graph.hover_enter(NodeId(2)).unwrap());
		assert_eq!(visual(&graph, 2), VisualState::Hover);
		assert!(!graph.hover_enter(NodeId(2)).unwrap());
		assert!(graph.hover_leave(NodeId(2)).unwrap());
		assert_eq!(visual(&graph, 2), VisualState::Idle);
		assert!(!graph.hover_leave(NodeId(2)).unwrap());

		graph.select(NodeId(1)).unwrap();
		assert!(!graph.hover_enter(NodeId(1)).unwrap());
		assert!(!graph.hover_leave(NodeId(1)).unwrap());
		assert_eq!(visual(&graph, 1), VisualState::Active);

		assert!(graph.hover_enter(NodeId(8)).is_err());
	}

	#[test]
	fn clicking_a_hovered_node_activates_it() {
		let mut graph = SkillGraph::from_parts(&[info(1, false)], &[]).unwrap();
		graph.hover_enter(NodeId(1)).unwrap();
		graph.select(NodeId(1)).unwrap();
		assert_eq!(visual(&graph, 1), VisualState::Active);
	}

	#[test]
	fn toggle_without_selection_fails() {
		let mut graph = SkillGraph::from_parts(&[info(1, false)], &[]).unwrap();
		assert_eq!(graph.toggle_active(), Err(GraphError::NoActiveNode));
	}

	#[test]
	fn toggle_replaces_variant_and_relinks_neighbours() {
		let mut graph = SkillGraph::from_parts(
			&[info(1, true), info(2, false), info(3, false)],
			&[link(1, 2), link(2, 3)],
		)
		.unwrap();
		let old = graph.node(NodeId(2)).unwrap().handle();

		graph.select(NodeId(2)).unwrap();
		assert!(graph.toggle_active().unwrap());

		let new = graph.node(NodeId(2)).unwrap();
		assert_eq!(new.status(), CompletionStatus::Completed);
		assert_eq!(new.visual(), VisualState::Active);
		assert_eq!(new.id(), old.id);
		assert_ne!(new.handle(), old);
		assert_eq!(graph.active_id(), Some(NodeId(2)));
		assert_eq!(graph.node_count(), 3);

		assert_eq!(graph.node(NodeId(1)).unwrap().children(), &[new.handle()]);
		assert_eq!(graph.node(NodeId(3)).unwrap().parents(), &[new.handle()]);
		let incoming = graph.edge(NodeId(1), NodeId(2)).unwrap();
		let outgoing = graph.edge(NodeId(2), NodeId(3)).unwrap();
		assert_eq!(incoming.target(), new.handle());
		assert_eq!(outgoing.source(), new.handle());
		assert_eq!(incoming.activity(), ActivityLevel::Active);
		assert_eq!(outgoing.activity(), ActivityLevel::SemiActive);
	}

	#[test]
	fn blocked_toggle_leaves_graph_untouched() {
		let mut graph =
			SkillGraph::from_parts(&[info(1, false), info(2, false)], &[link(1, 2)]).unwrap();
		graph.select(NodeId(2)).unwrap();
		let before = graph.clone();

		assert_eq!(graph.toggle_active(), Ok(false));
		assert_eq!(graph, before);
	}

	#[test]
	fn double_toggle_restores_status_with_new_identity() {
		let mut graph =
			SkillGraph::from_parts(&[info(1, false), info(2, false)], &[link(1, 2)]).unwrap();
		let original = graph.node(NodeId(1)).unwrap().handle();
		let activity = graph.edge(NodeId(1), NodeId(2)).unwrap().activity();

		graph.select(NodeId(1)).unwrap();
		assert!(graph.toggle_active().unwrap());
		assert!(graph.toggle_active().unwrap());

		let node = graph.node(NodeId(1)).unwrap();
		assert_eq!(node.status(), CompletionStatus::Uncompleted);
		assert_ne!(node.handle(), original);
		assert_eq!(graph.edge(NodeId(1), NodeId(2)).unwrap().activity(), activity);
		assert_eq!(status(&graph, 2), CompletionStatus::Uncompleted);
	}
}
