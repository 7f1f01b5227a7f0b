//! Graph data structures for input to the skill tree component.

use serde::Deserialize;

use super::node::NodeId;

/// A node description as delivered by the page.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: NodeId,
	/// Fixed horizontal position in graph coordinates.
	pub x: f64,
	/// Fixed vertical position in graph coordinates.
	pub y: f64,
	/// Display name drawn next to the node.
	pub label: String,
	/// Longer text shown in the details panel.
	#[serde(default)]
	pub description: String,
	/// Whether the skill starts out completed.
	#[serde(default)]
	pub is_completed: bool,
}

/// A prerequisite link: `source_id` unlocks `target_id`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInfo {
	/// Prerequisite node.
	pub source_id: NodeId,
	/// Node the prerequisite unlocks.
	pub target_id: NodeId,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// All nodes, in drawing order.
	pub nodes: Vec<NodeInfo>,
	/// Prerequisite links between nodes.
	pub links: Vec<LinkInfo>,
}

impl GraphData {
	/// A three-skill chain shown when the page provides no data.
	pub fn demo() -> Self {
		let node = |id, x, y, label: &str, description: &str| NodeInfo {
			id: NodeId(id),
			x,
			y,
			label: label.to_string(),
			description: description.to_string(),
			is_completed: false,
		};
		Self {
			nodes: vec![
				node(1, 100.0, 100.0, "Basics", "Learn the fundamentals."),
				node(2, 200.0, 200.0, "Practice", "Apply the basics to small exercises."),
				node(3, 100.0, 200.0, "Project", "Ship something end to end."),
			],
			links: vec![
				LinkInfo {
					source_id: NodeId(1),
					target_id: NodeId(2),
				},
				LinkInfo {
					source_id: NodeId(2),
					target_id: NodeId(3),
				},
			],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_camel_case_payload() {
		let data: GraphData = serde_json::from_str(
			r#"{
				"nodes": [
					{ "id": 1, "x": 100, "y": 100.5, "label": "A", "description": "root", "isCompleted": true },
					{ "id": 2, "x": 200, "y": 200, "label": "B" }
				],
				"links": [ { "sourceId": 1, "targetId": 2 } ]
			}"#,
		)
		.unwrap();

		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].id, NodeId(1));
		assert_eq!(data.nodes[0].y, 100.5);
		assert!(data.nodes[0].is_completed);
		assert!(!data.nodes[1].is_completed);
		assert_eq!(data.nodes[1].description, "");
		assert_eq!(data.links[0].source_id, NodeId(1));
		assert_eq!(data.links[0].target_id, NodeId(2));
	}

	#[test]
	fn rejects_missing_link_endpoint() {
		let result = serde_json::from_str::<GraphData>(r#"{ "nodes": [], "links": [ { "sourceId": 1 } ] }"#);
		assert!(result.is_err());
	}

	#[test]
	fn demo_tree_is_a_chain_of_three() {
		let demo = GraphData::demo();
		let positions: Vec<(f64, f64)> = demo.nodes.iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(positions, vec![(100.0, 100.0), (200.0, 200.0), (100.0, 200.0)]);
		assert_eq!(demo.links.len(), 2);
		assert!(demo.nodes.iter().all(|n| !n.is_completed));
	}
}
