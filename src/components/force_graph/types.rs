//! Graph data structures for input to the force graph component.

use serde::Deserialize;

/// What a node stands for. Tags render larger and bolder than thoughts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
	/// A single note or post.
	#[default]
	Thought,
	/// A tag shared by several thoughts.
	Tag,
}

/// A node in the graph.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links and
	/// shown as the node's label.
	pub id: String,
	/// Node category, serialized as `group`.
	#[serde(rename = "group", default)]
	pub category: NodeCategory,
	/// Size weight. Drives the collision radius (`val * 10 + 20`).
	#[serde(rename = "val", default = "default_weight")]
	pub weight: f64,
	/// Same-document navigation target followed when the node is clicked.
	#[serde(default)]
	pub url: Option<String>,
}

fn default_weight() -> f64 {
	1.0
}

impl GraphNode {
	/// A thought node with weight 1 and no navigation target.
	pub fn thought(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			category: NodeCategory::Thought,
			weight: default_weight(),
			url: None,
		}
	}

	/// A tag node with weight 1 and no navigation target.
	pub fn tag(id: impl Into<String>) -> Self {
		Self {
			category: NodeCategory::Tag,
			..Self::thought(id)
		}
	}

	/// Returns the node with the given size weight.
	pub fn with_weight(mut self, weight: f64) -> Self {
		self.weight = weight;
		self
	}

	/// Returns the node with the given navigation target.
	pub fn with_url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());
		self
	}
}

/// A directed edge between two nodes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
}

impl GraphLink {
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_content_pipeline_json() {
		let json = r#"{
			"nodes": [
				{ "id": "On Rust", "group": "thought", "val": 1, "url": "/thoughts/on-rust" },
				{ "id": "rust", "group": "tag", "val": 3 }
			],
			"links": [{ "source": "On Rust", "target": "rust" }]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();

		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].category, NodeCategory::Thought);
		assert_eq!(data.nodes[0].url.as_deref(), Some("/thoughts/on-rust"));
		assert_eq!(data.nodes[1].category, NodeCategory::Tag);
		assert_eq!(data.nodes[1].weight, 3.0);
		assert_eq!(data.links[0], GraphLink::new("On Rust", "rust"));
	}

	#[test]
	fn missing_fields_take_defaults() {
		let data: GraphData = serde_json::from_str(r#"{ "nodes": [{ "id": "lonely" }] }"#).unwrap();

		assert_eq!(data.nodes[0], GraphNode::thought("lonely"));
		assert!(data.links.is_empty());
	}
}
