//! Resolution of raw graph data into index-based nodes and links.
//!
//! Links arrive referencing node ids. They are resolved to node indices exactly
//! once, when a simulation is built. Anything that cannot be resolved is dropped
//! and kept as a [`GraphError`] so the host can surface the inconsistency.

use std::collections::HashMap;

use log::warn;
use thiserror::Error;

use super::types::{GraphData, GraphNode};

/// An inconsistency found while resolving graph data.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
	#[error("duplicate node id `{id}` (node {index} ignored)")]
	DuplicateNode { id: String, index: usize },
	#[error("link {index} references unknown node `{id}`")]
	UnknownEndpoint { index: usize, id: String },
}

/// A link whose endpoints are indices into [`ResolvedGraph::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedLink {
	pub source: usize,
	pub target: usize,
}

/// Graph data with unique nodes and only usable links.
#[derive(Clone, Debug, Default)]
pub struct ResolvedGraph {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<ResolvedLink>,
	pub issues: Vec<GraphError>,
}

impl ResolvedGraph {
	/// Resolves `data`. Never fails: duplicate nodes (first occurrence wins) and
	/// links with unknown endpoints are dropped and recorded in `issues`.
	pub fn resolve(data: &GraphData) -> Self {
		let mut nodes = Vec::with_capacity(data.nodes.len());
		let mut index_of: HashMap<&str, usize> = HashMap::with_capacity(data.nodes.len());
		let mut issues = Vec::new();

		for (index, node) in data.nodes.iter().enumerate() {
			if index_of.contains_key(node.id.as_str()) {
				issues.push(GraphError::DuplicateNode {
					id: node.id.clone(),
					index,
				});
				continue;
			}
			index_of.insert(&node.id, nodes.len());
			nodes.push(node.clone());
		}

		let mut links = Vec::with_capacity(data.links.len());
		for (index, link) in data.links.iter().enumerate() {
			match (
				index_of.get(link.source.as_str()),
				index_of.get(link.target.as_str()),
			) {
				(Some(&source), Some(&target)) => links.push(ResolvedLink { source, target }),
				(None, _) => issues.push(GraphError::UnknownEndpoint {
					index,
					id: link.source.clone(),
				}),
				(_, None) => issues.push(GraphError::UnknownEndpoint {
					index,
					id: link.target.clone(),
				}),
			}
		}

		for issue in &issues {
			warn!("mindmap: {}", issue);
		}

		Self {
			nodes,
			links,
			issues,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Number of usable links touching each node.
	pub fn degrees(&self) -> Vec<usize> {
		let mut degrees = vec![0; self.nodes.len()];
		for link in &self.links {
			degrees[link.source] += 1;
			degrees[link.target] += 1;
		}
		degrees
	}
}
