//! Retained scene: one visual per node and per usable link.
//!
//! The scene is built once per node/link set. Ticks only copy positions into
//! the existing visuals. Hover and drag flags live here too, apart from the
//! simulation, since they never influence layout.

use super::graph::ResolvedGraph;
use super::simulation::SimNode;
use super::style::{NodeInteraction, marker_half_size};
use super::types::NodeCategory;

/// Visual group drawn for a node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	pub label: String,
	pub category: NodeCategory,
	pub url: Option<String>,
	pub x: f64,
	pub y: f64,
	pub interaction: NodeInteraction,
}

/// Connector drawn for a link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkVisual {
	pub source: usize,
	pub target: usize,
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
	nodes: Vec<NodeVisual>,
	links: Vec<LinkVisual>,
	hovered: Option<usize>,
	hit_padding: f64,
	builds: u64,
	disposed: bool,
}

impl Scene {
	pub fn new(hit_padding: f64) -> Self {
		Self {
			hit_padding,
			..Self::default()
		}
	}

	/// Discards all visuals and creates fresh ones for `graph`, placed at the
	/// positions in `positions` (indexed like `graph.nodes`).
	pub fn build(&mut self, graph: &ResolvedGraph, positions: &[SimNode]) {
		if self.disposed {
			return;
		}
		self.nodes = graph
			.nodes
			.iter()
			.zip(positions)
			.map(|(node, sim)| NodeVisual {
				label: node.id.clone(),
				category: node.category,
				url: node.url.clone(),
				x: sim.x(),
				y: sim.y(),
				interaction: NodeInteraction::default(),
			})
			.collect();
		self.links = graph
			.links
			.iter()
			.filter(|link| link.source < self.nodes.len() && link.target < self.nodes.len())
			.map(|link| {
				let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
				LinkVisual {
					source: link.source,
					target: link.target,
					x1: s.x,
					y1: s.y,
					x2: t.x,
					y2: t.y,
				}
			})
			.collect();
		self.hovered = None;
		self.builds += 1;
	}

	/// Copies tick positions into the existing visuals. Returns `false` when the
	/// scene is disposed or `positions` does not match the built node set.
	pub fn sync(&mut self, positions: &[SimNode]) -> bool {
		if self.disposed || positions.len() != self.nodes.len() {
			return false;
		}
		for (visual, sim) in self.nodes.iter_mut().zip(positions) {
			visual.x = sim.x();
			visual.y = sim.y();
		}
		for link in &mut self.links {
			let (s, t) = (&positions[link.source], &positions[link.target]);
			link.x1 = s.x();
			link.y1 = s.y();
			link.x2 = t.x();
			link.y2 = t.y();
		}
		true
	}

	/// Topmost node whose marker (plus hit padding) contains `(x, y)`.
	pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
		if self.disposed {
			return None;
		}
		self.nodes.iter().rposition(|node| {
			let reach = marker_half_size(node.category) + self.hit_padding;
			(x - node.x).abs() <= reach && (y - node.y).abs() <= reach
		})
	}

	/// Sets the hovered node. Returns whether anything changed.
	pub fn set_hover(&mut self, node: Option<usize>) -> bool {
		let node = node.filter(|&index| index < self.nodes.len());
		if self.disposed || self.hovered == node {
			return false;
		}
		if let Some(previous) = self.hovered {
			self.nodes[previous].interaction.hovered = false;
		}
		if let Some(current) = node {
			self.nodes[current].interaction.hovered = true;
		}
		self.hovered = node;
		true
	}

	/// Marks `node` as held (or released) by a drag.
	pub fn set_dragged(&mut self, node: usize, dragged: bool) -> bool {
		if self.disposed {
			return false;
		}
		match self.nodes.get_mut(node) {
			Some(visual) if visual.interaction.dragged != dragged => {
				visual.interaction.dragged = dragged;
				true
			}
			_ => false,
		}
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	/// Navigation target of a clicked node. `None` means the click does nothing.
	pub fn activate(&self, node: usize) -> Option<&str> {
		if self.disposed {
			return None;
		}
		self.nodes.get(node)?.url.as_deref()
	}

	pub fn nodes(&self) -> &[NodeVisual] {
		&self.nodes
	}

	pub fn links(&self) -> &[LinkVisual] {
		&self.links
	}

	/// How many times visuals were (re)created.
	pub fn builds(&self) -> u64 {
		self.builds
	}

	/// Detaches the scene. Every later call is a no-op.
	pub fn dispose(&mut self) {
		self.disposed = true;
		self.hovered = None;
	}

	pub fn is_disposed(&self) -> bool {
		self.disposed
	}
}
