//! Drawing surface geometry and resize handling.

use log::debug;

use super::simulation::Simulation;

/// Size of the drawing surface. Graph coordinates equal canvas pixels with the
/// origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportGeometry {
	pub width: f64,
	pub height: f64,
}

impl ViewportGeometry {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}

/// Keeps the centering force aligned with the surface size.
#[derive(Clone, Debug)]
pub struct ViewportController {
	geometry: ViewportGeometry,
	reheat_alpha: f64,
}

impl ViewportController {
	pub fn new(geometry: ViewportGeometry, reheat_alpha: f64) -> Self {
		Self {
			geometry,
			reheat_alpha,
		}
	}

	pub fn geometry(&self) -> ViewportGeometry {
		self.geometry
	}

	/// Applies a new surface size: the centering target moves to the new center
	/// and the simulation is reheated so nodes drift there. Returns `false` for
	/// unchanged or unusable sizes.
	pub fn resize(&mut self, width: f64, height: f64, sim: &mut Simulation) -> bool {
		let usable = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
		if !usable || (width == self.geometry.width && height == self.geometry.height) {
			return false;
		}
		debug!(
			"mindmap: viewport {}x{} -> {}x{}",
			self.geometry.width, self.geometry.height, width, height
		);
		self.geometry = ViewportGeometry::new(width, height);
		let (cx, cy) = self.geometry.center();
		sim.set_center(cx, cy);
		sim.reheat(self.reheat_alpha);
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::config::{ForceConfig, SimulationConfig};
	use crate::components::force_graph::graph::ResolvedGraph;
	use crate::components::force_graph::simulation::EnginePhase;
	use crate::components::force_graph::types::{GraphData, GraphNode};

	fn settled_simulation(center: (f64, f64)) -> Simulation {
		let data = GraphData {
			nodes: vec![GraphNode::thought("a"), GraphNode::thought("b")],
			links: Vec::new(),
		};
		let mut sim = Simulation::new(
			&ResolvedGraph::resolve(&data),
			&ForceConfig::default(),
			&SimulationConfig::default(),
			center,
		);
		while sim.is_active() {
			sim.tick();
		}
		sim
	}

	#[test]
	fn resize_moves_center_and_reheats() {
		let mut viewport = ViewportController::new(ViewportGeometry::new(800.0, 600.0), 0.3);
		let mut sim = settled_simulation(viewport.geometry().center());
		assert_eq!(sim.forces().center(), (400.0, 300.0));

		assert!(viewport.resize(1200.0, 800.0, &mut sim));
		assert_eq!(sim.forces().center(), (600.0, 400.0));
		assert_eq!(sim.alpha(), 0.3);
		assert_eq!(sim.phase(), EnginePhase::Reheated);
	}

	#[test]
	fn unchanged_or_degenerate_sizes_are_ignored() {
		let mut viewport = ViewportController::new(ViewportGeometry::new(800.0, 600.0), 0.3);
		let mut sim = settled_simulation((400.0, 300.0));

		assert!(!viewport.resize(800.0, 600.0, &mut sim));
		assert!(!viewport.resize(0.0, 600.0, &mut sim));
		assert!(!viewport.resize(f64::NAN, 600.0, &mut sim));
		assert_eq!(sim.phase(), EnginePhase::Settled);
		assert_eq!(viewport.geometry(), ViewportGeometry::new(800.0, 600.0));
	}
}
