//! Graph state combining the simulation with interaction tracking.
//!
//! Created when data arrives, then driven by the host: fired frames, pointer
//! events and resizes are routed here. Nothing in this module touches the DOM,
//! so the whole lifecycle can be exercised headlessly with a
//! [`ManualDriver`](super::scheduler::ManualDriver).

use log::info;

use super::config::LayoutConfig;
use super::drag::{DragController, PointerId, Release};
use super::graph::{GraphError, ResolvedGraph};
use super::scene::Scene;
use super::scheduler::{FrameDriver, Scheduler};
use super::simulation::Simulation;
use super::types::GraphData;
use super::viewport::{ViewportController, ViewportGeometry};

/// Core graph state for one mounted node/link set.
pub struct ForceGraphState<D: FrameDriver> {
	sim: Simulation,
	scheduler: Scheduler<D>,
	scene: Scene,
	drag: DragController,
	viewport: ViewportController,
	issues: Vec<GraphError>,
	torn_down: bool,
}

impl<D: FrameDriver> ForceGraphState<D> {
	/// Resolves `data`, places nodes and builds the scene. Ticking begins with
	/// [`ForceGraphState::start`].
	pub fn new(
		data: &GraphData,
		geometry: ViewportGeometry,
		config: &LayoutConfig,
		driver: D,
	) -> Self {
		let graph = ResolvedGraph::resolve(data);
		let sim = Simulation::new(
			&graph,
			&config.forces,
			&config.simulation,
			geometry.center(),
		);
		let mut scene = Scene::new(config.interaction.hit_padding);
		scene.build(&graph, sim.nodes());

		info!(
			"mindmap: {} nodes, {} links ({} issues) in {}x{}",
			graph.nodes.len(),
			graph.links.len(),
			graph.issues.len(),
			geometry.width,
			geometry.height
		);

		Self {
			sim,
			scheduler: Scheduler::new(driver),
			scene,
			drag: DragController::new(&config.interaction, &config.simulation),
			viewport: ViewportController::new(geometry, config.interaction.resize_alpha),
			issues: graph.issues,
			torn_down: false,
		}
	}

	pub fn start(&mut self) {
		self.scheduler.start(&self.sim);
	}

	/// Handles a fired frame. Returns whether a tick ran (and the scene moved).
	pub fn frame(&mut self) -> bool {
		let Self {
			sim,
			scheduler,
			scene,
			..
		} = self;
		scheduler.frame(sim, |snapshot| {
			scene.sync(snapshot.nodes);
		})
	}

	/// Presses `pointer` at `(x, y)`. Returns whether a node was grabbed.
	pub fn pointer_down(&mut self, pointer: PointerId, x: f64, y: f64) -> bool {
		if self.torn_down {
			return false;
		}
		let Some(node) = self.scene.hit_test(x, y) else {
			return false;
		};
		if !self.drag.start(pointer, node, (x, y), &mut self.sim) {
			return false;
		}
		self.scene.set_dragged(node, true);
		self.scheduler.start(&self.sim);
		true
	}

	/// Moves `pointer` to `(x, y)`: drags its node, or updates hover when it
	/// holds nothing. Returns whether a repaint is needed now (ticks repaint
	/// drags on their own).
	pub fn pointer_move(&mut self, pointer: PointerId, x: f64, y: f64) -> bool {
		if self.torn_down {
			return false;
		}
		if self.drag.move_to(pointer, (x, y), &mut self.sim) {
			self.scheduler.start(&self.sim);
			return false;
		}
		let hovered = self.scene.hit_test(x, y);
		self.scene.set_hover(hovered)
	}

	/// Releases `pointer`. Returns the navigation target when the gesture was a
	/// click on a node that has one.
	pub fn pointer_up(&mut self, pointer: PointerId) -> Option<String> {
		if self.torn_down {
			return None;
		}
		match self.drag.end(pointer, &mut self.sim)? {
			Release::Click(node) => {
				self.scene.set_dragged(node, false);
				self.scene.activate(node).map(str::to_owned)
			}
			Release::Drop(node) => {
				self.scene.set_dragged(node, false);
				None
			}
		}
	}

	/// Aborts the drag of `pointer` without a click. Returns whether a node was
	/// released.
	pub fn pointer_cancel(&mut self, pointer: PointerId) -> bool {
		if self.torn_down {
			return false;
		}
		match self.drag.cancel(pointer, &mut self.sim) {
			Some(node) => {
				self.scene.set_dragged(node, false);
				true
			}
			None => false,
		}
	}

	/// Clears hover, e.g. when the pointer leaves the surface.
	pub fn clear_hover(&mut self) -> bool {
		self.scene.set_hover(None)
	}

	/// Applies a new surface size. Returns whether anything changed.
	pub fn resize(&mut self, width: f64, height: f64) -> bool {
		if self.torn_down || !self.viewport.resize(width, height, &mut self.sim) {
			return false;
		}
		self.scheduler.start(&self.sim);
		true
	}

	/// Stops ticking for good: releases drags, cancels the pending frame, stops
	/// the simulation and disposes the scene.
	pub fn teardown(&mut self) {
		if self.torn_down {
			return;
		}
		self.drag.clear(&mut self.sim);
		self.scheduler.stop(&mut self.sim);
		self.scene.dispose();
		self.torn_down = true;
		info!("mindmap: graph torn down after {} ticks", self.sim.ticks());
	}

	pub fn is_torn_down(&self) -> bool {
		self.torn_down
	}

	/// Whether the pointer is over a node or holding one.
	pub fn wants_pointer_cursor(&self) -> bool {
		self.scene.hovered().is_some() || !self.drag.is_idle()
	}

	pub fn simulation(&self) -> &Simulation {
		&self.sim
	}

	pub fn scheduler(&self) -> &Scheduler<D> {
		&self.scheduler
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	pub fn geometry(&self) -> ViewportGeometry {
		self.viewport.geometry()
	}

	/// Inconsistencies found in the input data.
	pub fn issues(&self) -> &[GraphError] {
		&self.issues
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::scheduler::ManualDriver;
	use crate::components::force_graph::simulation::EnginePhase;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn state() -> ForceGraphState<ManualDriver> {
		let data = GraphData {
			nodes: vec![
				GraphNode::thought("post").with_url("/thoughts/post"),
				GraphNode::tag("rust"),
			],
			links: vec![GraphLink::new("post", "rust")],
		};
		ForceGraphState::new(
			&data,
			ViewportGeometry::new(800.0, 600.0),
			&LayoutConfig::default(),
			ManualDriver::default(),
		)
	}

	fn position(state: &ForceGraphState<ManualDriver>, node: usize) -> (f64, f64) {
		let visual = &state.scene().nodes()[node];
		(visual.x, visual.y)
	}

	#[test]
	fn start_requests_a_single_frame() {
		let mut state = state();
		state.start();
		state.start();

		assert_eq!(state.scheduler().driver().requests, 1);
		assert!(state.frame());
		assert_eq!(state.scheduler().driver().requests, 2);
	}

	#[test]
	fn frames_sync_the_scene() {
		let mut state = state();
		state.start();
		let before = position(&state, 0);
		state.frame();

		let sim = state.simulation().nodes()[0].position();
		assert_eq!(position(&state, 0), sim);
		assert_ne!(position(&state, 0), before);
		assert_eq!(state.scene().builds(), 1);
	}

	#[test]
	fn pointer_down_on_empty_space_grabs_nothing() {
		let mut state = state();

		assert!(!state.pointer_down(1, -500.0, -500.0));
		assert!(!state.wants_pointer_cursor());
	}

	#[test]
	fn drag_pins_and_click_navigates() {
		let mut state = state();
		let (x, y) = position(&state, 0);

		assert!(state.pointer_down(1, x, y));
		assert!(state.scene().nodes()[0].interaction.dragged);
		assert_eq!(state.pointer_up(1).as_deref(), Some("/thoughts/post"));
		assert!(!state.scene().nodes()[0].interaction.dragged);
		assert_eq!(state.simulation().nodes()[0].pin(), None);
	}

	#[test]
	fn moved_release_is_a_drop() {
		let mut state = state();
		state.start();
		let (x, y) = position(&state, 0);
		state.pointer_down(1, x, y);
		state.pointer_move(1, x + 50.0, y + 50.0);
		state.frame();

		assert_eq!(position(&state, 0), (x + 50.0, y + 50.0));
		assert_eq!(state.pointer_up(1), None);
	}

	#[test]
	fn hovering_reports_repaints_once() {
		let mut state = state();
		let (x, y) = position(&state, 1);

		assert!(state.pointer_move(7, x, y));
		assert!(!state.pointer_move(7, x + 1.0, y));
		assert!(state.wants_pointer_cursor());
		assert!(state.clear_hover());
	}

	#[test]
	fn resize_recenters_and_schedules() {
		let mut state = state();

		assert!(state.resize(1200.0, 800.0));
		assert_eq!(state.simulation().forces().center(), (600.0, 400.0));
		assert!(state.scheduler().is_pending());
		assert!(!state.resize(1200.0, 800.0));
	}

	#[test]
	fn teardown_stops_everything() {
		let mut state = state();
		state.start();
		let (x, y) = position(&state, 0);
		state.pointer_down(1, x, y);
		state.teardown();

		assert!(state.is_torn_down());
		assert_eq!(state.simulation().phase(), EnginePhase::Stopped);
		assert_eq!(state.scheduler().driver().cancellations, 1);
		assert!(!state.frame());
		assert!(!state.pointer_down(2, x, y));
		assert_eq!(state.pointer_up(1), None);
		assert!(!state.resize(1024.0, 768.0));
	}
}
