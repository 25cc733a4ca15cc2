//! Pointer drag state machine.
//!
//! Each active pointer holds at most one node. While held, the node is pinned
//! to the pointer and the simulation keeps a raised alpha target so neighbours
//! react live. Releasing unpins the node and, once the last drag ends, lets the
//! energy decay again.

use std::collections::HashMap;

use super::config::{InteractionConfig, SimulationConfig};
use super::simulation::{Pin, Simulation};

/// Identifier of a pointer (mouse, pen, or one touch contact).
pub type PointerId = i32;

/// How a drag gesture ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
	/// The pointer never left the click tolerance: treat as a click on the node.
	Click(usize),
	/// The node was moved and dropped.
	Drop(usize),
}

#[derive(Clone, Copy, Debug)]
struct Grab {
	node: usize,
	origin: (f64, f64),
	moved: bool,
}

#[derive(Clone, Debug)]
pub struct DragController {
	grabs: HashMap<PointerId, Grab>,
	drag_alpha_target: f64,
	rest_alpha_target: f64,
	click_tolerance: f64,
}

impl DragController {
	pub fn new(interaction: &InteractionConfig, simulation: &SimulationConfig) -> Self {
		Self {
			grabs: HashMap::new(),
			drag_alpha_target: interaction.drag_alpha_target,
			rest_alpha_target: simulation.alpha_target,
			click_tolerance: interaction.click_tolerance,
		}
	}

	/// Starts dragging `node` with `pointer` pressed at `at`. The node is pinned
	/// where it currently is. Rejected if the pointer already holds a node or the
	/// node is held by another pointer.
	pub fn start(
		&mut self,
		pointer: PointerId,
		node: usize,
		at: (f64, f64),
		sim: &mut Simulation,
	) -> bool {
		if self.grabs.contains_key(&pointer) || self.is_dragging(node) {
			return false;
		}
		let Some((x, y)) = sim.node(node).map(|n| n.position()) else {
			return false;
		};
		if !sim.pin(node, Pin { x, y }) {
			return false;
		}
		if self.grabs.is_empty() {
			sim.set_alpha_target(self.drag_alpha_target);
		}
		self.grabs.insert(
			pointer,
			Grab {
				node,
				origin: at,
				moved: false,
			},
		);
		true
	}

	/// Pins the node held by `pointer` at the pointer position. Returns `false`
	/// when the pointer holds nothing.
	pub fn move_to(
		&mut self,
		pointer: PointerId,
		(x, y): (f64, f64),
		sim: &mut Simulation,
	) -> bool {
		let Some(grab) = self.grabs.get_mut(&pointer) else {
			return false;
		};
		let (dx, dy) = (x - grab.origin.0, y - grab.origin.1);
		if dx * dx + dy * dy > self.click_tolerance * self.click_tolerance {
			grab.moved = true;
		}
		sim.pin(grab.node, Pin { x, y })
	}

	/// Ends the drag of `pointer`, unpinning its node.
	pub fn end(&mut self, pointer: PointerId, sim: &mut Simulation) -> Option<Release> {
		let grab = self.release(pointer, sim)?;
		Some(if grab.moved {
			Release::Drop(grab.node)
		} else {
			Release::Click(grab.node)
		})
	}

	/// Ends the drag of `pointer` without producing a click.
	pub fn cancel(&mut self, pointer: PointerId, sim: &mut Simulation) -> Option<usize> {
		self.release(pointer, sim).map(|grab| grab.node)
	}

	/// Releases every active drag.
	pub fn clear(&mut self, sim: &mut Simulation) {
		let pointers: Vec<PointerId> = self.grabs.keys().copied().collect();
		for pointer in pointers {
			self.release(pointer, sim);
		}
	}

	fn release(&mut self, pointer: PointerId, sim: &mut Simulation) -> Option<Grab> {
		let grab = self.grabs.remove(&pointer)?;
		sim.unpin(grab.node);
		if self.grabs.is_empty() {
			sim.set_alpha_target(self.rest_alpha_target);
		}
		Some(grab)
	}

	/// The node held by `pointer`, if any.
	pub fn held_by(&self, pointer: PointerId) -> Option<usize> {
		self.grabs.get(&pointer).map(|grab| grab.node)
	}

	pub fn is_dragging(&self, node: usize) -> bool {
		self.grabs.values().any(|grab| grab.node == node)
	}

	pub fn is_idle(&self) -> bool {
		self.grabs.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::config::ForceConfig;
	use crate::components::force_graph::graph::ResolvedGraph;
	use crate::components::force_graph::simulation::EnginePhase;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode};

	fn setup() -> (DragController, Simulation) {
		let data = GraphData {
			nodes: vec![
				GraphNode::thought("a"),
				GraphNode::tag("b"),
				GraphNode::thought("c"),
			],
			links: vec![GraphLink::new("a", "b"), GraphLink::new("c", "b")],
		};
		let sim = Simulation::new(
			&ResolvedGraph::resolve(&data),
			&ForceConfig::default(),
			&SimulationConfig::default(),
			(400.0, 300.0),
		);
		let drag = DragController::new(&InteractionConfig::default(), &SimulationConfig::default());
		(drag, sim)
	}

	#[test]
	fn start_pins_node_where_it_is_and_raises_target() {
		let (mut drag, mut sim) = setup();
		let here = sim.nodes()[1].position();

		assert!(drag.start(1, 1, here, &mut sim));
		assert_eq!(sim.nodes()[1].pin(), Some(Pin { x: here.0, y: here.1 }));
		assert_eq!(sim.alpha_target(), 0.3);
		assert_eq!(sim.phase(), EnginePhase::Reheated);
	}

	#[test]
	fn move_pins_to_pointer_and_next_tick_lands_there() {
		let (mut drag, mut sim) = setup();
		let here = sim.nodes()[0].position();
		drag.start(7, 0, here, &mut sim);

		assert!(drag.move_to(7, (123.0, 456.0), &mut sim));
		sim.tick();
		assert_eq!(sim.nodes()[0].position(), (123.0, 456.0));
	}

	#[test]
	fn release_without_movement_is_a_click() {
		let (mut drag, mut sim) = setup();
		let (x, y) = sim.nodes()[2].position();
		drag.start(1, 2, (x, y), &mut sim);
		drag.move_to(1, (x + 1.0, y + 1.0), &mut sim);

		assert_eq!(drag.end(1, &mut sim), Some(Release::Click(2)));
		assert!(sim.nodes()[2].pin().is_none());
		assert_eq!(sim.alpha_target(), 0.0);
	}

	#[test]
	fn release_after_movement_is_a_drop() {
		let (mut drag, mut sim) = setup();
		let (x, y) = sim.nodes()[2].position();
		drag.start(1, 2, (x, y), &mut sim);
		drag.move_to(1, (x + 40.0, y), &mut sim);

		assert_eq!(drag.end(1, &mut sim), Some(Release::Drop(2)));
		assert!(drag.is_idle());
	}

	#[test]
	fn pointers_drag_independently() {
		let (mut drag, mut sim) = setup();
		drag.start(1, 0, (0.0, 0.0), &mut sim);
		drag.start(2, 2, (0.0, 0.0), &mut sim);

		// A node can only be held once, and a pointer can hold one node.
		assert!(!drag.start(3, 0, (0.0, 0.0), &mut sim));
		assert!(!drag.start(1, 1, (0.0, 0.0), &mut sim));

		drag.move_to(1, (10.0, 10.0), &mut sim);
		drag.move_to(2, (90.0, 90.0), &mut sim);
		assert_eq!(drag.end(1, &mut sim), Some(Release::Drop(0)));

		// The remaining drag keeps the simulation hot.
		assert_eq!(sim.alpha_target(), 0.3);
		assert_eq!(drag.held_by(2), Some(2));
		assert_eq!(sim.nodes()[2].pin(), Some(Pin { x: 90.0, y: 90.0 }));

		assert_eq!(drag.cancel(2, &mut sim), Some(2));
		assert_eq!(sim.alpha_target(), 0.0);
	}

	#[test]
	fn unknown_pointer_and_node_are_ignored() {
		let (mut drag, mut sim) = setup();

		assert!(!drag.start(1, 99, (0.0, 0.0), &mut sim));
		assert!(!drag.move_to(5, (1.0, 1.0), &mut sim));
		assert_eq!(drag.end(5, &mut sim), None);
		assert!(drag.is_idle());
	}

	#[test]
	fn stopped_simulation_rejects_drags() {
		let (mut drag, mut sim) = setup();
		sim.stop();

		assert!(!drag.start(1, 0, (0.0, 0.0), &mut sim));
	}
}
