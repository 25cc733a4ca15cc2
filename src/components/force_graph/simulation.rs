//! The simulation engine: node state, energy (alpha) and the tick step.
//!
//! The engine never schedules itself. A [`Scheduler`](super::scheduler::Scheduler)
//! decides when [`Simulation::tick`] runs, which keeps the engine deterministic
//! and testable without real time.

use std::f64::consts::PI;

use log::debug;

use super::config::{ForceConfig, SimulationConfig};
use super::forces::{ForceModel, Lcg};
use super::graph::ResolvedGraph;

/// Lifecycle of the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnginePhase {
	/// No nodes; nothing to simulate.
	Cold,
	/// Ticking with alpha decaying from its initial value.
	Running,
	/// Alpha fell below `alpha_min`; positions are effectively stable.
	Settled,
	/// Energy was raised by an interaction or resize.
	Reheated,
	/// Torn down. Ticks and pins are ignored from now on.
	Stopped,
}

/// A position a node is held at, overriding physics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pin {
	pub x: f64,
	pub y: f64,
}

/// Mutable physics state of one node.
///
/// Positions and velocities are written only by the engine; the pin only via
/// [`Simulation::pin`] and [`Simulation::unpin`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	pub(crate) x: f64,
	pub(crate) y: f64,
	pub(crate) vx: f64,
	pub(crate) vy: f64,
	pin: Option<Pin>,
}

impl SimNode {
	pub(crate) fn at(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			pin: None,
		}
	}

	pub fn x(&self) -> f64 {
		self.x
	}

	pub fn y(&self) -> f64 {
		self.y
	}

	pub fn position(&self) -> (f64, f64) {
		(self.x, self.y)
	}

	pub fn velocity(&self) -> (f64, f64) {
		(self.vx, self.vy)
	}

	pub fn pin(&self) -> Option<Pin> {
		self.pin
	}
}

/// State after one tick, handed to tick callbacks.
#[derive(Clone, Copy, Debug)]
pub struct TickSnapshot<'a> {
	/// 1-based tick number, strictly increasing.
	pub tick: u64,
	pub alpha: f64,
	pub nodes: &'a [SimNode],
}

/// Force-directed layout of one node/link set.
pub struct Simulation {
	nodes: Vec<SimNode>,
	forces: ForceModel,
	config: SimulationConfig,
	alpha: f64,
	alpha_target: f64,
	phase: EnginePhase,
	ticks: u64,
	rng: Lcg,
}

impl Simulation {
	/// Places nodes on a phyllotaxis spiral around `center`.
	pub fn new(
		graph: &ResolvedGraph,
		forces: &ForceConfig,
		config: &SimulationConfig,
		center: (f64, f64),
	) -> Self {
		let golden_angle = PI * (3.0 - 5f64.sqrt());
		let nodes = (0..graph.nodes.len())
			.map(|i| {
				let radius = config.initial_radius * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden_angle;
				SimNode::at(
					center.0 + radius * angle.cos(),
					center.1 + radius * angle.sin(),
				)
			})
			.collect::<Vec<_>>();

		let phase = if nodes.is_empty() {
			EnginePhase::Cold
		} else {
			EnginePhase::Running
		};

		Self {
			nodes,
			forces: ForceModel::new(graph, forces, center),
			config: config.clone(),
			alpha: config.alpha,
			alpha_target: config.alpha_target,
			phase,
			ticks: 0,
			rng: Lcg::default(),
		}
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn node(&self, index: usize) -> Option<&SimNode> {
		self.nodes.get(index)
	}

	pub fn phase(&self) -> EnginePhase {
		self.phase
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	pub fn forces(&self) -> &ForceModel {
		&self.forces
	}

	/// Whether the engine can still tick (it has nodes and was not stopped).
	pub fn is_live(&self) -> bool {
		!matches!(self.phase, EnginePhase::Cold | EnginePhase::Stopped)
	}

	/// Whether the engine wants another tick scheduled.
	pub fn is_active(&self) -> bool {
		matches!(self.phase, EnginePhase::Running | EnginePhase::Reheated)
	}

	/// Advances the layout by one step. Returns `None` (and changes nothing) when
	/// the engine is cold or stopped.
	pub fn tick(&mut self) -> Option<TickSnapshot<'_>> {
		if !self.is_live() {
			return None;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		self.forces.apply(&mut self.nodes, self.alpha, &mut self.rng);

		let keep = 1.0 - self.config.velocity_decay;
		for node in &mut self.nodes {
			match node.pin {
				Some(pin) => {
					node.x = pin.x;
					node.y = pin.y;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				None => {
					node.vx *= keep;
					node.vy *= keep;
					node.x += node.vx;
					node.y += node.vy;
				}
			}
		}

		self.ticks += 1;
		if self.alpha < self.config.alpha_min && self.phase != EnginePhase::Settled {
			debug!("mindmap: simulation settled after {} ticks", self.ticks);
			self.phase = EnginePhase::Settled;
		}

		Some(TickSnapshot {
			tick: self.ticks,
			alpha: self.alpha,
			nodes: &self.nodes,
		})
	}

	/// Sets alpha directly, e.g. after a resize.
	pub fn reheat(&mut self, alpha: f64) {
		if !self.is_live() {
			return;
		}
		self.alpha = alpha.clamp(0.0, 1.0);
		self.update_heat();
	}

	/// Sets the value alpha decays towards. A target above `alpha_min` keeps the
	/// simulation running indefinitely.
	pub fn set_alpha_target(&mut self, target: f64) {
		if !self.is_live() {
			return;
		}
		self.alpha_target = target.clamp(0.0, 1.0);
		self.update_heat();
	}

	fn update_heat(&mut self) {
		if self.alpha >= self.config.alpha_min || self.alpha_target >= self.config.alpha_min {
			if self.phase != EnginePhase::Reheated {
				debug!(
					"mindmap: simulation reheated (alpha {:.3}, target {:.3})",
					self.alpha, self.alpha_target
				);
			}
			self.phase = EnginePhase::Reheated;
		}
	}

	/// Holds node `index` at `pin`. Returns `false` for unknown nodes or a
	/// stopped engine.
	pub fn pin(&mut self, index: usize, pin: Pin) -> bool {
		if self.phase == EnginePhase::Stopped {
			return false;
		}
		match self.nodes.get_mut(index) {
			Some(node) => {
				node.pin = Some(pin);
				true
			}
			None => false,
		}
	}

	/// Returns node `index` to physics control.
	pub fn unpin(&mut self, index: usize) -> bool {
		if self.phase == EnginePhase::Stopped {
			return false;
		}
		match self.nodes.get_mut(index) {
			Some(node) => node.pin.take().is_some(),
			None => false,
		}
	}

	/// Moves the centering target.
	pub fn set_center(&mut self, x: f64, y: f64) {
		self.forces.set_center(x, y);
	}

	/// Stops the engine for good.
	pub fn stop(&mut self) {
		if self.phase != EnginePhase::Stopped {
			debug!("mindmap: simulation stopped after {} ticks", self.ticks);
			self.phase = EnginePhase::Stopped;
		}
	}
}
