//! Layout tuning parameters.
//!
//! Every value has a default matching the mindmap's look and feel, so a host
//! only needs to supply the fields it wants to change. Configuration can be
//! deserialized from JSON; missing fields fall back to defaults.

use log::warn;
use serde::Deserialize;
use thiserror::Error;

/// Largest collision radius a node can get, whatever its weight.
pub const MAX_COLLISION_RADIUS: f64 = 10_000.0;

/// A tuning value outside its meaningful range.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
	#[error("{field} must be {expected}, got {value}")]
	OutOfRange {
		field: &'static str,
		expected: &'static str,
		value: f64,
	},
}

/// Parameters of the individual force contributions.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
	/// Rest length of every link.
	pub link_distance: f64,
	/// Fixed link stiffness. `None` uses `1 / min(degree(source), degree(target))`.
	pub link_strength: Option<f64>,
	/// Per-node charge. Negative values repel.
	pub charge_strength: f64,
	/// Barnes–Hut accuracy. Cells with `width / distance < theta` are
	/// approximated as a single body.
	pub theta: f64,
	/// Squared distances below `distance_min²` are softened.
	pub distance_min: f64,
	/// Charge interactions beyond this distance are ignored.
	pub distance_max: Option<f64>,
	/// Fraction of the centroid offset corrected per tick.
	pub center_strength: f64,
	pub collide_strength: f64,
	pub collide_iterations: usize,
	/// Collision radius per unit of node weight.
	pub radius_per_weight: f64,
	/// Collision radius of a node with zero weight. Also the minimum radius.
	pub radius_base: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self {
			link_distance: 150.0,
			link_strength: None,
			charge_strength: -400.0,
			theta: 0.9,
			distance_min: 1.0,
			distance_max: None,
			center_strength: 1.0,
			collide_strength: 1.0,
			collide_iterations: 1,
			radius_per_weight: 10.0,
			radius_base: 20.0,
		}
	}
}

impl ForceConfig {
	/// Collision radius for a node of the given weight. Non-positive and
	/// non-finite weights get the base radius; huge ones are capped at
	/// [`MAX_COLLISION_RADIUS`].
	pub fn collision_radius(&self, weight: f64) -> f64 {
		let weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
		(weight * self.radius_per_weight + self.radius_base).min(MAX_COLLISION_RADIUS)
	}
}

/// Parameters of the simulation clock.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Energy at construction.
	pub alpha: f64,
	/// Below this energy the simulation is settled and stops scheduling ticks.
	pub alpha_min: f64,
	/// Fraction of the distance to `alpha_target` covered per tick.
	pub alpha_decay: f64,
	pub alpha_target: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Radius scale of the initial phyllotaxis placement.
	pub initial_radius: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			alpha: 1.0,
			alpha_min,
			// Settles in ~300 ticks from alpha = 1.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			alpha_target: 0.0,
			velocity_decay: 0.4,
			initial_radius: 10.0,
		}
	}
}

/// Parameters of pointer and resize handling.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
	/// Energy target held while at least one node is dragged.
	pub drag_alpha_target: f64,
	/// Energy the simulation is reheated to after a resize.
	pub resize_alpha: f64,
	/// Pointer travel (px) under which a press-release counts as a click.
	pub click_tolerance: f64,
	/// Extra hit area (px) around node markers.
	pub hit_padding: f64,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			drag_alpha_target: 0.3,
			resize_alpha: 0.3,
			click_tolerance: 3.0,
			hit_padding: 4.0,
		}
	}
}

/// Complete layout configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	pub forces: ForceConfig,
	pub simulation: SimulationConfig,
	pub interaction: InteractionConfig,
}

impl LayoutConfig {
	/// Checks that every value is in a range the simulation can work with.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let f = &self.forces;
		let s = &self.simulation;
		let i = &self.interaction;

		check("forces.link_distance", "finite and >= 0", f.link_distance, |v| {
			v.is_finite() && v >= 0.0
		})?;
		if let Some(strength) = f.link_strength {
			check("forces.link_strength", "finite and >= 0", strength, |v| {
				v.is_finite() && v >= 0.0
			})?;
		}
		check("forces.charge_strength", "finite", f.charge_strength, f64::is_finite)?;
		check("forces.theta", "finite and > 0", f.theta, |v| {
			v.is_finite() && v > 0.0
		})?;
		check("forces.distance_min", "finite and > 0", f.distance_min, |v| {
			v.is_finite() && v > 0.0
		})?;
		if let Some(max) = f.distance_max {
			check("forces.distance_max", "> distance_min", max, |v| {
				v > f.distance_min
			})?;
		}
		check("forces.center_strength", "in [0, 1]", f.center_strength, unit)?;
		check("forces.collide_strength", "in [0, 1]", f.collide_strength, unit)?;
		check("forces.radius_per_weight", "finite and >= 0", f.radius_per_weight, |v| {
			v.is_finite() && v >= 0.0
		})?;
		check("forces.radius_base", "finite and > 0", f.radius_base, |v| {
			v.is_finite() && v > 0.0
		})?;
		check("simulation.alpha", "in [0, 1]", s.alpha, unit)?;
		check("simulation.alpha_min", "in [0, 1]", s.alpha_min, unit)?;
		check("simulation.alpha_decay", "in (0, 1]", s.alpha_decay, |v| {
			v > 0.0 && v <= 1.0
		})?;
		check("simulation.alpha_target", "in [0, 1]", s.alpha_target, unit)?;
		check("simulation.velocity_decay", "in [0, 1]", s.velocity_decay, unit)?;
		check("simulation.initial_radius", "finite and >= 0", s.initial_radius, |v| {
			v.is_finite() && v >= 0.0
		})?;
		check("interaction.drag_alpha_target", "in [0, 1]", i.drag_alpha_target, unit)?;
		check("interaction.resize_alpha", "in [0, 1]", i.resize_alpha, unit)?;
		check("interaction.click_tolerance", "finite and >= 0", i.click_tolerance, |v| {
			v.is_finite() && v >= 0.0
		})?;
		check("interaction.hit_padding", "finite and >= 0", i.hit_padding, |v| {
			v.is_finite() && v >= 0.0
		})?;
		Ok(())
	}

	/// Returns `self` when valid, otherwise logs the problem and returns the
	/// defaults.
	pub fn validated(self) -> Self {
		match self.validate() {
			Ok(()) => self,
			Err(e) => {
				warn!("mindmap: ignoring graph config: {}", e);
				Self::default()
			}
		}
	}
}

fn unit(v: f64) -> bool {
	(0.0..=1.0).contains(&v)
}

fn check(
	field: &'static str,
	expected: &'static str,
	value: f64,
	ok: impl Fn(f64) -> bool,
) -> Result<(), ConfigError> {
	if ok(value) {
		Ok(())
	} else {
		Err(ConfigError::OutOfRange {
			field,
			expected,
			value,
		})
	}
}
