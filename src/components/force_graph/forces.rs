//! Force contributions acting on simulation nodes.
//!
//! Each tick the model adds velocity (or, for centering, a positional shift) in
//! a fixed order: link springs, many-body charge, centering, collision. Every
//! contribution is independent and only reads the state left by the previous
//! one.

use super::config::ForceConfig;
use super::graph::ResolvedGraph;
use super::quadtree::{QuadItem, QuadTree};
use super::simulation::SimNode;

/// Deterministic linear congruential generator used to separate coincident
/// nodes, so layouts are reproducible.
#[derive(Clone, Debug)]
pub struct Lcg(u32);

impl Default for Lcg {
	fn default() -> Self {
		Self(1)
	}
}

impl Lcg {
	/// Next value in `[0, 1)`.
	pub fn next_f64(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.0 as f64 / 4_294_967_296.0
	}

	/// A tiny displacement in `(-5e-7, 5e-7)`.
	pub fn jiggle(&mut self) -> f64 {
		(self.next_f64() - 0.5) * 1e-6
	}
}

/// A link spring with its degree-derived stiffness and mass split.
#[derive(Clone, Copy, Debug)]
struct Spring {
	source: usize,
	target: usize,
	strength: f64,
	/// Share of the correction applied to the target.
	bias: f64,
}

/// All forces of the layout, configured for one node/link set.
#[derive(Clone, Debug)]
pub struct ForceModel {
	config: ForceConfig,
	springs: Vec<Spring>,
	charges: Vec<f64>,
	radii: Vec<f64>,
	center: (f64, f64),
}

impl ForceModel {
	pub fn new(graph: &ResolvedGraph, config: &ForceConfig, center: (f64, f64)) -> Self {
		let degrees = graph.degrees();
		let springs = graph
			.links
			.iter()
			.map(|link| {
				let (ds, dt) = (degrees[link.source] as f64, degrees[link.target] as f64);
				Spring {
					source: link.source,
					target: link.target,
					strength: config.link_strength.unwrap_or(1.0 / ds.min(dt)),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		Self {
			springs,
			charges: vec![config.charge_strength; graph.nodes.len()],
			radii: graph
				.nodes
				.iter()
				.map(|node| config.collision_radius(node.weight))
				.collect(),
			config: config.clone(),
			center,
		}
	}

	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	/// Moves the point the centering force pulls the centroid towards.
	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	/// Collision radius of every node, by index.
	pub fn radii(&self) -> &[f64] {
		&self.radii
	}

	pub fn apply(&self, nodes: &mut [SimNode], alpha: f64, rng: &mut Lcg) {
		if nodes.is_empty() {
			return;
		}
		self.apply_links(nodes, alpha, rng);
		self.apply_charge(nodes, alpha, rng);
		self.apply_center(nodes);
		self.apply_collide(nodes, rng);
	}

	fn apply_links(&self, nodes: &mut [SimNode], alpha: f64, rng: &mut Lcg) {
		for spring in &self.springs {
			let (s, t) = (&nodes[spring.source], &nodes[spring.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 {
				dx = rng.jiggle();
			}
			if dy == 0.0 {
				dy = rng.jiggle();
			}
			let length = (dx * dx + dy * dy).sqrt();
			let k = (length - self.config.link_distance) / length * alpha * spring.strength;
			let (dx, dy) = (dx * k, dy * k);

			let target = &mut nodes[spring.target];
			target.vx -= dx * spring.bias;
			target.vy -= dy * spring.bias;
			let source = &mut nodes[spring.source];
			source.vx += dx * (1.0 - spring.bias);
			source.vy += dy * (1.0 - spring.bias);
		}
	}

	/// Barnes–Hut many-body repulsion.
	fn apply_charge(&self, nodes: &mut [SimNode], alpha: f64, rng: &mut Lcg) {
		if self.config.charge_strength == 0.0 || nodes.len() < 2 {
			return;
		}
		let tree = QuadTree::build(
			nodes
				.iter()
				.zip(&self.charges)
				.map(|(node, &weight)| QuadItem {
					x: node.x,
					y: node.y,
					weight,
					radius: 0.0,
				})
				.collect(),
		);
		let theta2 = self.config.theta * self.config.theta;
		let min2 = self.config.distance_min * self.config.distance_min;
		let max2 = self
			.config
			.distance_max
			.map_or(f64::INFINITY, |max| max * max);

		for i in 0..nodes.len() {
			let (xi, yi) = (nodes[i].x, nodes[i].y);
			let (mut dvx, mut dvy) = (0.0, 0.0);

			tree.visit(|cell| {
				if cell.weight == 0.0 {
					return true;
				}
				let (mut dx, mut dy) = (cell.cx - xi, cell.cy - yi);
				let mut l = dx * dx + dy * dy;
				let width = cell.width();

				// Far enough away: treat the whole cell as one body.
				if width * width / theta2 < l {
					if l < max2 {
						if dx == 0.0 {
							dx = rng.jiggle();
							l += dx * dx;
						}
						if dy == 0.0 {
							dy = rng.jiggle();
							l += dy * dy;
						}
						if l < min2 {
							l = (min2 * l).sqrt();
						}
						dvx += dx * cell.weight * alpha / l;
						dvy += dy * cell.weight * alpha / l;
					}
					return true;
				}
				if !cell.is_leaf() {
					return false;
				}

				for &j in cell.points() {
					if j == i {
						continue;
					}
					let other = tree.item(j);
					let (mut dx, mut dy) = (other.x - xi, other.y - yi);
					if dx == 0.0 {
						dx = rng.jiggle();
					}
					if dy == 0.0 {
						dy = rng.jiggle();
					}
					let mut l = dx * dx + dy * dy;
					if l >= max2 {
						continue;
					}
					if l < min2 {
						l = (min2 * l).sqrt();
					}
					let w = other.weight * alpha / l;
					dvx += dx * w;
					dvy += dy * w;
				}
				true
			});

			nodes[i].vx += dvx;
			nodes[i].vy += dvy;
		}
	}

	/// Translates every node so the centroid moves towards the center.
	fn apply_center(&self, nodes: &mut [SimNode]) {
		let n = nodes.len() as f64;
		let (sx, sy) = nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let shift_x = (sx / n - self.center.0) * self.config.center_strength;
		let shift_y = (sy / n - self.center.1) * self.config.center_strength;
		for node in nodes.iter_mut() {
			node.x -= shift_x;
			node.y -= shift_y;
		}
	}

	/// Pushes overlapping circles apart, using positions predicted from the
	/// current velocities.
	fn apply_collide(&self, nodes: &mut [SimNode], rng: &mut Lcg) {
		if self.config.collide_strength == 0.0 || nodes.len() < 2 {
			return;
		}
		let strength = self.config.collide_strength;

		for _ in 0..self.config.collide_iterations {
			let tree = QuadTree::build(
				nodes
					.iter()
					.zip(&self.radii)
					.map(|(node, &radius)| QuadItem {
						x: node.x + node.vx,
						y: node.y + node.vy,
						weight: 0.0,
						radius,
					})
					.collect(),
			);

			for i in 0..nodes.len() {
				let ri = self.radii[i];
				let ri2 = ri * ri;
				let xi = nodes[i].x + nodes[i].vx;
				let yi = nodes[i].y + nodes[i].vy;

				tree.visit(|cell| {
					if !cell.is_leaf() {
						let reach = cell.radius + ri;
						return cell.x0 > xi + reach
							|| cell.x1 < xi - reach
							|| cell.y0 > yi + reach
							|| cell.y1 < yi - reach;
					}
					for &j in cell.points() {
						// Each pair is resolved once, from its lower index.
						if j <= i {
							continue;
						}
						let rj = self.radii[j];
						let r = ri + rj;
						let mut dx = xi - nodes[j].x - nodes[j].vx;
						let mut dy = yi - nodes[j].y - nodes[j].vy;
						let mut l = dx * dx + dy * dy;
						if l >= r * r {
							continue;
						}
						if dx == 0.0 {
							dx = rng.jiggle();
							l += dx * dx;
						}
						if dy == 0.0 {
							dy = rng.jiggle();
							l += dy * dy;
						}
						let l = l.sqrt();
						let k = (r - l) / l * strength;
						let (dx, dy) = (dx * k, dy * k);
						let share = rj * rj / (ri2 + rj * rj);

						nodes[i].vx += dx * share;
						nodes[i].vy += dy * share;
						nodes[j].vx -= dx * (1.0 - share);
						nodes[j].vy -= dy * (1.0 - share);
					}
					true
				});
			}
		}
	}
}
