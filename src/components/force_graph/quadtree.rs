//! Point quadtree with Barnes–Hut aggregates.
//!
//! The tree is rebuilt from scratch for every force evaluation. Cells live in a
//! flat arena; a child always has a larger index than its parent, which lets
//! aggregates be computed in a single reverse sweep.

/// A point inserted into the tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadItem {
	pub x: f64,
	pub y: f64,
	/// Signed mass (charge strength) summed into cell weights.
	pub weight: f64,
	/// Radius used for the per-cell maximum radius.
	pub radius: f64,
}

const NO_CHILD: u32 = u32::MAX;

/// Coincident (or nearly coincident) points stop subdividing here.
const MAX_DEPTH: usize = 48;

/// One square cell of the tree.
#[derive(Clone, Debug)]
pub struct Cell {
	pub x0: f64,
	pub y0: f64,
	pub x1: f64,
	pub y1: f64,
	children: [u32; 4],
	points: Vec<usize>,
	/// Sum of item weights below this cell.
	pub weight: f64,
	/// Centroid of the items below this cell, weighted by `|weight|`.
	pub cx: f64,
	pub cy: f64,
	/// Largest item radius below this cell.
	pub radius: f64,
}

impl Cell {
	fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
		Self {
			x0,
			y0,
			x1,
			y1,
			children: [NO_CHILD; 4],
			points: Vec::new(),
			weight: 0.0,
			cx: 0.0,
			cy: 0.0,
			radius: 0.0,
		}
	}

	pub fn is_leaf(&self) -> bool {
		self.children.iter().all(|&c| c == NO_CHILD)
	}

	/// Item indices stored in this cell. Empty for internal cells.
	pub fn points(&self) -> &[usize] {
		&self.points
	}

	pub fn width(&self) -> f64 {
		self.x1 - self.x0
	}

	fn quadrant(&self, x: f64, y: f64) -> usize {
		let right = x >= (self.x0 + self.x1) / 2.0;
		let bottom = y >= (self.y0 + self.y1) / 2.0;
		usize::from(right) | (usize::from(bottom) << 1)
	}

	fn quadrant_bounds(&self, q: usize) -> (f64, f64, f64, f64) {
		let (xm, ym) = ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0);
		let (x0, x1) = if q & 1 == 1 { (xm, self.x1) } else { (self.x0, xm) };
		let (y0, y1) = if q & 2 == 2 { (ym, self.y1) } else { (self.y0, ym) };
		(x0, y0, x1, y1)
	}
}

/// Quadtree over a set of items. Items with non-finite coordinates are left out.
#[derive(Clone, Debug, Default)]
pub struct QuadTree {
	cells: Vec<Cell>,
	items: Vec<QuadItem>,
}

impl QuadTree {
	pub fn build(items: Vec<QuadItem>) -> Self {
		let mut tree = Self {
			cells: Vec::new(),
			items,
		};

		let finite = |item: &&QuadItem| item.x.is_finite() && item.y.is_finite();
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for item in tree.items.iter().filter(finite) {
			min_x = min_x.min(item.x);
			min_y = min_y.min(item.y);
			max_x = max_x.max(item.x);
			max_y = max_y.max(item.y);
		}
		if !min_x.is_finite() {
			return tree;
		}

		let mut side = (max_x - min_x).max(max_y - min_y);
		if !(side.is_finite() && side > 0.0) {
			side = 1.0;
		}
		tree.cells
			.push(Cell::new(min_x, min_y, min_x + side, min_y + side));

		for index in 0..tree.items.len() {
			let item = tree.items[index];
			if item.x.is_finite() && item.y.is_finite() {
				tree.insert(index, item.x, item.y);
			}
		}
		tree.accumulate();
		tree
	}

	pub fn is_empty(&self) -> bool {
		self.cells.is_empty()
	}

	pub fn item(&self, index: usize) -> &QuadItem {
		&self.items[index]
	}

	pub fn root(&self) -> Option<&Cell> {
		self.cells.first()
	}

	/// Pre-order traversal. When `visit` returns `true` the cell's children are
	/// skipped.
	pub fn visit(&self, mut visit: impl FnMut(&Cell) -> bool) {
		if self.cells.is_empty() {
			return;
		}
		let mut stack = vec![0usize];
		while let Some(index) = stack.pop() {
			let cell = &self.cells[index];
			if visit(cell) {
				continue;
			}
			for &child in cell.children.iter().rev() {
				if child != NO_CHILD {
					stack.push(child as usize);
				}
			}
		}
	}

	fn insert(&mut self, index: usize, x: f64, y: f64) {
		let mut cell = 0;
		let mut depth = 0;
		loop {
			if self.cells[cell].is_leaf() {
				let Some(&first) = self.cells[cell].points.first() else {
					self.cells[cell].points.push(index);
					return;
				};
				let (fx, fy) = (self.items[first].x, self.items[first].y);
				if (fx == x && fy == y) || depth >= MAX_DEPTH {
					self.cells[cell].points.push(index);
					return;
				}
				// Push the resident points one level down and keep descending.
				let resident = std::mem::take(&mut self.cells[cell].points);
				let q = self.cells[cell].quadrant(fx, fy);
				let child = self.child(cell, q);
				self.cells[child].points = resident;
			}
			let q = self.cells[cell].quadrant(x, y);
			cell = self.child(cell, q);
			depth += 1;
		}
	}

	fn child(&mut self, cell: usize, q: usize) -> usize {
		let existing = self.cells[cell].children[q];
		if existing != NO_CHILD {
			return existing as usize;
		}
		let (x0, y0, x1, y1) = self.cells[cell].quadrant_bounds(q);
		let index = self.cells.len();
		self.cells.push(Cell::new(x0, y0, x1, y1));
		self.cells[cell].children[q] = index as u32;
		index
	}

	fn accumulate(&mut self) {
		for index in (0..self.cells.len()).rev() {
			let (mut weight, mut abs_weight) = (0.0, 0.0);
			let (mut sx, mut sy, mut mx, mut my) = (0.0, 0.0, 0.0, 0.0);
			let mut radius: f64 = 0.0;
			let mut count = 0usize;

			let cell = &self.cells[index];
			if cell.is_leaf() {
				for &p in &cell.points {
					let item = &self.items[p];
					weight += item.weight;
					abs_weight += item.weight.abs();
					sx += item.weight.abs() * item.x;
					sy += item.weight.abs() * item.y;
					mx += item.x;
					my += item.y;
					radius = radius.max(item.radius);
					count += 1;
				}
			} else {
				for &c in cell.children.iter().filter(|&&c| c != NO_CHILD) {
					let child = &self.cells[c as usize];
					weight += child.weight;
					abs_weight += child.weight.abs();
					sx += child.weight.abs() * child.cx;
					sy += child.weight.abs() * child.cy;
					mx += child.cx;
					my += child.cy;
					radius = radius.max(child.radius);
					count += 1;
				}
			}

			let (cx, cy) = if abs_weight > 0.0 {
				(sx / abs_weight, sy / abs_weight)
			} else if count > 0 {
				(mx / count as f64, my / count as f64)
			} else {
				((cell.x0 + cell.x1) / 2.0, (cell.y0 + cell.y1) / 2.0)
			};

			let cell = &mut self.cells[index];
			cell.weight = weight;
			cell.cx = cx;
			cell.cy = cy;
			cell.radius = radius;
		}
	}
}
