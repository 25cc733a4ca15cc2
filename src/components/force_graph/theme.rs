//! Visual theming for the force graph.
//!
//! The default look is an amber terminal: black markers outlined in amber on a
//! dark grid, amber monospace labels.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Background fill and grid overlay.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	pub grid_color: Color,
	/// Distance between grid lines in pixels (0 disables the grid).
	pub grid_spacing: f64,
}

/// Link connector style.
#[derive(Clone, Debug)]
pub struct LinkTheme {
	pub color: Color,
	pub width: f64,
}

/// Node marker colors.
#[derive(Clone, Debug)]
pub struct NodeTheme {
	pub fill: Color,
	/// Fill of hovered or dragged markers.
	pub highlight_fill: Color,
	pub stroke: Color,
}

/// Label text style.
#[derive(Clone, Debug)]
pub struct LabelTheme {
	pub color: Color,
	pub font_family: &'static str,
	pub shadow_color: Color,
	pub shadow_blur: f64,
	/// Glow color of hovered or dragged labels.
	pub highlight_shadow_color: Color,
	pub highlight_shadow_blur: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub link: LinkTheme,
	pub node: NodeTheme,
	pub label: LabelTheme,
}

impl Theme {
	/// Amber on black.
	pub fn amber() -> Self {
		let amber = Color::rgb(255, 176, 0);
		Self {
			name: "amber",
			background: BackgroundStyle {
				color: Color::rgb(10, 10, 10),
				grid_color: amber.with_alpha(0.1),
				grid_spacing: 40.0,
			},
			link: LinkTheme {
				color: amber.with_alpha(0.2),
				width: 1.0,
			},
			node: NodeTheme {
				fill: Color::rgb(0, 0, 0),
				highlight_fill: amber,
				stroke: amber,
			},
			label: LabelTheme {
				color: amber,
				font_family: "ui-monospace, monospace",
				shadow_color: Color::rgb(0, 0, 0),
				shadow_blur: 2.0,
				highlight_shadow_color: amber,
				highlight_shadow_blur: 8.0,
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::amber()
	}
}
