//! Mapping from node category and interaction state to visual style.
//!
//! Pure functions with no rendering backend attached, so the same mapping can
//! drive a canvas, a retained scene graph or an immediate-mode UI.

use super::theme::{Color, Theme};
use super::types::NodeCategory;

/// Presentation-only interaction flags of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeInteraction {
	pub hovered: bool,
	pub dragged: bool,
}

impl NodeInteraction {
	pub fn is_highlighted(self) -> bool {
		self.hovered || self.dragged
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelStyle {
	pub color: Color,
	pub font_family: &'static str,
	pub font_size: f64,
	pub bold: bool,
	/// Offset of the text baseline origin from the node center.
	pub offset: (f64, f64),
	pub glow_color: Color,
	pub glow_blur: f64,
}

impl LabelStyle {
	/// CSS font shorthand, e.g. `bold 14px monospace`.
	pub fn font(&self) -> String {
		let weight = if self.bold { "bold" } else { "normal" };
		format!("{} {}px {}", weight, self.font_size, self.font_family)
	}
}

/// Square marker plus label drawn for a node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	/// Half the marker's side length.
	pub half_size: f64,
	pub fill: Color,
	pub stroke: Color,
	pub stroke_width: f64,
	pub label: LabelStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkStyle {
	pub color: Color,
	pub width: f64,
}

/// Half side length of a node's marker.
pub fn marker_half_size(category: NodeCategory) -> f64 {
	match category {
		NodeCategory::Tag => 10.0,
		NodeCategory::Thought => 6.0,
	}
}

pub fn node_style(
	category: NodeCategory,
	interaction: NodeInteraction,
	theme: &Theme,
) -> NodeStyle {
	let tag = category == NodeCategory::Tag;
	let lit = interaction.is_highlighted();

	NodeStyle {
		half_size: marker_half_size(category),
		fill: if lit {
			theme.node.highlight_fill
		} else {
			theme.node.fill
		},
		stroke: theme.node.stroke,
		stroke_width: if tag { 2.0 } else { 1.0 },
		label: LabelStyle {
			color: theme.label.color,
			font_family: theme.label.font_family,
			font_size: if tag { 14.0 } else { 12.0 },
			bold: tag,
			offset: (16.0, 4.0),
			glow_color: if lit {
				theme.label.highlight_shadow_color
			} else {
				theme.label.shadow_color
			},
			glow_blur: if lit {
				theme.label.highlight_shadow_blur
			} else {
				theme.label.shadow_blur
			},
		},
	}
}

pub fn link_style(theme: &Theme) -> LinkStyle {
	LinkStyle {
		color: theme.link.color,
		width: theme.link.width,
	}
}
