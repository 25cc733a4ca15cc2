//! Canvas rendering for the force graph.
//!
//! Paints a [`Scene`] in three passes for correct z-ordering:
//! 1. Background fill and grid
//! 2. Link connectors
//! 3. Node markers, then their labels

use web_sys::CanvasRenderingContext2d;

use super::scene::{NodeVisual, Scene};
use super::style::{link_style, node_style};
use super::theme::Theme;
use super::viewport::ViewportGeometry;

/// Renders the complete scene to the canvas. A disposed scene paints nothing.
pub fn render(
	scene: &Scene,
	geometry: ViewportGeometry,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
) {
	if scene.is_disposed() {
		return;
	}
	draw_background(ctx, geometry, theme);
	draw_links(scene, ctx, theme);
	draw_nodes(scene, ctx, theme);
}

fn draw_background(ctx: &CanvasRenderingContext2d, geometry: ViewportGeometry, theme: &Theme) {
	let bg = &theme.background;
	ctx.set_fill_style_str(&bg.color.to_css());
	ctx.fill_rect(0.0, 0.0, geometry.width, geometry.height);

	if bg.grid_spacing <= 0.0 {
		return;
	}
	ctx.set_fill_style_str(&bg.grid_color.to_css());
	let mut x = 0.0;
	while x < geometry.width {
		ctx.fill_rect(x, 0.0, 1.0, geometry.height);
		x += bg.grid_spacing;
	}
	let mut y = 0.0;
	while y < geometry.height {
		ctx.fill_rect(0.0, y, geometry.width, 1.0);
		y += bg.grid_spacing;
	}
}

fn draw_links(scene: &Scene, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let style = link_style(theme);
	ctx.set_stroke_style_str(&style.color.to_css());
	ctx.set_line_width(style.width);

	ctx.begin_path();
	for link in scene.links() {
		ctx.move_to(link.x1, link.y1);
		ctx.line_to(link.x2, link.y2);
	}
	ctx.stroke();
}

fn draw_nodes(scene: &Scene, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	for node in scene.nodes() {
		draw_marker(node, ctx, theme);
	}
	// Labels after all markers so neighbouring markers never cover text.
	for node in scene.nodes() {
		draw_label(node, ctx, theme);
	}
}

fn draw_marker(node: &NodeVisual, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let style = node_style(node.category, node.interaction, theme);
	let (x, y, half) = (node.x, node.y, style.half_size);

	ctx.set_fill_style_str(&style.fill.to_css());
	ctx.fill_rect(x - half, y - half, half * 2.0, half * 2.0);
	ctx.set_stroke_style_str(&style.stroke.to_css());
	ctx.set_line_width(style.stroke_width);
	ctx.stroke_rect(x - half, y - half, half * 2.0, half * 2.0);
}

fn draw_label(node: &NodeVisual, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let label = node_style(node.category, node.interaction, theme).label;

	ctx.save();
	ctx.set_font(&label.font());
	ctx.set_fill_style_str(&label.color.to_css());
	ctx.set_shadow_color(&label.glow_color.to_css());
	ctx.set_shadow_blur(label.glow_blur);
	let _ = ctx.fill_text(&node.label, node.x + label.offset.0, node.y + label.offset.1);
	ctx.restore();
}
