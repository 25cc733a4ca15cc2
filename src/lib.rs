//! mindmap-graph: Interactive force-directed mindmap of thoughts and tags.
//!
//! This crate provides a WASM-based graph visualization component that lays
//! out thoughts and the tags they carry with a force simulation, highlights
//! nodes on hover, lets them be dragged around and opens a thought on click.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::force_graph::{
	ForceGraphCanvas, ForceGraphState, GraphData, GraphLink, GraphNode, LayoutConfig,
	NodeCategory,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("mindmap: logging initialized");
}

/// Failure to read embedded JSON from the page.
#[derive(Debug, Error)]
pub enum LoadError {
	#[error("no <script id=\"{0}\"> element on the page")]
	Missing(&'static str),
	#[error("invalid JSON: {0}")]
	Parse(#[from] serde_json::Error),
}

fn script_text(id: &'static str) -> Result<String, LoadError> {
	let window: Window = web_sys::window().ok_or(LoadError::Missing(id))?;
	let document = window.document().ok_or(LoadError::Missing(id))?;
	let script: HtmlScriptElement = document
		.get_element_by_id(id)
		.and_then(|element| element.dyn_into().ok())
		.ok_or(LoadError::Missing(id))?;
	script.text().map_err(|_| LoadError::Missing(id))
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
pub fn load_graph_data() -> Result<GraphData, LoadError> {
	let data: GraphData = serde_json::from_str(&script_text("graph-data")?)?;
	info!(
		"mindmap: loaded {} nodes, {} links",
		data.nodes.len(),
		data.links.len()
	);
	Ok(data)
}

/// Load layout overrides from an optional script element with
/// id="graph-config". Missing, malformed or out-of-range settings fall back to
/// the defaults.
pub fn load_layout_config() -> LayoutConfig {
	let text = match script_text("graph-config") {
		Ok(text) => text,
		Err(_) => return LayoutConfig::default(),
	};
	match serde_json::from_str::<LayoutConfig>(&text) {
		Ok(config) => config.validated(),
		Err(e) => {
			warn!("mindmap: ignoring graph config: {}", e);
			LayoutConfig::default()
		}
	}
}

/// Main application component.
/// Loads graph data from DOM and renders the force-directed visualization.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_else(|e| {
		warn!("mindmap: failed to load graph data: {}", e);
		GraphData::default()
	});
	let graph_signal = Signal::derive(move || graph_data.clone());
	let config = load_layout_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Mindmap" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ForceGraphCanvas data=graph_signal fullscreen=true config=config />
			<div class="graph-overlay">
				<h1>"Mindmap"</h1>
				<p class="subtitle">"Drag nodes to rearrange. Click a thought to open it."</p>
			</div>
		</div>
	}
}
