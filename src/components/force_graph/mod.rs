//! Force-directed graph visualization component.
//!
//! Lays out a mindmap of thoughts and tags with a force simulation and renders
//! it on an HTML canvas with:
//! - Link springs, many-body repulsion, centering and collision avoidance
//! - A tick loop that stops once the layout settles and reheats on demand
//! - Node dragging, hover highlighting and click-through navigation
//! - Re-centering when the surface is resized
//!
//! Everything except [`ForceGraphCanvas`] and the canvas painter is free of DOM
//! access and can run headlessly through [`ForceGraphState`] with a
//! [`ManualDriver`].
//!
//! # Example
//!
//! ```ignore
//! use mindmap_graph::{ForceGraphCanvas, GraphData, GraphLink, GraphNode};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode::thought("hello-world").with_url("/thoughts/hello-world"),
//!         GraphNode::tag("rust"),
//!     ],
//!     links: vec![GraphLink::new("hello-world", "rust")],
//! };
//!
//! view! { <ForceGraphCanvas data=Signal::derive(move || data.clone()) fullscreen=true /> }
//! ```

mod component;
pub mod config;
pub mod drag;
pub mod forces;
pub mod graph;
pub mod quadtree;
mod render;
pub mod scene;
pub mod scheduler;
pub mod simulation;
mod state;
pub mod style;
pub mod theme;
mod types;
pub mod viewport;

pub use component::ForceGraphCanvas;
pub use config::{ConfigError, ForceConfig, InteractionConfig, LayoutConfig, SimulationConfig};
pub use graph::{GraphError, ResolvedGraph};
pub use scheduler::{FrameDriver, ManualDriver, Scheduler};
pub use simulation::{EnginePhase, Simulation};
pub use state::ForceGraphState;
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode, NodeCategory};
pub use viewport::ViewportGeometry;
