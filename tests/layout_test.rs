//! Headless end-to-end runs of the graph state with a manual frame driver.

// Test crate reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use mindmap_graph::components::force_graph::{
	EnginePhase, ForceGraphState, GraphData, GraphLink, GraphNode, LayoutConfig, ManualDriver,
	NodeCategory, ViewportGeometry,
};

type State = ForceGraphState<ManualDriver>;

fn mount(data: GraphData) -> State {
	let mut state = ForceGraphState::new(
		&data,
		ViewportGeometry::new(800.0, 600.0),
		&LayoutConfig::default(),
		ManualDriver::default(),
	);
	state.start();
	state
}

/// Fires frames until the simulation asks for no more. Returns the ticks run.
fn settle(state: &mut State) -> usize {
	let mut ticks = 0;
	while state.scheduler().is_pending() && ticks < 5_000 {
		if state.frame() {
			ticks += 1;
		}
	}
	ticks
}

fn position(state: &State, node: usize) -> (f64, f64) {
	state.simulation().nodes()[node].position()
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
	((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

fn centroid(state: &State) -> (f64, f64) {
	let nodes = state.simulation().nodes();
	let n = nodes.len() as f64;
	let (sx, sy) = nodes
		.iter()
		.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x(), sy + node.y()));
	(sx / n, sy / n)
}

fn pair() -> GraphData {
	GraphData {
		nodes: vec![
			GraphNode::thought("first-post").with_url("/thoughts/first-post"),
			GraphNode::tag("rust"),
		],
		links: vec![GraphLink::new("first-post", "rust")],
	}
}

fn star(leaves: usize) -> GraphData {
	let mut nodes = vec![GraphNode::tag("hub").with_weight(3.0)];
	let mut links = Vec::new();
	for i in 0..leaves {
		let id = format!("thought-{i}");
		links.push(GraphLink::new(id.clone(), "hub"));
		nodes.push(GraphNode::thought(id));
	}
	GraphData { nodes, links }
}

#[test]
fn layout_settles_and_stops_requesting_frames() {
	let mut state = mount(star(6));
	let ticks = settle(&mut state);

	assert!((295..=305).contains(&ticks), "settled after {ticks} ticks");
	assert_eq!(state.simulation().phase(), EnginePhase::Settled);
	assert!(!state.scheduler().is_pending());
	assert_eq!(state.scheduler().driver().requests, ticks);
}

#[test]
fn linked_nodes_rest_near_link_distance() {
	let mut state = mount(pair());
	settle(&mut state);

	let d = distance(position(&state, 0), position(&state, 1));
	assert!((d - 150.0).abs() <= 15.0, "link length {d}");
}

#[test]
fn settled_nodes_do_not_overlap() {
	let nodes = (0..12)
		.map(|i| GraphNode::thought(format!("n{i}")).with_weight(1.0))
		.collect();
	let mut state = mount(GraphData {
		nodes,
		links: Vec::new(),
	});
	settle(&mut state);

	let config = LayoutConfig::default();
	let radius = config.forces.collision_radius(1.0);
	let count = state.simulation().nodes().len();
	for i in 0..count {
		for j in i + 1..count {
			let d = distance(position(&state, i), position(&state, j));
			assert!(d >= 2.0 * radius * 0.95, "nodes {i} and {j} are {d} apart");
		}
	}
}

#[test]
fn hundreds_of_mixed_nodes_settle_without_overlap() {
	let nodes: Vec<GraphNode> = (0..300)
		.map(|i| {
			let node = if i % 10 == 0 {
				GraphNode::tag(format!("tag-{i}"))
			} else {
				GraphNode::thought(format!("thought-{i}"))
			};
			node.with_weight((i % 5) as f64)
		})
		.collect();
	let data = GraphData {
		nodes,
		links: Vec::new(),
	};
	let mut state = mount(data.clone());
	let ticks = settle(&mut state);
	assert!((295..=305).contains(&ticks), "settled after {ticks} ticks");

	let forces = LayoutConfig::default().forces;
	let radii: Vec<f64> = data
		.nodes
		.iter()
		.map(|node| forces.collision_radius(node.weight))
		.collect();
	let count = radii.len();
	let mut overlaps = 0;
	for i in 0..count {
		let a = position(&state, i);
		assert!(a.0.is_finite() && a.1.is_finite(), "node {i} at {a:?}");
		for j in i + 1..count {
			if distance(a, position(&state, j)) < (radii[i] + radii[j]) * 0.95 {
				overlaps += 1;
			}
		}
	}
	assert_eq!(overlaps, 0);
}

#[test]
fn huge_weight_does_not_blank_the_layout() {
	let mut state = mount(GraphData {
		nodes: vec![
			GraphNode::thought("a").with_weight(1e308),
			GraphNode::thought("b").with_weight(1.0),
		],
		links: Vec::new(),
	});
	for _ in 0..5 {
		state.frame();
	}

	for node in state.simulation().nodes() {
		let (x, y) = node.position();
		assert!(x.is_finite() && y.is_finite(), "node at ({x}, {y})");
	}
}

#[test]
fn layout_is_centered_on_the_surface() {
	let mut state = mount(star(5));
	settle(&mut state);

	let (cx, cy) = centroid(&state);
	assert!((cx - 400.0).abs() < 5.0 && (cy - 300.0).abs() < 5.0, "centroid ({cx}, {cy})");
}

#[test]
fn resize_recenters_a_settled_layout() {
	let mut state = mount(star(5));
	settle(&mut state);
	let ticks_before = state.simulation().ticks();

	assert!(state.resize(1200.0, 800.0));
	assert!(state.frame(), "reheat tick after resize");
	settle(&mut state);

	assert!(state.simulation().ticks() > ticks_before);
	let (cx, cy) = centroid(&state);
	assert!((cx - 600.0).abs() < 5.0 && (cy - 400.0).abs() < 5.0, "centroid ({cx}, {cy})");
	assert_eq!(state.geometry(), ViewportGeometry::new(1200.0, 800.0));
}

#[test]
fn dragged_node_sits_exactly_under_the_pointer() {
	let mut state = mount(pair());
	settle(&mut state);
	let (x, y) = position(&state, 1);

	assert!(state.pointer_down(1, x, y));
	assert!(state.scheduler().is_pending(), "drag reheats the layout");
	state.pointer_move(1, 500.0, 420.0);
	state.frame();
	assert_eq!(position(&state, 1), (500.0, 420.0));
	state.frame();
	assert_eq!(position(&state, 1), (500.0, 420.0));
	assert_eq!(state.scene().nodes()[1].x, 500.0);
}

#[test]
fn released_node_returns_to_physics() {
	let mut state = mount(pair());
	settle(&mut state);
	let (x, y) = position(&state, 0);

	state.pointer_down(1, x, y);
	state.pointer_move(1, 700.0, 100.0);
	state.frame();
	assert_eq!(state.pointer_up(1), None, "a drop is not a click");
	assert_eq!(state.simulation().nodes()[0].pin(), None);

	let stretched = distance((700.0, 100.0), position(&state, 1));
	state.frame();
	assert_ne!(position(&state, 0), (700.0, 100.0));
	settle(&mut state);
	let d = distance(position(&state, 0), position(&state, 1));
	assert!(d < stretched, "link relaxed from {stretched} to {d}");
}

#[test]
fn clicking_a_node_yields_its_url() {
	let mut state = mount(pair());
	settle(&mut state);

	let (x, y) = position(&state, 0);
	assert!(state.pointer_down(3, x, y));
	assert_eq!(state.pointer_up(3).as_deref(), Some("/thoughts/first-post"));

	let (x, y) = position(&state, 1);
	assert!(state.pointer_down(3, x + 1.0, y - 1.0));
	assert_eq!(state.pointer_up(3), None, "tags have no page");
}

#[test]
fn two_pointers_drag_two_nodes() {
	let mut state = mount(pair());
	settle(&mut state);
	let (a, b) = (position(&state, 0), position(&state, 1));

	assert!(state.pointer_down(1, a.0, a.1));
	assert!(!state.pointer_down(2, a.0, a.1), "node already held");
	assert!(state.pointer_down(2, b.0, b.1));
	state.pointer_move(1, 100.0, 100.0);
	state.pointer_move(2, 700.0, 500.0);
	state.frame();

	assert_eq!(position(&state, 0), (100.0, 100.0));
	assert_eq!(position(&state, 1), (700.0, 500.0));
	assert!(state.pointer_cancel(2));
	assert_eq!(state.simulation().nodes()[1].pin(), None);
	assert!(state.simulation().nodes()[0].pin().is_some());
}

#[test]
fn teardown_freezes_the_layout() {
	let mut state = mount(star(4));
	for _ in 0..10 {
		state.frame();
	}
	state.teardown();
	let frozen: Vec<_> = state.simulation().nodes().to_vec();
	let ticks = state.simulation().ticks();

	for _ in 0..50 {
		assert!(!state.frame());
	}
	assert!(!state.resize(1024.0, 768.0));
	assert_eq!(state.simulation().nodes(), frozen.as_slice());
	assert_eq!(state.simulation().ticks(), ticks);
	assert!(!state.scheduler().is_pending());
	assert!(state.scene().is_disposed());
}

#[test]
fn unknown_link_endpoints_are_dropped() {
	let mut data = pair();
	data.links.push(GraphLink::new("first-post", "ghost"));
	let mut state = mount(data);

	assert_eq!(state.scene().links().len(), 1);
	assert_eq!(state.issues().len(), 1);
	assert!(state.issues()[0].to_string().contains("ghost"));
	settle(&mut state);
	assert_eq!(state.scene().links().len(), 1);
}

#[test]
fn scene_is_built_once_per_mount() {
	let mut state = mount(star(3));
	settle(&mut state);
	state.resize(1000.0, 700.0);
	settle(&mut state);

	assert_eq!(state.scene().builds(), 1);
	assert_eq!(state.scene().nodes().len(), 4);
}

#[test]
fn empty_graph_is_inert() {
	let mut state = mount(GraphData::default());

	assert_eq!(state.simulation().phase(), EnginePhase::Cold);
	assert!(!state.frame());
	assert!(!state.pointer_down(1, 400.0, 300.0));
	state.resize(1000.0, 800.0);
	assert_eq!(state.scheduler().driver().requests, 0);
	assert!(state.scene().nodes().is_empty());
}

#[test]
fn content_pipeline_json_drives_a_layout() {
	let json = r#"{
		"nodes": [
			{ "id": "on-gardens", "group": "thought", "val": 2, "url": "/thoughts/on-gardens" },
			{ "id": "nature", "group": "tag", "val": 4 },
			{ "id": "writing", "group": "tag" }
		],
		"links": [
			{ "source": "on-gardens", "target": "nature" },
			{ "source": "on-gardens", "target": "writing" }
		]
	}"#;
	let data: GraphData = serde_json::from_str(json).expect("valid fixture");
	assert_eq!(data.nodes[1].category, NodeCategory::Tag);

	let mut state = mount(data);
	settle(&mut state);

	assert_eq!(state.simulation().phase(), EnginePhase::Settled);
	assert!(state.issues().is_empty());
	assert_eq!(state.scene().links().len(), 2);
}
