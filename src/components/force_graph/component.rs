//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and routes pointer events to
//! [`ForceGraphState`] for hover, dragging and click-through navigation. Ticks
//! are driven by `requestAnimationFrame` through [`AnimationFrameDriver`] and
//! stop on their own once the layout settles.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, PointerEvent, Window};

use super::config::LayoutConfig;
use super::render;
use super::scheduler::FrameDriver;
use super::state::ForceGraphState;
use super::theme::Theme;
use super::types::GraphData;
use super::viewport::ViewportGeometry;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Frame driver backed by `window.requestAnimationFrame`.
pub struct AnimationFrameDriver {
	callback: FrameCallback,
	handle: Option<i32>,
}

impl AnimationFrameDriver {
	fn new(callback: FrameCallback) -> Self {
		Self {
			callback,
			handle: None,
		}
	}
}

impl FrameDriver for AnimationFrameDriver {
	fn request_frame(&mut self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let callback = self.callback.borrow();
		let Some(cb) = callback.as_ref() else {
			warn!("mindmap: frame requested before the animation callback was installed");
			return;
		};
		match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			Ok(handle) => self.handle = Some(handle),
			Err(e) => warn!("mindmap: requestAnimationFrame failed: {:?}", e),
		}
	}

	fn cancel_frame(&mut self) {
		let (Some(window), Some(handle)) = (web_sys::window(), self.handle.take()) else {
			return;
		};
		if let Err(e) = window.cancel_animation_frame(handle) {
			warn!("mindmap: cancelAnimationFrame failed: {:?}", e);
		}
	}
}

/// Bundles graph state with its drawing context and theme.
struct GraphContext {
	state: ForceGraphState<AnimationFrameDriver>,
	ctx: CanvasRenderingContext2d,
	theme: Theme,
}

impl GraphContext {
	fn paint(&self) {
		render::render(
			self.state.scene(),
			self.state.geometry(),
			&self.ctx,
			&self.theme,
		);
	}
}

/// Everything one effect run attached to the page.
struct Mount {
	context: Rc<RefCell<Option<GraphContext>>>,
	animate: FrameCallback,
	resize: Option<Closure<dyn FnMut()>>,
}

impl Mount {
	fn teardown(self) {
		if let Some(mut graph) = self.context.borrow_mut().take() {
			graph.state.teardown();
		}
		if let (Some(window), Some(cb)) = (web_sys::window(), self.resize.as_ref()) {
			if let Err(e) =
				window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
			{
				warn!("mindmap: could not remove resize listener: {:?}", e);
			}
		}
		self.animate.borrow_mut().take();
	}
}

static NEXT_MOUNT: AtomicU64 = AtomicU64::new(0);

thread_local! {
	// Keyed by component instance; cleanup hooks must be `Send` and can only
	// carry the key.
	static LIVE_GRAPHS: RefCell<HashMap<u64, Mount>> = RefCell::new(HashMap::new());
}

fn teardown_mount(key: u64) {
	let mount = LIVE_GRAPHS.with(|live| live.borrow_mut().remove(&key));
	if let Some(mount) = mount {
		mount.teardown();
	}
}

fn register_mount(key: u64, mount: Mount) {
	LIVE_GRAPHS.with(|live| live.borrow_mut().insert(key, mount));
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|w| w.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|h| h.as_f64())
			.unwrap_or(600.0),
	)
}

fn surface_size(
	canvas: &HtmlCanvasElement,
	window: &Window,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		return window_size(window);
	}
	(
		width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

fn cursor_for(over_node: bool) -> &'static str {
	if over_node { "pointer" } else { "default" }
}

fn set_cursor(canvas: &HtmlCanvasElement, over_node: bool) {
	// `leptos::prelude` brings a `style` attribute method into scope.
	let style = HtmlElement::style(canvas);
	if let Err(e) = style.set_property("cursor", cursor_for(over_node)) {
		warn!("mindmap: could not set cursor: {:?}", e);
	}
}

fn navigate(url: &str) {
	let Some(window) = web_sys::window() else {
		return;
	};
	info!("mindmap: navigating to {}", url);
	if let Err(e) = window.location().set_href(url) {
		warn!("mindmap: navigation to {} failed: {:?}", url, e);
	}
}

/// Renders an interactive force-directed graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal; a new value replaces the
/// whole layout. The component sizes itself to its parent container by default;
/// set `fullscreen = true` to fill the viewport. Explicit `width`/`height`
/// override automatic sizing. The surface follows window resizes either way.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] config: Option<LayoutConfig>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let config = config.map(LayoutConfig::validated).unwrap_or_default();
	let key = NEXT_MOUNT.fetch_add(1, Ordering::Relaxed);
	let context_init = context.clone();

	Effect::new(move |_| {
		let data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		teardown_mount(key);

		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("mindmap: no window, graph not mounted");
			return;
		};
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("mindmap: canvas 2d context unavailable, graph not mounted");
			return;
		};

		let (w, h) = surface_size(&canvas, &window, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		// The callback has to exist before the first frame is requested.
		let animate: FrameCallback = Rc::new(RefCell::new(None));
		let context_anim = context_init.clone();
		*animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut graph) = *context_anim.borrow_mut() {
				if graph.state.frame() {
					graph.paint();
				}
			}
		}));

		let state = ForceGraphState::new(
			&data,
			ViewportGeometry::new(w, h),
			&config,
			AnimationFrameDriver::new(animate.clone()),
		);
		let graph = GraphContext {
			state,
			ctx,
			theme: Theme::default(),
		};
		graph.paint();
		*context_init.borrow_mut() = Some(graph);
		if let Some(ref mut graph) = *context_init.borrow_mut() {
			graph.state.start();
		}

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		let resize: Closure<dyn FnMut()> = Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = surface_size(&canvas_resize, &win, fullscreen, width, height);
			if let Some(ref mut graph) = *context_resize.borrow_mut() {
				if graph.state.resize(nw, nh) {
					canvas_resize.set_width(nw as u32);
					canvas_resize.set_height(nh as u32);
					graph.paint();
				}
			}
		});
		if let Err(e) =
			window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
		{
			warn!("mindmap: could not watch window resizes: {:?}", e);
		}

		register_mount(
			key,
			Mount {
				context: context_init.clone(),
				animate,
				resize: Some(resize),
			},
		);
	});

	on_cleanup(move || teardown_mount(key));

	// Pointer position relative to the canvas, which is also graph space.
	let locate = move |ev: &PointerEvent| -> Option<(HtmlCanvasElement, f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		Some((canvas, x, y))
	};

	let context_pd = context.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		let Some((canvas, x, y)) = locate(&ev) else {
			return;
		};
		if let Some(ref mut graph) = *context_pd.borrow_mut() {
			if graph.state.pointer_down(ev.pointer_id(), x, y) {
				if let Err(e) = canvas.set_pointer_capture(ev.pointer_id()) {
					warn!("mindmap: pointer capture failed: {:?}", e);
				}
				set_cursor(&canvas, true);
				graph.paint();
			}
		}
	};

	let context_pm = context.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let Some((canvas, x, y)) = locate(&ev) else {
			return;
		};
		if let Some(ref mut graph) = *context_pm.borrow_mut() {
			if graph.state.pointer_move(ev.pointer_id(), x, y) {
				graph.paint();
			}
			set_cursor(&canvas, graph.state.wants_pointer_cursor());
		}
	};

	let context_pu = context.clone();
	let on_pointerup = move |ev: PointerEvent| {
		let target = match *context_pu.borrow_mut() {
			Some(ref mut graph) => {
				let target = graph.state.pointer_up(ev.pointer_id());
				graph.paint();
				target
			}
			None => None,
		};
		if let Some(url) = target {
			navigate(&url);
		}
	};

	let context_pc = context.clone();
	let on_pointercancel = move |ev: PointerEvent| {
		if let Some(ref mut graph) = *context_pc.borrow_mut() {
			if graph.state.pointer_cancel(ev.pointer_id()) {
				graph.paint();
			}
		}
	};

	let context_pl = context.clone();
	let on_pointerleave = move |ev: PointerEvent| {
		let Some((canvas, _, _)) = locate(&ev) else {
			return;
		};
		if let Some(ref mut graph) = *context_pl.borrow_mut() {
			if graph.state.clear_hover() {
				graph.paint();
			}
			set_cursor(&canvas, graph.state.wants_pointer_cursor());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:pointerdown=on_pointerdown
			on:pointermove=on_pointermove
			on:pointerup=on_pointerup
			on:pointercancel=on_pointercancel
			on:pointerleave=on_pointerleave
			style="display: block; cursor: default; touch-action: none;"
		/>
	}
}
