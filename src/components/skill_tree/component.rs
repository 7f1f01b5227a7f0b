//! Leptos component wrapping the skill tree canvas and its details panel.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for hovering, selecting, panning, and zooming. An animation loop
//! runs via `requestAnimationFrame`, advancing radius transitions and
//! repainting whenever the state asks for a frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::adapter::{Feedback, NodeDetails};
use super::graph::SkillGraph;
use super::node::CompletionStatus;
use super::render;
use super::state::SkillTreeState;
use super::theme::Theme;

/// Upper bound on a single frame step, so a backgrounded tab does not jump.
const MAX_FRAME_DT: f64 = 0.1;

/// Bundles the view state with the theme it is drawn with.
struct SkillTreeContext {
	state: SkillTreeState,
	theme: Theme,
}

impl SkillTreeContext {
	/// Pushes the outcome of an interaction into the panel signals.
	fn publish(&self, feedback: &Feedback, panel: &Panel) {
		panel.details.set(self.state.details());
		match feedback {
			Feedback::Rejected(id) => {
				let message = match self.state.graph.active().map(|node| node.status()) {
					Some(CompletionStatus::Completed) => {
						"A skill that depends on this one is still completed."
					}
					_ => "Complete a prerequisite first.",
				};
				debug!("skill-tree: rejected toggle on node {}", id);
				panel.notice.set(Some(message.to_string()));
			}
			Feedback::None => {}
			_ => panel.notice.set(None),
		}
		let cursor = if self.state.pan.moved {
			"grabbing"
		} else if self.state.hovered().is_some() {
			"pointer"
		} else {
			"grab"
		};
		panel.cursor.set(cursor);
	}
}

/// Reactive view of the interaction state, read by the panel markup.
#[derive(Clone, Copy)]
struct Panel {
	details: RwSignal<Option<NodeDetails>>,
	notice: RwSignal<Option<String>>,
	cursor: RwSignal<&'static str>,
}

/// Renders an interactive skill tree on a canvas element.
///
/// Pass the built graph via the reactive `graph` signal. The component sizes
/// itself to its parent container by default; set `fullscreen = true` to fill
/// the viewport and resize automatically with the window. Explicit
/// `width`/`height` override automatic sizing.
#[component]
pub fn SkillTreeCanvas(
	#[prop(into)] graph: Signal<SkillGraph>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] theme: Option<Theme>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let panel = Panel {
		details: RwSignal::new(None),
		notice: RwSignal::new(None),
		cursor: RwSignal::new("grab"),
	};
	let theme = theme.unwrap_or_default();
	let context: Rc<RefCell<Option<SkillTreeContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("skill-tree: no window, canvas not started");
			return;
		};

		let (w, h) = if fullscreen {
			viewport_size(&window)
		} else {
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
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		*context_init.borrow_mut() = Some(SkillTreeContext {
			state: SkillTreeState::new(graph.get(), w, h),
			theme: theme.clone(),
		});
		panel.details.set(None);
		panel.notice.set(None);

		// A new graph only replaces the state; the loop and listeners stay.
		if animate_init.borrow().is_some() {
			return;
		}

		let ctx = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.map(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>())
		{
			Some(Ok(ctx)) => ctx,
			_ => {
				warn!("skill-tree: 2d canvas context unavailable");
				return;
			}
		};

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = viewport_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		let mut last_frame = js_sys::Date::now();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			let dt = ((now - last_frame) / 1000.0).clamp(0.0, MAX_FRAME_DT);
			last_frame = now;

			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(dt, &c.theme);
				if c.state.take_frame() {
					render::render(&c.state, &ctx, &c.theme);
				}
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.pointer_down(x, y, &c.theme);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if let Err(e) = c.state.pointer_moved(x, y, &c.theme) {
				warn!("skill-tree: pointer move failed: {}", e);
			}
			c.publish(&Feedback::None, &panel);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			match c.state.pointer_up(x, y, &c.theme) {
				Ok(feedback) => c.publish(&feedback, &panel),
				Err(e) => warn!("skill-tree: click failed: {}", e),
			}
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			if let Err(e) = c.state.pointer_left() {
				warn!("skill-tree: pointer leave failed: {}", e);
			}
			c.publish(&Feedback::None, &panel);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			c.state.wheel(x, y, ev.delta_y());
		}
	};

	let context_toggle = context.clone();
	let on_toggle = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_toggle.borrow_mut() {
			match c.state.toggle_selected() {
				Ok(feedback) => c.publish(&feedback, &panel),
				Err(e) => warn!("skill-tree: toggle failed: {}", e),
			}
		}
	};

	let context_close = context.clone();
	let on_close = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_close.borrow_mut() {
			let feedback = c.state.close_details();
			c.publish(&feedback, &panel);
		}
	};

	let panel_display = move || if panel.details.with(Option::is_some) { "block" } else { "none" };
	let label = move || panel.details.with(|d| d.as_ref().map(|d| d.label.clone()));
	let description = move || panel.details.with(|d| d.as_ref().map(|d| d.description.clone()));
	let status = move || panel.details.with(|d| d.as_ref().map(|d| d.status.to_string()));
	let toggle_text = move || {
		match panel.details.with(|d| d.as_ref().map(|d| d.status)) {
			Some(CompletionStatus::Completed) => "Revert",
			_ => "Complete",
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="skill-tree-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style:display="block"
			style:cursor=move || panel.cursor.get()
		/>
		<aside class="skill-tree-panel" style:display=panel_display>
			<button class="skill-tree-panel-close" on:click=on_close>"×"</button>
			<h2>{label}</h2>
			<p class="skill-tree-panel-description">{description}</p>
			<p class="skill-tree-panel-status">{status}</p>
			<button class="skill-tree-panel-toggle" on:click=on_toggle>{toggle_text}</button>
			<p class="skill-tree-panel-notice">{move || panel.notice.get()}</p>
		</aside>
	}
}

fn viewport_size(window: &Window) -> (f64, f64) {
	let dimension = |value: Result<JsValue, JsValue>, fallback| {
		value.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(
		dimension(window.inner_width(), 800.0),
		dimension(window.inner_height(), 600.0),
	)
}

/// Event position relative to the canvas' top-left corner.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}
