use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::ForceGraphState;
use crate::components::explorer::Explorer;
use crate::engine::Event;

const FRAME_DT: f32 = 0.016;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

#[component]
pub fn ForceGraphCanvas(
	explorer: Explorer,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let animate_init: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb_init: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
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

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("2d canvas context unavailable");
				return;
			}
		};
		explorer.attach(ForceGraphState::new(&explorer.graph(), w, h));

		if fullscreen {
			let canvas_resize = canvas.clone();
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				explorer.with_canvas(|_, s| s.resize(nw, nh));
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let animate_inner = animate_init.clone();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !explorer.is_alive() {
				// View torn down: stop scheduling frames.
				return;
			}
			explorer.with_canvas(|machine, s| {
				machine.handle(Event::Advance(FRAME_DT as f64 * 1000.0), s);
				s.tick(FRAME_DT, machine.active().is_some());
				render::render(s, machine, &ctx);
			});
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		explorer.with_canvas(|_, s| s.begin_pan(x, y));
	};

	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);

		let event = explorer
			.with_canvas(|machine, s| {
				if s.pan_to(x, y) {
					return None;
				}
				let hit = s.node_at_position(x, y, |id| machine.is_interactive(id));
				let cursor = if hit.is_some() { "pointer" } else { "grab" };
				let canvas: &web_sys::HtmlElement = canvas.as_ref();
				let _ = web_sys::HtmlElement::style(canvas).set_property("cursor", cursor);
				if hit == s.pointer_over {
					return None;
				}
				s.pointer_over = hit;
				Some(hit.map_or(Event::PointerLeave, Event::PointerEnter))
			})
			.flatten();
		if let Some(event) = event {
			explorer.dispatch(event);
		}
	};

	let on_mouseup = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		let event = explorer
			.with_canvas(|machine, s| {
				let clicked = s.pan.active && !s.pan.moved;
				s.pan.active = false;
				if !clicked {
					return None;
				}
				Some(
					s.node_at_position(x, y, |id| machine.is_interactive(id))
						.map_or(Event::BackgroundClick, Event::Click),
				)
			})
			.flatten();
		if let Some(event) = event {
			explorer.dispatch(event);
		}
	};

	let on_mouseleave = move |_: MouseEvent| {
		let left = explorer
			.with_canvas(|_, s| {
				s.pan.active = false;
				s.pointer_over.take().is_some()
			})
			.unwrap_or(false);
		if left {
			explorer.dispatch(Event::PointerLeave);
		}
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		explorer.with_canvas(|_, s| s.zoom_at(x, y, factor));
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
