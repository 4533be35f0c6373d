use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, NODE_RADIUS};
use super::types::ease_out_cubic;
use crate::engine::{Emphasis, InteractionMachine};

/// Above this many matches, search results are not labelled on the canvas.
const MAX_MATCH_LABELS: usize = 30;

pub fn render(state: &ForceGraphState, machine: &InteractionMachine, ctx: &CanvasRenderingContext2d) {
	let transform = state.transform();
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);
	draw_edges(state, machine, ctx);
	draw_nodes(state, machine, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, machine: &InteractionMachine, ctx: &CanvasRenderingContext2d) {
	let k = state.camera.pose().k;
	let line_width = 1.2 / k;
	let t = ease_out_cubic(state.highlight_t);
	let active = machine.active();
	let searching = machine.is_searching();

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (a, b) = (n1.data.user_data.id, n2.data.user_data.id);

		let (alpha, width) = match active {
			Some(id) if a == id || b == id => (0.5 + 0.4 * t, line_width * (1.0 + 0.5 * t)),
			Some(_) => (0.5 - 0.44 * t, line_width * (1.0 - 0.3 * t)),
			None if searching => {
				let both = machine.matches().contains(&a) && machine.matches().contains(&b);
				(if both { 0.5 } else { 0.08 }, line_width)
			}
			None => (0.5 - 0.44 * t, line_width),
		};

		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", alpha));
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	});
}

fn draw_nodes(state: &ForceGraphState, machine: &InteractionMachine, ctx: &CanvasRenderingContext2d) {
	let (t, k) = (ease_out_cubic(state.highlight_t), state.camera.pose().k);
	let font = format!("{}px sans-serif", 10.0 / k.max(0.5));
	let label_matches = machine.is_searching() && machine.matches().len() <= MAX_MATCH_LABELS;

	// Dimmed nodes first so the focused neighborhood paints on top.
	state.graph.visit_nodes(|node| {
		let emphasis = machine.emphasis(node.data.user_data.id);
		let (alpha, radius) = match emphasis {
			Emphasis::Focus => return,
			Emphasis::Normal => (1.0, NODE_RADIUS),
			Emphasis::Muted => (0.2, NODE_RADIUS * 0.85),
			Emphasis::Faded => (1.0 - 0.8 * t, NODE_RADIUS * (1.0 - 0.15 * t)),
		};
		let (x, y) = (node.x() as f64, node.y() as f64);

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.data.user_data.color);
		ctx.fill();
		ctx.set_global_alpha(1.0);

		if label_matches && emphasis == Emphasis::Normal {
			ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
			ctx.set_font(&font);
			let _ = ctx.fill_text(&node.data.user_data.label, x + radius + 3.0, y + 3.0);
		}
	});

	let Some(active) = machine.active() else {
		return;
	};

	state.graph.visit_nodes(|node| {
		let id = node.data.user_data.id;
		if machine.emphasis(id) != Emphasis::Focus {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let is_active = id == active;

		let (radius, glow_radius) = if is_active {
			(NODE_RADIUS * (1.0 + 0.35 * t), NODE_RADIUS * (1.8 + 1.2 * t))
		} else {
			(NODE_RADIUS * (1.0 + 0.2 * t), NODE_RADIUS * (1.4 + 0.6 * t))
		};

		if t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let alpha = if is_active { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
				let _ = gradient.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.data.user_data.color);
		ctx.fill();

		if is_active {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			let ring = if machine.locked() == Some(id) { 0.95 } else { 0.7 };
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", ring * t.max(0.3)));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str("white");
		ctx.set_font(&font);
		let _ = ctx.fill_text(&node.data.user_data.label, x + radius + 3.0, y + 3.0);
	});
}
