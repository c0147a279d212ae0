use std::f64::consts::FRAC_PI_2;

use web_sys::CanvasRenderingContext2d;

use super::config::YEAR_LABEL_TOP;
use super::highlight::{Emphasis, HighlightState};
use super::state::RiverCanvasState;
use super::types::{LayoutNode, Link};

const BASE_RGB: &str = "30, 41, 59";
const THEME_RGB: &str = "100, 116, 139";
const ACCENT_RGB: &str = "59, 130, 246";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
	from + (to - from) * t
}

pub fn render(state: &RiverCanvasState, highlight: &HighlightState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#ffffff");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	let t = ease_out_cubic(state.emphasis_t);
	let highlight = state.visible_highlight(highlight);

	draw_year_labels(state, ctx);
	for link in &state.layout.links {
		draw_link(link, highlight.link_emphasis(link), t, ctx);
	}

	// emphasised nodes go on top
	let (plain, emphasised): (Vec<_>, Vec<_>) = state
		.layout
		.nodes
		.iter()
		.map(|node| (node, highlight.node_emphasis(node)))
		.partition(|(_, e)| !e.highlighted && !e.selected);
	for (node, emphasis) in plain.into_iter().chain(emphasised) {
		draw_node(state, node, emphasis, t, ctx);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_year_labels(state: &RiverCanvasState, ctx: &CanvasRenderingContext2d) {
	let config = &state.config;
	ctx.set_fill_style_str("#94a3b8");
	ctx.set_font("600 14px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("top");
	for (col, year) in state.layout.years.iter().enumerate() {
		let x = config.column_x(col) + config.node_width / 2.0;
		let _ = ctx.fill_text(&year.to_string(), x, YEAR_LABEL_TOP);
	}
}

fn draw_link(link: &Link, emphasis: Emphasis, t: f64, ctx: &CanvasRenderingContext2d) {
	let from_base = link.source.is_base();
	let (rest_rgb, rest_alpha, width) = if from_base {
		(BASE_RGB, 0.1, 24.0)
	} else {
		(THEME_RGB, 0.25, 12.0)
	};

	let (rgb, alpha) = if emphasis.highlighted {
		(ACCENT_RGB, lerp(rest_alpha, 0.6, t))
	} else if emphasis.dimmed {
		(rest_rgb, lerp(rest_alpha, 0.05, t))
	} else {
		(rest_rgb, rest_alpha)
	};

	let path = &link.path;
	let (c1, c2) = path.controls();
	ctx.set_stroke_style_str(&format!("rgba({rgb}, {alpha})"));
	ctx.set_line_width(width);
	ctx.set_line_cap("round");
	ctx.begin_path();
	ctx.move_to(path.source.x, path.source.y);
	ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, path.target.x, path.target.y);
	ctx.stroke();
}

fn pill(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64) {
	let r = h / 2.0;
	ctx.begin_path();
	ctx.move_to(x + r, y);
	ctx.line_to(x + w - r, y);
	let _ = ctx.arc(x + w - r, y + r, r, -FRAC_PI_2, FRAC_PI_2);
	ctx.line_to(x + r, y + h);
	let _ = ctx.arc(x + r, y + r, r, FRAC_PI_2, 3.0 * FRAC_PI_2);
	ctx.close_path();
}

fn draw_node(state: &RiverCanvasState, node: &LayoutNode, emphasis: Emphasis, t: f64, ctx: &CanvasRenderingContext2d) {
	let config = &state.config;
	let scale = if emphasis.selected {
		lerp(1.0, 1.15, t)
	} else if emphasis.highlighted {
		lerp(1.0, 1.05, t)
	} else {
		1.0
	};
	let alpha = if emphasis.dimmed { lerp(1.0, 0.3, t) } else { 1.0 };

	let (w, h) = (config.node_width * scale, config.node_height * scale);
	let (cx, cy) = (node.x + config.node_width / 2.0, node.y + config.node_height / 2.0);
	let (x, y) = (cx - w / 2.0, cy - h / 2.0);

	let (fill, text) = if node.is_base() {
		("#1e293b", "#ffffff")
	} else if emphasis.highlighted {
		("#eff6ff", "#1d4ed8")
	} else {
		("#ffffff", "#475569")
	};
	let (border, border_width) = if emphasis.selected {
		("#2563eb", 2.0)
	} else if emphasis.highlighted {
		("#3b82f6", 1.5)
	} else if node.is_base() {
		("#0f172a", 1.0)
	} else {
		("#e2e8f0", 1.0)
	};

	ctx.set_global_alpha(alpha);
	pill(ctx, x, y, w, h);
	ctx.set_fill_style_str(fill);
	ctx.fill();
	ctx.set_stroke_style_str(border);
	ctx.set_line_width(border_width);
	ctx.stroke();

	if emphasis.selected && t > 0.01 {
		pill(ctx, x - 3.0, y - 3.0, w + 6.0, h + 6.0);
		ctx.set_stroke_style_str(&format!("rgba(37, 99, 235, {})", 0.2 * t));
		ctx.set_line_width(4.0);
		ctx.stroke();
	}

	ctx.set_fill_style_str(text);
	ctx.set_font(&format!("bold {}px sans-serif", 12.0 * scale));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text_with_max_width(node.name(), cx, cy, w - 16.0);
	ctx.set_global_alpha(1.0);
}
