use super::config::{LayoutConfig, MIN_VIEWPORT_HEIGHT, MIN_VIEWPORT_WIDTH};
use super::highlight::HighlightState;
use super::types::{LayoutNode, LayoutResult};

/// Pointer slack around node rectangles, in canvas pixels.
pub const HIT_SLOP: f64 = 2.0;

/// Per-canvas render state: the current layout snapshot plus the
/// fade progress of the emphasis overlay.
pub struct RiverCanvasState {
	pub layout: LayoutResult,
	pub config: LayoutConfig,
	pub width: f64,
	pub height: f64,
	/// Node currently under the pointer, as an index into `layout.nodes`.
	pub pointer_node: Option<usize>,
	/// 0 at rest, 1 when emphasis is fully applied.
	pub emphasis_t: f64,
	/// Last non-idle highlight, kept until the fade-out completes.
	prev_highlight: Option<HighlightState>,
	delay_t: f64,
}

impl RiverCanvasState {
	pub fn new(layout: LayoutResult, config: LayoutConfig) -> Self {
		let (width, height) = viewport_size(&layout);
		Self {
			layout,
			config,
			width,
			height,
			pointer_node: None,
			emphasis_t: 0.0,
			prev_highlight: None,
			delay_t: 0.0,
		}
	}

	/// Swaps in a freshly computed layout; nothing is carried over.
	pub fn replace_layout(&mut self, layout: LayoutResult) {
		let (width, height) = viewport_size(&layout);
		self.layout = layout;
		self.width = width;
		self.height = height;
		self.pointer_node = None;
	}

	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		let (w, h) = (self.config.node_width, self.config.node_height);
		self.layout.nodes.iter().position(|node| {
			(node.x - HIT_SLOP..=node.x + w + HIT_SLOP).contains(&x)
				&& (node.y - HIT_SLOP..=node.y + h + HIT_SLOP).contains(&y)
		})
	}

	pub fn node(&self, idx: usize) -> Option<&LayoutNode> {
		self.layout.nodes.get(idx)
	}

	pub fn tick(&mut self, dt: f64, highlight: &HighlightState) {
		let (target, delay, speed) = if highlight.is_active() {
			(1.0, 0.05, 6.0)
		} else {
			(0.0, 0.0, 8.0)
		};

		if highlight.is_active() {
			if self.prev_highlight.as_ref() != Some(highlight) {
				self.prev_highlight = Some(highlight.clone());
			}
			self.delay_t = (self.delay_t + dt).min(delay);
			if self.delay_t < delay {
				return;
			}
		} else {
			self.delay_t = 0.0;
		}

		self.emphasis_t += (target - self.emphasis_t) * (speed * dt).min(1.0);
		if (target - self.emphasis_t).abs() < 0.01 {
			self.emphasis_t = target;
		}
		if self.emphasis_t == 0.0 && !highlight.is_active() {
			self.prev_highlight = None;
		}
	}

	/// Highlight to paint with: the live one, or the one fading out.
	pub fn visible_highlight<'a>(&'a self, live: &'a HighlightState) -> &'a HighlightState {
		if live.is_active() {
			live
		} else {
			self.prev_highlight.as_ref().unwrap_or(live)
		}
	}
}

/// Canvas size for a layout, never smaller than the minimum viewport.
pub fn viewport_size(layout: &LayoutResult) -> (f64, f64) {
	(
		layout.canvas_width.max(MIN_VIEWPORT_WIDTH),
		layout.canvas_height.max(MIN_VIEWPORT_HEIGHT),
	)
}
