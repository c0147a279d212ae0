use serde::{Deserialize, Serialize};

/// Where the records come from unless overridden at build time.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/narrative-river";

/// Minimum canvas width, even for tiny layouts.
pub const MIN_VIEWPORT_WIDTH: f64 = 1000.0;
/// Minimum canvas height.
pub const MIN_VIEWPORT_HEIGHT: f64 = 500.0;

/// Vertical position of the year labels above the columns.
pub const YEAR_LABEL_TOP: f64 = 20.0;

/// Data endpoint, `NARRATIVE_RIVER_ENDPOINT` at build time if set.
pub fn endpoint() -> &'static str {
	option_env!("NARRATIVE_RIVER_ENDPOINT").unwrap_or(DEFAULT_ENDPOINT)
}

/// Grid geometry shared by the layout engine and the painter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Width of every node.
	pub node_width: f64,
	/// Height of every node.
	pub node_height: f64,
	/// Horizontal space between year columns.
	pub col_gap: f64,
	/// Vertical space between rows.
	pub row_gap: f64,
	/// Margin around the whole grid.
	pub padding: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			node_width: 120.0,
			node_height: 40.0,
			col_gap: 100.0,
			row_gap: 24.0,
			padding: 60.0,
		}
	}
}

impl LayoutConfig {
	/// Distance between the left edges of adjacent columns.
	pub fn column_step(&self) -> f64 {
		self.node_width + self.col_gap
	}

	/// Distance between the top edges of adjacent rows.
	pub fn row_step(&self) -> f64 {
		self.node_height + self.row_gap
	}

	/// Left edge of column `col`.
	pub fn column_x(&self, col: usize) -> f64 {
		self.padding + col as f64 * self.column_step()
	}

	/// Top edge of row `row`.
	pub fn row_y(&self, row: usize) -> f64 {
		self.padding + row as f64 * self.row_step()
	}
}
