use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role of a record within its year column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
	/// The per-year spine of the narrative.
	Base,
	/// An ordinary theme, linked across years by name.
	#[default]
	Theme,
}

impl ThemeKind {
	/// Whether this is the spine kind.
	pub fn is_base(self) -> bool {
		self == ThemeKind::Base
	}
}

/// One yearly theme entry as delivered by the data source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThemeRecord {
	/// Stable identifier, unique within a batch.
	pub id: String,
	/// Year column the record belongs to.
	pub year: i32,
	/// Theme name; continuity across years is matched on it.
	pub name: String,
	/// 1 is the most important theme of its year.
	pub rank: i32,
	/// Base or ordinary theme.
	#[serde(rename = "type")]
	pub kind: ThemeKind,
	/// Descriptive columns the engine does not interpret.
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub details: Map<String, Value>,
}

impl ThemeRecord {
	/// Record without descriptive columns.
	pub fn new(id: impl Into<String>, year: i32, name: impl Into<String>, rank: i32, kind: ThemeKind) -> Self {
		Self {
			id: id.into(),
			year,
			name: name.into(),
			rank,
			kind,
			details: Map::new(),
		}
	}

	/// Looks up a descriptive text column.
	pub fn detail(&self, key: &str) -> Option<&str> {
		self.details.get(key).and_then(Value::as_str)
	}
}

/// A record placed on the year/rank grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
	#[serde(flatten)]
	/// The record this node places.
	pub record: ThemeRecord,
	/// Left edge in canvas pixels.
	pub x: f64,
	/// Top edge in canvas pixels.
	pub y: f64,
	/// Year column, 0-based from the earliest year.
	pub col_index: usize,
	/// Row within the column after rank sorting.
	pub row_index: usize,
}

impl LayoutNode {
	/// Identifier of the underlying record.
	pub fn id(&self) -> &str {
		&self.record.id
	}

	/// Theme name of the underlying record.
	pub fn name(&self) -> &str {
		&self.record.name
	}

	/// Whether the node belongs to the narrative spine.
	pub fn is_base(&self) -> bool {
		self.record.kind.is_base()
	}
}

/// Canvas coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
}

/// Horizontal connector between two node anchors, left to right.
///
/// The curve is a cubic Bézier whose control points sit on the horizontal
/// midpoint, level with each anchor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkPath {
	/// Right-centre anchor of the source node.
	pub source: Point,
	/// Left-centre anchor of the target node.
	pub target: Point,
}

impl LinkPath {
	/// Horizontal midpoint between the anchors.
	pub fn mid_x(&self) -> f64 {
		(self.source.x + self.target.x) / 2.0
	}

	/// Control points `(c1, c2)` of the cubic curve.
	pub fn controls(&self) -> (Point, Point) {
		let mx = self.mid_x();
		(
			Point { x: mx, y: self.source.y },
			Point { x: mx, y: self.target.y },
		)
	}

	/// SVG path data for the curve.
	pub fn to_svg(&self) -> String {
		let (c1, c2) = self.controls();
		format!(
			"M{},{}C{},{},{},{},{},{}",
			self.source.x, self.source.y, c1.x, c1.y, c2.x, c2.y, self.target.x, self.target.y
		)
	}
}

/// Continuation of a theme from one year column into the next.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
	/// `"{source id}-{target id}"`.
	pub id: String,
	/// Node in the earlier year.
	pub source: LayoutNode,
	/// Node in the following year.
	pub target: LayoutNode,
	/// Name of the source theme, used for emphasis.
	pub theme_name: String,
	/// Curve between the two anchors.
	pub path: LinkPath,
}

/// Overall drawing size of a layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
	/// Width in canvas pixels.
	pub width: f64,
	/// Height in canvas pixels.
	pub height: f64,
}

/// Everything the renderer needs to paint one data snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
	/// Distinct years, ascending; index is the column.
	pub years: Vec<i32>,
	/// One node per input record.
	pub nodes: Vec<LayoutNode>,
	/// Continuations between adjacent columns.
	pub links: Vec<Link>,
	/// Drawing width.
	pub canvas_width: f64,
	/// Drawing height.
	pub canvas_height: f64,
}

impl LayoutResult {
	/// Canvas size as a pair.
	pub fn bounds(&self) -> CanvasBounds {
		CanvasBounds {
			width: self.canvas_width,
			height: self.canvas_height,
		}
	}

	/// Node for a record id.
	pub fn node(&self, id: &str) -> Option<&LayoutNode> {
		self.nodes.iter().find(|n| n.id() == id)
	}

	/// Links ending at `node_id`.
	pub fn incoming<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
		self.links.iter().filter(move |l| l.target.id() == node_id)
	}

	/// Links starting at `node_id`.
	pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
		self.links.iter().filter(move |l| l.source.id() == node_id)
	}

	/// The theme newly appears at this node.
	pub fn is_origin(&self, node_id: &str) -> bool {
		self.incoming(node_id).next().is_none()
	}

	/// The theme does not continue past this node.
	pub fn is_dangling(&self, node_id: &str) -> bool {
		self.outgoing(node_id).next().is_none()
	}
}
