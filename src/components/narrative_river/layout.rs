//! Record → grid layout pipeline.
//!
//! Stages run in order: records are grouped by year, each year column is
//! rank-sorted and placed on the grid, consecutive columns are linked, and the
//! canvas is sized from the grid extents. Every stage is a pure function and a
//! new data snapshot always rebuilds the whole [`LayoutResult`].

use indexmap::IndexMap;
use log::info;

use super::config::LayoutConfig;
use super::types::{CanvasBounds, LayoutNode, LayoutResult, Link, LinkPath, Point, ThemeRecord};

/// Record indices per year, years in first-seen order, records in input order.
pub type YearGroups = IndexMap<i32, Vec<usize>>;

/// Output of coordinate assignment.
#[derive(Clone, Debug, Default)]
pub struct Placement {
	/// Distinct years, ascending.
	pub years: Vec<i32>,
	/// Positioned nodes, column by column, rank order within a column.
	pub nodes: Vec<LayoutNode>,
	/// `node_of_record[i]` is the index in `nodes` of input record `i`.
	pub node_of_record: Vec<usize>,
}

/// Partitions records by year.
pub fn group_by_year(records: &[ThemeRecord]) -> YearGroups {
	let mut groups = YearGroups::new();
	for (i, record) in records.iter().enumerate() {
		groups.entry(record.year).or_default().push(i);
	}
	groups
}

fn members(groups: &YearGroups, year: i32) -> &[usize] {
	groups.get(&year).map_or(&[][..], Vec::as_slice)
}

/// Orders each year column by rank and places it on the grid.
pub fn assign_coordinates(records: &[ThemeRecord], groups: &YearGroups, config: &LayoutConfig) -> Placement {
	let mut years: Vec<i32> = groups.keys().copied().collect();
	years.sort_unstable();

	let mut nodes = Vec::with_capacity(records.len());
	let mut node_of_record = vec![0; records.len()];

	for (col_index, &year) in years.iter().enumerate() {
		let mut column = members(groups, year).to_vec();
		// stable: equal ranks keep input order
		column.sort_by_key(|&i| records[i].rank);

		for (row_index, &i) in column.iter().enumerate() {
			node_of_record[i] = nodes.len();
			nodes.push(LayoutNode {
				record: records[i].clone(),
				x: config.column_x(col_index),
				y: config.row_y(row_index),
				col_index,
				row_index,
			});
		}
	}

	Placement {
		years,
		nodes,
		node_of_record,
	}
}

/// Picks the record in `candidates` that `source` continues into.
///
/// A base record follows the first base record of the next year. Otherwise
/// (or when the next year has no base) the first non-base record with the
/// same name wins. Candidates are scanned in input order.
fn continuation(records: &[ThemeRecord], source: &ThemeRecord, candidates: &[usize]) -> Option<usize> {
	let spine = if source.kind.is_base() {
		candidates.iter().copied().find(|&i| records[i].kind.is_base())
	} else {
		None
	};
	spine.or_else(|| {
		candidates
			.iter()
			.copied()
			.find(|&i| !records[i].kind.is_base() && records[i].name == source.name)
	})
}

/// Connector from the right-centre of `source` to the left-centre of `target`.
pub fn link_path(source: &LayoutNode, target: &LayoutNode, config: &LayoutConfig) -> LinkPath {
	let half = config.node_height / 2.0;
	LinkPath {
		source: Point {
			x: source.x + config.node_width,
			y: source.y + half,
		},
		target: Point {
			x: target.x,
			y: target.y + half,
		},
	}
}

/// Links each record to its continuation in the following year column.
pub fn resolve_links(
	records: &[ThemeRecord],
	groups: &YearGroups,
	placement: &Placement,
	config: &LayoutConfig,
) -> Vec<Link> {
	let mut links = Vec::new();
	for pair in placement.years.windows(2) {
		let next = members(groups, pair[1]);
		for &s in members(groups, pair[0]) {
			let Some(t) = continuation(records, &records[s], next) else {
				continue;
			};
			let source = &placement.nodes[placement.node_of_record[s]];
			let target = &placement.nodes[placement.node_of_record[t]];
			links.push(Link {
				id: format!("{}-{}", source.id(), target.id()),
				theme_name: source.name().to_owned(),
				path: link_path(source, target, config),
				source: source.clone(),
				target: target.clone(),
			});
		}
	}
	links
}

/// Drawing bounds for `year_count` columns whose tallest holds `max_rows`.
///
/// With no columns at all the canvas falls back to a square of one node
/// width plus padding.
pub fn canvas_bounds(year_count: usize, max_rows: usize, config: &LayoutConfig) -> CanvasBounds {
	let baseline = 2.0 * config.padding + config.node_width;
	if year_count == 0 {
		return CanvasBounds {
			width: baseline.max(0.0),
			height: baseline.max(0.0),
		};
	}
	let width = baseline + (year_count - 1) as f64 * config.column_step();
	let height = 2.0 * config.padding
		+ (max_rows.max(1) - 1) as f64 * config.row_step()
		+ config.node_height;
	CanvasBounds {
		width: width.max(0.0),
		height: height.max(0.0),
	}
}

/// Runs the whole pipeline over one data snapshot.
pub fn compute_layout(records: &[ThemeRecord], config: &LayoutConfig) -> LayoutResult {
	let groups = group_by_year(records);
	let placement = assign_coordinates(records, &groups, config);
	let links = resolve_links(records, &groups, &placement, config);
	let max_rows = groups.values().map(Vec::len).max().unwrap_or(0);
	let bounds = canvas_bounds(placement.years.len(), max_rows, config);

	info!(
		"layout: {} records, {} years, {} nodes, {} links",
		records.len(),
		placement.years.len(),
		placement.nodes.len(),
		links.len()
	);

	LayoutResult {
		years: placement.years,
		nodes: placement.nodes,
		links,
		canvas_width: bounds.width,
		canvas_height: bounds.height,
	}
}

impl LayoutResult {
	/// Layout with no years, nodes or links.
	pub fn empty(config: &LayoutConfig) -> Self {
		compute_layout(&[], config)
	}

	/// Lays out fetched records, or nothing at all when the fetch failed.
	pub fn from_outcome<E>(outcome: &Result<Vec<ThemeRecord>, E>, config: &LayoutConfig) -> Self {
		match outcome {
			Ok(records) => compute_layout(records, config),
			Err(_) => Self::empty(config),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::narrative_river::types::ThemeKind;

	fn base(id: &str, year: i32, name: &str, rank: i32) -> ThemeRecord {
		ThemeRecord::new(id, year, name, rank, ThemeKind::Base)
	}

	fn theme(id: &str, year: i32, name: &str, rank: i32) -> ThemeRecord {
		ThemeRecord::new(id, year, name, rank, ThemeKind::Theme)
	}

	fn layout(records: &[ThemeRecord]) -> LayoutResult {
		compute_layout(records, &LayoutConfig::default())
	}

	fn link_ids(result: &LayoutResult) -> Vec<&str> {
		result.links.iter().map(|l| l.id.as_str()).collect()
	}

	#[test]
	fn test_grouping_keeps_first_seen_year_order() {
		let records = [theme("a", 2021, "A", 1), theme("b", 2020, "B", 1), theme("c", 2021, "C", 2)];
		let groups = group_by_year(&records);
		assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![2021, 2020]);
		assert_eq!(groups[&2021], vec![0, 2]);
		assert!(group_by_year(&[]).is_empty());
	}

	#[test]
	fn test_every_record_becomes_one_node() {
		let records = [
			base("1", 2020, "Growth", 1),
			theme("2", 2020, "Inflation", 2),
			theme("3", 2021, "Inflation", 1),
			theme("4", 2022, "Rates", 3),
			theme("5", 2022, "Rates", 3),
		];
		let result = layout(&records);
		assert_eq!(result.nodes.len(), records.len());
		let mut ids: Vec<_> = result.nodes.iter().map(|n| n.id().to_owned()).collect();
		ids.sort();
		assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
	}

	#[test]
	fn test_columns_follow_numeric_year_order() {
		let records = [theme("a", 2021, "A", 1), theme("b", 2020, "B", 1), theme("c", 2023, "C", 1)];
		let result = layout(&records);
		assert_eq!(result.years, vec![2020, 2021, 2023]);
		let col = |id: &str| result.node(id).unwrap().col_index;
		assert_eq!((col("b"), col("a"), col("c")), (0, 1, 2));
	}

	#[test]
	fn test_rows_are_rank_ordered_and_stable() {
		let records = [
			theme("low", 2020, "Low", 3),
			theme("top", 2020, "Top", 1),
			theme("tie-a", 2020, "TieA", 2),
			theme("tie-b", 2020, "TieB", 2),
		];
		let result = layout(&records);
		let row = |id: &str| result.node(id).unwrap().row_index;
		assert_eq!(row("top"), 0);
		assert_eq!(row("tie-a"), 1);
		assert_eq!(row("tie-b"), 2);
		assert_eq!(row("low"), 3);

		for a in &result.nodes {
			for b in &result.nodes {
				if a.col_index == b.col_index && a.record.rank < b.record.rank {
					assert!(a.row_index < b.row_index);
				}
			}
		}
	}

	#[test]
	fn test_grid_coordinates() {
		let records = [theme("a", 2020, "A", 1), theme("b", 2021, "B", 1), theme("c", 2021, "C", 2)];
		let result = layout(&records);
		let c = result.node("c").unwrap();
		assert_eq!((c.x, c.y), (60.0 + 220.0, 60.0 + 64.0));
		let a = result.node("a").unwrap();
		assert_eq!((a.x, a.y), (60.0, 60.0));
	}

	#[test]
	fn test_example_scenario() {
		let records = [base("1", 2020, "Growth", 1), base("2", 2021, "Growth", 2), theme("3", 2021, "Inflation", 1)];
		let result = layout(&records);
		assert_eq!(result.years, vec![2020, 2021]);
		assert_eq!(link_ids(&result), vec!["1-2"]);
		assert!(result.is_origin("3"));
		assert!(result.is_dangling("2"));
		assert!(result.is_dangling("3"));
	}

	#[test]
	fn test_base_links_to_first_base_regardless_of_rank_or_name() {
		let records = [
			base("b20", 2020, "Recovery", 1),
			theme("t21", 2021, "Recovery", 1),
			base("b21", 2021, "Tightening", 5),
		];
		let result = layout(&records);
		assert_eq!(link_ids(&result), vec!["b20-b21"]);
	}

	#[test]
	fn test_base_falls_back_to_name_match_without_next_base() {
		let records = [base("b20", 2020, "Recovery", 1), theme("t21", 2021, "Recovery", 2)];
		let result = layout(&records);
		assert_eq!(link_ids(&result), vec!["b20-t21"]);
	}

	#[test]
	fn test_theme_links_by_name_only() {
		let records = [
			theme("i20", 2020, "Inflation", 4),
			base("b21", 2021, "Inflation", 1),
			theme("x21", 2021, "Rates", 2),
			theme("i21", 2021, "Inflation", 9),
			theme("r20", 2020, "Rates", 1),
			theme("g20", 2020, "Geopolitics", 2),
		];
		let result = layout(&records);
		let links = link_ids(&result);
		assert!(links.contains(&"i20-i21"));
		assert!(links.contains(&"r20-x21"));
		assert!(result.is_dangling("g20"));
		assert_eq!(links.len(), 2);
	}

	#[test]
	fn test_links_only_join_adjacent_columns() {
		let records = [theme("a", 2020, "AI", 1), theme("b", 2022, "AI", 1), theme("c", 2021, "Other", 1)];
		let result = layout(&records);
		assert!(result.links.is_empty());
	}

	#[test]
	fn test_link_anchors_and_theme_name() {
		let records = [theme("a", 2020, "AI", 1), theme("b", 2021, "AI", 2), theme("z", 2021, "Energy", 1)];
		let result = layout(&records);
		assert_eq!(result.node("b").unwrap().row_index, 1);
		let link = &result.links[0];
		assert_eq!(link.theme_name, "AI");
		assert_eq!(link.path.source, Point { x: 180.0, y: 80.0 });
		assert_eq!(link.path.target, Point { x: 280.0, y: 144.0 });
		assert_eq!(link.source.id(), "a");
		assert_eq!(link.target.id(), "b");
	}

	// Known ambiguity: first match wins, so two sources may share a target.
	#[test]
	fn test_fan_in_is_preserved() {
		let records = [
			base("b20", 2020, "Growth", 1),
			theme("g20", 2020, "Growth", 2),
			base("b21", 2021, "Growth", 1),
			theme("g21", 2021, "Growth", 2),
			theme("h20", 2020, "Growth", 3),
		];
		let result = layout(&records);
		assert_eq!(link_ids(&result), vec!["b20-b21", "g20-g21", "h20-g21"]);
		assert_eq!(result.incoming("g21").count(), 2);
	}

	// Known ambiguity: with two base records in a year only the first receives the spine.
	#[test]
	fn test_duplicate_base_leaves_second_unlinked() {
		let records = [
			base("b20", 2020, "Growth", 1),
			base("b21a", 2021, "Growth", 2),
			base("b21b", 2021, "Growth", 1),
		];
		let result = layout(&records);
		assert_eq!(link_ids(&result), vec!["b20-b21a"]);
		assert!(result.is_origin("b21b"));
	}

	#[test]
	fn test_canvas_bounds() {
		let records = [
			theme("a", 2020, "A", 1),
			theme("b", 2021, "B", 1),
			theme("c", 2021, "C", 2),
			theme("d", 2021, "D", 3),
		];
		let result = layout(&records);
		assert_eq!(result.canvas_width, 120.0 + 220.0 + 120.0);
		assert_eq!(result.canvas_height, 120.0 + 2.0 * 64.0 + 40.0);
	}

	#[test]
	fn test_empty_input_has_finite_baseline_canvas() {
		let result = layout(&[]);
		assert!(result.years.is_empty() && result.nodes.is_empty() && result.links.is_empty());
		assert!(result.canvas_width.is_finite() && result.canvas_height.is_finite());
		assert_eq!(result.canvas_width, 240.0);
		assert!(result.canvas_height >= 240.0);
	}

	#[test]
	fn test_failed_fetch_yields_empty_layout() {
		let outcome: Result<Vec<ThemeRecord>, String> = Err("boom".into());
		let result = LayoutResult::from_outcome(&outcome, &LayoutConfig::default());
		assert_eq!(result, LayoutResult::empty(&LayoutConfig::default()));
	}

	#[test]
	fn test_unranked_records_stay_finite() {
		let records = [theme("a", 2020, "A", i32::MAX), theme("b", 2020, "B", 1)];
		let result = layout(&records);
		assert_eq!(result.node("a").unwrap().row_index, 1);
		assert!(result.nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite()));
	}
}
