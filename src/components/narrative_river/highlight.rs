//! Hover and selection tracking plus the emphasis rules derived from it.
//!
//! The state is owned by the view and only changes through [`HighlightEvent`]s,
//! one at a time. Emphasis queries are pure reads of the current state.

use log::debug;

use super::types::{LayoutNode, Link};

/// Anything drawn under a theme name.
pub trait ThemeEntity {
	/// Theme name the entity is drawn under.
	fn theme_name(&self) -> &str;
}

impl ThemeEntity for LayoutNode {
	fn theme_name(&self) -> &str {
		self.name()
	}
}

impl ThemeEntity for Link {
	fn theme_name(&self) -> &str {
		&self.theme_name
	}
}

/// Which of hover and selection are active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightPhase {
	/// Nothing emphasised.
	Idle,
	/// A theme is hovered, nothing selected.
	HoverOnly,
	/// A node is selected, nothing hovered.
	SelectedOnly,
	/// A node is selected while a theme is hovered.
	SelectedAndHover,
}

/// Pointer input delivered by the view.
#[derive(Clone, Debug)]
pub enum HighlightEvent {
	/// Pointer moved onto a node.
	PointerEnter(LayoutNode),
	/// Pointer moved off a node.
	PointerLeave(LayoutNode),
	/// A node was clicked.
	Click(LayoutNode),
	/// Empty space was clicked.
	ClickBackground,
	/// The detail panel was closed.
	CloseSelection,
}

/// Emphasis flags for one drawn entity.
///
/// `dimmed` and `highlighted` can both be set when the hovered and selected
/// themes differ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Emphasis {
	/// Pushed into the background.
	pub dimmed: bool,
	/// Shares the hovered or selected theme.
	pub highlighted: bool,
	/// Is the selected node itself.
	pub selected: bool,
}

/// Hovered theme and selected node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightState {
	hovered_theme: Option<String>,
	selected: Option<LayoutNode>,
}

impl HighlightState {
	/// Idle state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Name of the hovered theme.
	pub fn hovered_theme(&self) -> Option<&str> {
		self.hovered_theme.as_deref()
	}

	/// The selected node.
	pub fn selected(&self) -> Option<&LayoutNode> {
		self.selected.as_ref()
	}

	/// Current combination of hover and selection.
	pub fn phase(&self) -> HighlightPhase {
		match (self.selected.is_some(), self.hovered_theme.is_some()) {
			(false, false) => HighlightPhase::Idle,
			(false, true) => HighlightPhase::HoverOnly,
			(true, false) => HighlightPhase::SelectedOnly,
			(true, true) => HighlightPhase::SelectedAndHover,
		}
	}

	/// Whether anything is emphasised.
	pub fn is_active(&self) -> bool {
		self.phase() != HighlightPhase::Idle
	}

	/// Processes one event to completion.
	pub fn apply(&mut self, event: HighlightEvent) {
		let before = self.phase();
		match event {
			HighlightEvent::PointerEnter(node) => self.hovered_theme = Some(node.record.name),
			HighlightEvent::PointerLeave(_) => self.hovered_theme = None,
			HighlightEvent::Click(node) => self.selected = Some(node),
			HighlightEvent::ClickBackground | HighlightEvent::CloseSelection => self.selected = None,
		}
		let after = self.phase();
		if before != after {
			debug!("highlight: {before:?} -> {after:?}");
		}
	}

	/// Hovers the node's theme.
	pub fn pointer_enter(&mut self, node: &LayoutNode) {
		self.apply(HighlightEvent::PointerEnter(node.clone()));
	}

	/// Clears the hover.
	pub fn pointer_leave(&mut self, node: &LayoutNode) {
		self.apply(HighlightEvent::PointerLeave(node.clone()));
	}

	/// Selects `node`, replacing any earlier selection.
	pub fn click(&mut self, node: &LayoutNode) {
		self.apply(HighlightEvent::Click(node.clone()));
	}

	/// Clears the selection.
	pub fn click_background(&mut self) {
		self.apply(HighlightEvent::ClickBackground);
	}

	/// Clears the selection from the detail panel.
	pub fn close_selection(&mut self) {
		self.apply(HighlightEvent::CloseSelection);
	}

	/// Another theme is hovered, or a node of another theme is selected.
	pub fn is_dimmed(&self, entity: &impl ThemeEntity) -> bool {
		let name = entity.theme_name();
		self.hovered_theme.as_deref().is_some_and(|h| h != name)
			|| self.selected.as_ref().is_some_and(|s| s.name() != name)
	}

	/// The entity's theme is hovered or selected.
	pub fn is_highlighted(&self, entity: &impl ThemeEntity) -> bool {
		let name = entity.theme_name();
		self.hovered_theme.as_deref().is_some_and(|h| h == name)
			|| self.selected.as_ref().is_some_and(|s| s.name() == name)
	}

	/// `node` is the selected node.
	pub fn is_selected(&self, node: &LayoutNode) -> bool {
		self.selected.as_ref().is_some_and(|s| s.id() == node.id())
	}

	/// All flags for a node.
	pub fn node_emphasis(&self, node: &LayoutNode) -> Emphasis {
		Emphasis {
			dimmed: self.is_dimmed(node),
			highlighted: self.is_highlighted(node),
			selected: self.is_selected(node),
		}
	}

	/// All flags for a link; links are never selected.
	pub fn link_emphasis(&self, link: &Link) -> Emphasis {
		Emphasis {
			dimmed: self.is_dimmed(link),
			highlighted: self.is_highlighted(link),
			selected: false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::narrative_river::config::LayoutConfig;
	use crate::components::narrative_river::layout::compute_layout;
	use crate::components::narrative_river::types::{LayoutResult, ThemeKind, ThemeRecord};

	fn sample() -> LayoutResult {
		compute_layout(
			&[
				ThemeRecord::new("1", 2020, "Growth", 1, ThemeKind::Base),
				ThemeRecord::new("2", 2020, "Inflation", 2, ThemeKind::Theme),
				ThemeRecord::new("3", 2021, "Inflation", 1, ThemeKind::Theme),
				ThemeRecord::new("4", 2021, "Growth", 2, ThemeKind::Base),
			],
			&LayoutConfig::default(),
		)
	}

	fn node<'a>(layout: &'a LayoutResult, id: &str) -> &'a LayoutNode {
		layout.node(id).unwrap()
	}

	fn classify(state: &HighlightState, layout: &LayoutResult) -> Vec<Emphasis> {
		layout
			.nodes
			.iter()
			.map(|n| state.node_emphasis(n))
			.chain(layout.links.iter().map(|l| state.link_emphasis(l)))
			.collect()
	}

	#[test]
	fn test_idle_emphasises_nothing() {
		let layout = sample();
		let state = HighlightState::new();
		assert_eq!(state.phase(), HighlightPhase::Idle);
		assert!(classify(&state, &layout).iter().all(|e| *e == Emphasis::default()));
	}

	#[test]
	fn test_hover_highlights_theme_and_dims_rest() {
		let layout = sample();
		let mut state = HighlightState::new();
		state.pointer_enter(node(&layout, "2"));
		assert_eq!(state.phase(), HighlightPhase::HoverOnly);
		assert!(state.is_highlighted(node(&layout, "3")));
		assert!(!state.is_dimmed(node(&layout, "3")));
		assert!(state.is_dimmed(node(&layout, "1")));
		let link = layout.links.iter().find(|l| l.theme_name == "Inflation").unwrap();
		assert!(state.is_highlighted(link));
		assert!(!state.is_selected(node(&layout, "2")));

		state.pointer_leave(node(&layout, "2"));
		assert_eq!(state.phase(), HighlightPhase::Idle);
	}

	#[test]
	fn test_hover_is_idempotent() {
		let layout = sample();
		let mut once = HighlightState::new();
		once.pointer_enter(node(&layout, "3"));
		let mut twice = once.clone();
		twice.pointer_enter(node(&layout, "3"));
		assert_eq!(classify(&once, &layout), classify(&twice, &layout));
		assert_eq!(once, twice);
	}

	#[test]
	fn test_click_replaces_selection() {
		let layout = sample();
		let (n1, n2) = (node(&layout, "1"), node(&layout, "3"));
		let mut state = HighlightState::new();
		state.click(n1);
		state.click(n2);
		assert_eq!(state.selected(), Some(n2));
		assert!(!state.is_selected(n1));
		assert!(state.is_selected(n2));
		assert_eq!(state.phase(), HighlightPhase::SelectedOnly);
	}

	#[test]
	fn test_selection_survives_hover_changes() {
		let layout = sample();
		let mut state = HighlightState::new();
		state.click(node(&layout, "1"));
		state.pointer_enter(node(&layout, "2"));
		assert_eq!(state.phase(), HighlightPhase::SelectedAndHover);
		state.pointer_leave(node(&layout, "2"));
		assert_eq!(state.phase(), HighlightPhase::SelectedOnly);
		assert_eq!(state.selected().map(LayoutNode::id), Some("1"));
	}

	#[test]
	fn test_background_and_close_clear_selection_only() {
		let layout = sample();
		let mut state = HighlightState::new();
		state.pointer_enter(node(&layout, "2"));
		state.click(node(&layout, "2"));
		state.click_background();
		assert_eq!(state.phase(), HighlightPhase::HoverOnly);

		state.click(node(&layout, "4"));
		state.apply(HighlightEvent::CloseSelection);
		assert_eq!(state.phase(), HighlightPhase::HoverOnly);
		assert_eq!(state.hovered_theme(), Some("Inflation"));
	}

	#[test]
	fn test_hover_and_differing_selection_can_dim_and_highlight_together() {
		let layout = sample();
		let mut state = HighlightState::new();
		state.click(node(&layout, "1"));
		state.pointer_enter(node(&layout, "3"));

		let inflation = state.node_emphasis(node(&layout, "2"));
		assert!(inflation.highlighted && inflation.dimmed && !inflation.selected);

		let growth = state.node_emphasis(node(&layout, "4"));
		assert!(growth.highlighted && growth.dimmed);

		let selected = state.node_emphasis(node(&layout, "1"));
		assert!(selected.selected && selected.highlighted);
	}
}
