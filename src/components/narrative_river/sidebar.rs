use leptos::prelude::*;
use web_sys::MouseEvent;

use super::highlight::HighlightState;
use super::ingest::UNRANKED;
use super::types::{LayoutNode, LayoutResult};

/// Descriptive columns shown for the selected theme, with their labels.
const DETAIL_FIELDS: &[(&str, &str)] = &[
	("Institution", "Institution"),
	("Sub_theme", "Sub-theme"),
	("Call_text", "Call"),
	("Section_description", "Section"),
];

fn rank_label(rank: i32) -> String {
	if rank == UNRANKED {
		"unranked".to_owned()
	} else {
		format!("#{rank}")
	}
}

fn describe_node(node: &LayoutNode) -> String {
	format!(
		"This theme shaped the narrative in {}, ranking {} in global importance.",
		node.record.year,
		rank_label(node.record.rank)
	)
}

/// Where the selected theme comes from and where it goes next.
fn continuity(layout: &LayoutResult, node: &LayoutNode) -> (String, String) {
	let year = node.record.year;
	let from = layout
		.incoming(node.id())
		.map(|l| format!("{} ({})", l.source.name(), l.source.record.year))
		.collect::<Vec<_>>();
	let into = layout
		.outgoing(node.id())
		.map(|l| format!("{} ({})", l.target.name(), l.target.record.year))
		.collect::<Vec<_>>();

	let from = if from.is_empty() {
		format!("New in {year}.")
	} else {
		format!("Continues from {}.", from.join(", "))
	};
	let into = if into.is_empty() {
		format!("Does not continue past {year}.")
	} else {
		format!("Continues into {}.", into.join(", "))
	};
	(from, into)
}

/// Slide-in panel for the selected node. Renders nothing without a selection.
#[component]
pub fn DetailSidebar(
	#[prop(into)] layout: Signal<LayoutResult>,
	highlight: RwSignal<HighlightState>,
) -> impl IntoView {
	let selected = Memo::new(move |_| highlight.with(|h| h.selected().cloned()));

	move || {
		selected.get().map(|node| {
			let (from, into) = layout.with(|l| continuity(l, &node));
			let details = DETAIL_FIELDS
				.iter()
				.filter_map(|&(key, label)| {
					node.record.detail(key).map(|value| {
						let value = value.to_owned();
						view! {
							<li>
								<strong>{label}</strong>
								" "
								{value}
							</li>
						}
					})
				})
				.collect_view();

			view! {
				<aside class="river-sidebar" on:click=|ev: MouseEvent| ev.stop_propagation()>
					<div class="river-sidebar-header">
						<div>
							<span class="eyebrow">{format!("{} Theme", node.record.year)}</span>
							<h2>{node.record.name.clone()}</h2>
						</div>
						<button
							class="close"
							on:click=move |_| highlight.update(HighlightState::close_selection)
						>
							"✕"
						</button>
					</div>
					<p class="summary">{describe_node(&node)}</p>
					<h3>"Continuity"</h3>
					<ul class="continuity">
						<li>{from}</li>
						<li>{into}</li>
					</ul>
					<h3>"Key Insights"</h3>
					<ul class="details">{details}</ul>
					<footer>{format!("Source: Aggregated Outlooks {}", node.record.year)}</footer>
				</aside>
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::narrative_river::config::LayoutConfig;
	use crate::components::narrative_river::layout::compute_layout;
	use crate::components::narrative_river::types::{ThemeKind, ThemeRecord};

	#[test]
	fn test_continuity_text() {
		let layout = compute_layout(
			&[
				ThemeRecord::new("a", 2020, "Rates", 1, ThemeKind::Theme),
				ThemeRecord::new("b", 2021, "Rates", 1, ThemeKind::Theme),
			],
			&LayoutConfig::default(),
		);
		let (from, into) = continuity(&layout, layout.node("a").unwrap());
		assert_eq!(from, "New in 2020.");
		assert_eq!(into, "Continues into Rates (2021).");
		let (from, into) = continuity(&layout, layout.node("b").unwrap());
		assert_eq!(from, "Continues from Rates (2020).");
		assert_eq!(into, "Does not continue past 2021.");
	}

	#[test]
	fn test_unranked_label() {
		assert_eq!(rank_label(UNRANKED), "unranked");
		assert_eq!(rank_label(3), "#3");
	}
}
