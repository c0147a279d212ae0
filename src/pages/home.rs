use leptos::prelude::*;

use crate::components::narrative_river::config::{LayoutConfig, endpoint};
use crate::components::narrative_river::fetch::fetch_records;
use crate::components::narrative_river::{LayoutResult, NarrativeRiver};

fn title(years: &[i32]) -> String {
	match (years.first(), years.last()) {
		(Some(first), Some(last)) if first != last => format!("The Narrative Arc ({first}–{last})"),
		(Some(year), _) => format!("The Narrative Arc ({year})"),
		_ => "The Narrative Arc".to_owned(),
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = LayoutConfig::default();
	let records = LocalResource::new(|| fetch_records(endpoint()));
	// failed fetches lay out as an empty river
	let layout = Memo::new(move |_| match records.get() {
		Some(outcome) => LayoutResult::from_outcome(&outcome, &config),
		None => LayoutResult::empty(&config),
	});

	view! {
		<div class="river-page">
			<header>
				<h1>{move || layout.with(|l| title(&l.years))}</h1>
				<p class="subtitle">
					"Tracing the evolution of consensus themes. Click a node to explore details."
				</p>
			</header>

			{move || match records.get() {
				None => view! { <div class="placeholder">"Loading narrative visualization..."</div> }.into_any(),
				Some(Err(e)) => {
					view! { <div class="placeholder error">{format!("Error loading data: {e}")}</div> }.into_any()
				}
				Some(Ok(_)) => view! { <NarrativeRiver layout=layout config=config /> }.into_any(),
			}}
		</div>
	}
}
