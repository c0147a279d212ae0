//! Browser entry point for the narrative river app.

use leptos::prelude::*;
use narrative_river::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
