mod component;
pub mod config;
pub mod fetch;
pub mod highlight;
pub mod ingest;
pub mod layout;
mod render;
mod sidebar;
mod state;
pub mod types;

pub use component::NarrativeRiver;
pub use config::LayoutConfig;
pub use highlight::{Emphasis, HighlightEvent, HighlightPhase, HighlightState, ThemeEntity};
pub use layout::compute_layout;
pub use types::{CanvasBounds, LayoutNode, LayoutResult, Link, LinkPath, Point, ThemeKind, ThemeRecord};
