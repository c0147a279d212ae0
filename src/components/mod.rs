pub mod narrative_river;
