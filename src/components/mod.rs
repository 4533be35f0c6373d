pub mod detail_panel;
pub mod explorer;
pub mod force_graph;
pub mod legend;
pub mod search_panel;
