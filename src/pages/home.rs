use std::sync::Arc;

use leptos::prelude::*;

use super::loader::{ErrorPanel, LoadState, LoadingPanel, use_load_state};
use crate::components::detail_panel::{DetailPanel, SummaryStore};
use crate::components::explorer::{Explorer, use_keyboard_shortcuts};
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::legend::ClusterLegend;
use crate::components::search_panel::SearchPanel;
use crate::engine::{ExplorerConfig, Graph, Surface};

#[component]
fn DesktopExplorer(graph: Arc<Graph>, config: ExplorerConfig, store: SummaryStore) -> impl IntoView {
	let explorer = Explorer::new(graph.clone(), config.interaction_settings(Surface::Desktop));
	use_keyboard_shortcuts(explorer);

	let stats = format!("{} papers · {} links", graph.nodes().len(), graph.links().len());
	let model = (!graph.meta.model.is_empty()).then(|| format!("Embeddings: {}", graph.meta.model));

	view! {
		<div class="fullscreen-graph">
			<ForceGraphCanvas explorer=explorer fullscreen=true />
			<div class="graph-overlay">
				<h1>"Paper Graph"</h1>
				<p class="subtitle">{stats}</p>
				{model.map(|model| view! { <p class="subtitle">{model}</p> })}
				<SearchPanel explorer=explorer limit=config.result_limit(Surface::Desktop) />
			</div>
			<ClusterLegend graph=graph />
			<DetailPanel explorer=explorer store=store />
		</div>
	}
}

/// Desktop surface: full-window canvas with a search dropdown.
#[component]
pub fn Home() -> impl IntoView {
	let load = use_load_state();
	let config = use_context::<ExplorerConfig>().unwrap_or_default();
	let store = use_context::<SummaryStore>()
		.unwrap_or_else(|| SummaryStore::new(&config.summaries_url));

	move || match load.get() {
		LoadState::Loading => view! { <LoadingPanel /> }.into_any(),
		LoadState::Failed(error) => view! { <ErrorPanel error=error /> }.into_any(),
		LoadState::Ready(graph) => {
			view! { <DesktopExplorer graph=graph config=config.clone() store=store /> }.into_any()
		}
	}
}
