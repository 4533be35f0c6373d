use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::components::A;

use super::loader::{ErrorPanel, LoadState, LoadingPanel, use_load_state};
use crate::components::detail_panel::{DetailPanel, SummaryStore};
use crate::components::explorer::{Explorer, use_keyboard_shortcuts};
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::search_panel::SearchPanel;
use crate::engine::{ExplorerConfig, Graph, Surface};

const CANVAS_HEIGHT: f64 = 360.0;

#[component]
fn CompactExplorer(graph: Arc<Graph>, config: ExplorerConfig, store: SummaryStore) -> impl IntoView {
	let explorer = Explorer::new(graph, config.interaction_settings(Surface::Compact));
	use_keyboard_shortcuts(explorer);

	view! {
		<div class="compact-layout">
			<header class="compact-header">
				<h1>"Paper Graph"</h1>
				<A href="/">"Full view"</A>
			</header>
			<section class="compact-list">
				<SearchPanel
					explorer=explorer
					limit=config.result_limit(Surface::Compact)
					list_when_empty=true
				/>
			</section>
			<section class="compact-side">
				<div class="compact-canvas">
					<ForceGraphCanvas explorer=explorer height=Some(CANVAS_HEIGHT) />
				</div>
				<DetailPanel explorer=explorer store=store />
			</section>
		</div>
	}
}

/// Compact surface: ranked list first, small canvas beside it.
#[component]
pub fn Compact() -> impl IntoView {
	let load = use_load_state();
	let config = use_context::<ExplorerConfig>().unwrap_or_default();
	let store = use_context::<SummaryStore>()
		.unwrap_or_else(|| SummaryStore::new(&config.summaries_url));

	move || match load.get() {
		LoadState::Loading => view! { <LoadingPanel /> }.into_any(),
		LoadState::Failed(error) => view! { <ErrorPanel error=error /> }.into_any(),
		LoadState::Ready(graph) => {
			view! { <CompactExplorer graph=graph config=config.clone() store=store /> }.into_any()
		}
	}
}
