use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;

use crate::engine::{DataError, ExplorerConfig, Graph, GraphDataStore, InlineSource, Liveness};
use crate::fetch::HttpSource;
use crate::host::{GRAPH_SCRIPT_ID, inline_script};

#[derive(Clone, Debug)]
pub enum LoadState {
	Loading,
	Ready(Arc<Graph>),
	Failed(DataError),
}

/// Starts the one graph load for the app. Embedded data wins over the
/// configured URL. The result is dropped if the owner is gone by then.
pub fn use_graph(config: &ExplorerConfig) -> ReadSignal<LoadState> {
	let (state, set_state) = signal(LoadState::Loading);
	let liveness = Liveness::new();
	let token = liveness.begin();
	on_cleanup(move || liveness.revoke());

	let (policy, url) = (config.dangling_links, config.graph_url.clone());
	spawn_local(async move {
		let result = match inline_script(GRAPH_SCRIPT_ID) {
			Some(body) => {
				let source = InlineSource::new(format!("#{GRAPH_SCRIPT_ID}"), body);
				GraphDataStore::new(source, policy).load().await
			}
			None => GraphDataStore::new(HttpSource::new(url), policy).load().await,
		};
		if let Err(err) = &result {
			error!("graph load failed: {err}");
		}
		token.apply("graph dataset", move || {
			set_state.set(match result {
				Ok(graph) => LoadState::Ready(Arc::new(graph)),
				Err(err) => LoadState::Failed(err),
			})
		});
	});
	state
}

pub fn use_load_state() -> ReadSignal<LoadState> {
	use_context::<ReadSignal<LoadState>>().unwrap_or_else(|| {
		let config = use_context::<ExplorerConfig>().unwrap_or_default();
		use_graph(&config)
	})
}

#[component]
pub fn LoadingPanel() -> impl IntoView {
	view! {
		<div class="status-panel">
			<p>"Loading paper graph…"</p>
		</div>
	}
}

#[component]
pub fn ErrorPanel(error: DataError) -> impl IntoView {
	view! {
		<div class="status-panel error">
			<h1>"Uh oh! Something went wrong!"</h1>
			<p>"The paper graph could not be loaded."</p>
			<pre>{error.to_string()}</pre>
		</div>
	}
}
