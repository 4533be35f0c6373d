use leptos::prelude::*;

use super::explorer::Explorer;
use super::force_graph::cluster_color;
use crate::engine::search::SearchHit;
use crate::engine::{Graph, NodeId};

/// Display copy of one ranked hit.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRow {
	pub id: NodeId,
	pub title: String,
	pub byline: String,
	pub cluster: String,
	pub color: &'static str,
	pub degree: usize,
}

impl ResultRow {
	fn from_hit(graph: &Graph, hit: &SearchHit<'_>) -> Self {
		let node = hit.node;
		let byline = [node.authors.as_str(), node.published.as_str()]
			.into_iter()
			.filter(|part| !part.is_empty())
			.collect::<Vec<_>>()
			.join(" · ");
		Self {
			id: node.id,
			title: node.title.clone(),
			byline,
			cluster: graph.legend.label(node.cluster),
			color: cluster_color(node.cluster),
			degree: hit.degree,
		}
	}
}

/// Ranked rows for `query`. An empty query lists every node by degree when
/// `list_when_empty` is set, and nothing otherwise.
pub fn result_rows(graph: &Graph, query: &str, limit: usize, list_when_empty: bool) -> Vec<ResultRow> {
	let hits = if query.trim().is_empty() {
		if !list_when_empty {
			return Vec::new();
		}
		let mut hits = graph.default_listing();
		hits.truncate(limit);
		hits
	} else {
		graph.search(query, limit)
	};
	hits.iter().map(|hit| ResultRow::from_hit(graph, hit)).collect()
}

#[component]
pub fn SearchPanel(
	explorer: Explorer,
	limit: usize,
	#[prop(default = false)] list_when_empty: bool,
) -> impl IntoView {
	let graph = explorer.graph();
	let snapshot = explorer.snapshot();
	let query = Memo::new(move |_| snapshot.with(|s| s.query.clone()));
	let results = Memo::new(move |_| query.with(|q| result_rows(&graph, q, limit, list_when_empty)));
	let selected = Memo::new(move |_| snapshot.with(|s| s.selected));

	let summary_line = move || {
		let n = results.with(Vec::len);
		match (query.with(|q| q.trim().is_empty()), n) {
			(true, _) => format!("{n} papers by connections"),
			(false, 0) => "No matching papers".to_owned(),
			(false, n) if n >= limit => format!("Top {n} matches"),
			(false, 1) => "1 match".to_owned(),
			(false, n) => format!("{n} matches"),
		}
	};

	view! {
		<div class="search-panel">
			<input
				node_ref=explorer.search_input()
				type="search"
				class="search-input"
				placeholder="Search titles, authors, domains  ( / or Ctrl+K )"
				prop:value=move || query.get()
				on:input=move |ev| explorer.set_query(event_target_value(&ev))
			/>
			<Show when=move || list_when_empty || !query.with(String::is_empty)>
				<p class="result-count">{summary_line}</p>
				<ul class="search-results">
					<For
						each=move || results.get()
						key=|row| row.id
						children=move |row| {
							let id = row.id;
							view! {
								<li
									class="search-result"
									class:selected=move || selected.get() == Some(id)
									on:click=move |_| explorer.pick(id)
								>
									<span class="swatch" style:background-color=row.color></span>
									<span class="result-title">{row.title}</span>
									<span class="result-meta">{row.byline}</span>
									<span class="result-cluster">
										{row.cluster} " · " {row.degree} " links"
									</span>
								</li>
							}
						}
					/>
				</ul>
			</Show>
		</div>
	}
}
