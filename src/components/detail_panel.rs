use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::explorer::Explorer;
use super::force_graph::cluster_color;
use crate::engine::{Event, Liveness, Node, Summary, SummaryCache};
use crate::fetch::HttpSource;

const NEIGHBORS_SHOWN: usize = 8;

/// App-wide summary cache, shared by every surface.
#[derive(Clone, Copy)]
pub struct SummaryStore(StoredValue<Rc<SummaryCache<HttpSource>>, LocalStorage>);

impl SummaryStore {
	pub fn new(url: &str) -> Self {
		Self(StoredValue::new_local(Rc::new(SummaryCache::new(
			HttpSource::new(url),
		))))
	}

	fn cache(&self) -> Option<Rc<SummaryCache<HttpSource>>> {
		self.0.try_get_value()
	}
}

#[derive(Clone, Debug, PartialEq)]
enum SummaryState {
	Idle,
	Loading,
	Loaded(Summary),
	Missing,
	Failed(String),
}

/// Key used to look a node up in the summary file.
pub fn summary_key(node: &Node) -> &str {
	if node.link.trim().is_empty() {
		&node.source_id
	} else {
		&node.link
	}
}

/// Text to show for `node`: the long-form summary when found, else the
/// inline one, else nothing.
fn body_text(state: &SummaryState, node: &Node) -> Option<String> {
	match state {
		SummaryState::Loaded(summary) if !summary.text.trim().is_empty() => {
			Some(summary.text.clone())
		}
		SummaryState::Loading | SummaryState::Idle => None,
		_ => node.summary.clone().filter(|s| !s.trim().is_empty()),
	}
}

#[component]
pub fn DetailPanel(explorer: Explorer, store: SummaryStore) -> impl IntoView {
	let graph = explorer.graph();
	let snapshot = explorer.snapshot();
	let selected = Memo::new(move |_| snapshot.with(|s| s.selected));
	let summary = RwSignal::new(SummaryState::Idle);

	let liveness = Liveness::new();
	let lookups = liveness.clone();
	let graph_fx = graph.clone();
	Effect::new(move |_| {
		let Some(node) = selected.get().and_then(|id| graph_fx.node(id).cloned()) else {
			lookups.revoke();
			summary.set(SummaryState::Idle);
			return;
		};
		let Some(cache) = store.cache() else {
			return;
		};
		let token = lookups.begin();
		summary.set(SummaryState::Loading);
		spawn_local(async move {
			let outcome = cache.get_summary(summary_key(&node)).await;
			token.apply("summary lookup", || {
				summary.set(match outcome {
					Ok(Some(found)) => SummaryState::Loaded(Summary::clone(&found)),
					Ok(None) => SummaryState::Missing,
					Err(err) => SummaryState::Failed(err.to_string()),
				})
			});
		});
	});
	on_cleanup(move || liveness.revoke());

	move || {
		let node = selected.get().and_then(|id| graph.node(id).cloned())?;
		let cluster = graph.legend.label(node.cluster);
		let neighbors = graph
			.neighbors(node.id)
			.iter()
			.take(NEIGHBORS_SHOWN)
			.filter_map(|n| graph.node(n.id).map(|other| (other.id, other.title.clone(), n.weight)))
			.map(|(id, title, weight)| {
				view! {
					<li class="neighbor" on:click=move |_| explorer.pick(id)>
						<span class="neighbor-title">{title}</span>
						<span class="neighbor-weight">{format!("{weight:.2}")}</span>
					</li>
				}
			})
			.collect_view();
		let body_node = node.clone();
		let link = Some(node.link.clone()).filter(|l| l.starts_with("http"));
		let byline = [node.authors.clone(), node.published.clone(), node.domain.clone()]
			.into_iter()
			.filter(|part| !part.is_empty())
			.collect::<Vec<_>>()
			.join(" · ");

		Some(view! {
			<aside class="detail-panel">
				<button class="detail-close" title="Close (Esc)" on:click=move |_| explorer.dispatch(Event::Escape)>
					"×"
				</button>
				<h2 class="detail-title">{node.title.clone()}</h2>
				<p class="detail-meta">{byline}</p>
				<p class="detail-cluster">
					<span class="swatch" style:background-color=cluster_color(node.cluster)></span>
					{cluster}
				</p>
				{link.map(|href| {
					view! {
						<a class="detail-link" href=href target="_blank" rel="noopener">
							"Open paper"
						</a>
					}
				})}
				<div class="detail-summary">
					{move || {
						summary.with(|state| match (state, body_text(state, &body_node)) {
							(SummaryState::Loading, _) => {
								view! { <p class="summary-loading">"Loading summary…"</p> }.into_any()
							}
							(SummaryState::Failed(reason), text) => {
								view! {
									<p class="summary-error">"Summaries unavailable: " {reason.clone()}</p>
									{text.map(|text| view! { <p class="summary-text">{text}</p> })}
								}
									.into_any()
							}
							(_, Some(text)) => view! { <p class="summary-text">{text}</p> }.into_any(),
							(_, None) => {
								view! { <p class="summary-empty">"No summary available."</p> }.into_any()
							}
						})
					}}
				</div>
				<h3 class="detail-subhead">"Nearest neighbors"</h3>
				<ul class="neighbor-list">{neighbors}</ul>
			</aside>
		})
	}
}
