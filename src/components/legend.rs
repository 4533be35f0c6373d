use std::sync::Arc;

use leptos::prelude::*;

use super::force_graph::cluster_color;
use crate::engine::Graph;

/// Rows beyond this are folded into a count.
const MAX_ROWS: usize = 12;

#[component]
pub fn ClusterLegend(graph: Arc<Graph>) -> impl IntoView {
	let entries = graph.legend.entries();
	let hidden = entries.len().saturating_sub(MAX_ROWS);
	let rows = entries
		.into_iter()
		.take(MAX_ROWS)
		.map(|(cluster, label, size)| {
			view! {
				<li class="legend-row">
					<span class="swatch" style:background-color=cluster_color(cluster)></span>
					<span class="legend-label">{label}</span>
					<span class="legend-size">{size}</span>
				</li>
			}
		})
		.collect_view();

	view! {
		<div class="cluster-legend">
			<h3>"Clusters"</h3>
			<ul>{rows}</ul>
			{(hidden > 0).then(|| view! { <p class="legend-more">{format!("+{hidden} more")}</p> })}
		</div>
	}
}
