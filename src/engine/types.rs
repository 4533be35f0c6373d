//! Typed records for the graph dataset and the summary dataset.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a paper within one loaded dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Cluster assignment. May have no legend entry.
pub type ClusterId = i64;

/// Cluster id given to nodes synthesized for dangling link endpoints.
pub const PLACEHOLDER_CLUSTER: ClusterId = -1;

/// One paper. `id` is the only identity key; everything else is display data.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: NodeId,
	/// Identifier in the upstream archive (e.g. an arXiv id).
	pub source_id: String,
	pub title: String,
	pub authors: String,
	pub published: String,
	pub domain: String,
	pub link: String,
	pub cluster: ClusterId,
	/// Short inline summary, present when the exporter included one.
	pub summary: Option<String>,
	/// Seed coordinates from the exporter, in canvas units.
	pub position: Option<(f64, f64)>,
}

impl Node {
	pub(crate) fn placeholder(id: NodeId) -> Self {
		Self {
			id,
			source_id: String::new(),
			title: format!("Unknown paper {id}"),
			authors: String::new(),
			published: String::new(),
			domain: String::new(),
			link: String::new(),
			cluster: PLACEHOLDER_CLUSTER,
			summary: None,
			position: None,
		}
	}
}

/// Undirected similarity edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	pub source: NodeId,
	pub target: NodeId,
	/// Similarity in `[0, 1]`.
	pub weight: f64,
}

/// Legend entry for one cluster.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default)]
	pub size: usize,
}

/// Cluster legend keyed by the stringified cluster id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterLegend(pub BTreeMap<String, ClusterInfo>);

impl ClusterLegend {
	/// Display label for `cluster`, synthesized when the legend has none.
	pub fn label(&self, cluster: ClusterId) -> String {
		self.0
			.get(&cluster.to_string())
			.and_then(|info| info.label.as_deref())
			.map(str::trim)
			.filter(|label| !label.is_empty())
			.map(str::to_owned)
			.unwrap_or_else(|| format!("Cluster {cluster}"))
	}

	/// Member count recorded for `cluster`, if the legend knows it.
	pub fn size(&self, cluster: ClusterId) -> Option<usize> {
		self.0.get(&cluster.to_string()).map(|info| info.size)
	}

	/// Legend rows ordered by size, largest first. Keys that are not integers
	/// are skipped.
	pub fn entries(&self) -> Vec<(ClusterId, String, usize)> {
		let mut rows: Vec<_> = self
			.0
			.iter()
			.filter_map(|(key, info)| {
				let cluster = key.parse::<ClusterId>().ok()?;
				Some((cluster, self.label(cluster), info.size))
			})
			.collect();
		rows.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
		rows
	}
}

/// Neighbor-selection parameters the exporter used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborParams {
	pub top_k: u32,
	pub min_sim: f64,
	pub same_cluster_only: bool,
}

impl Default for NeighborParams {
	fn default() -> Self {
		Self {
			top_k: 5,
			min_sim: 0.85,
			same_cluster_only: false,
		}
	}
}

/// How the exporter generated seed coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordsMethod {
	Umap,
	Pca,
	Fr,
	Fa2,
	#[default]
	None,
	#[serde(other)]
	Unknown,
}

/// Canvas the exported coordinates were scaled into.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSize {
	pub w: f64,
	pub h: f64,
	pub pad: f64,
}

impl Default for CanvasSize {
	fn default() -> Self {
		Self {
			w: 1000.0,
			h: 700.0,
			pad: 24.0,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordsMeta {
	pub included: bool,
	pub method: CoordsMethod,
	pub canvas: CanvasSize,
}

/// Generation info carried in the dataset header.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphMeta {
	pub model: String,
	pub embedding_dim: u32,
	pub generated_at: String,
	pub neighbors: NeighborParams,
	pub coords: CoordsMeta,
	pub compact: bool,
}

/// Long-form summary record. The display fields are duplicated from the graph
/// dataset so a detail view can render without it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
	#[serde(default, rename = "aid")]
	pub source_id: Option<String>,
	#[serde(default, rename = "t", alias = "title")]
	pub title: Option<String>,
	#[serde(default, rename = "au", alias = "authors")]
	pub authors: Option<String>,
	#[serde(default, rename = "pd", alias = "published")]
	pub published: Option<String>,
	#[serde(default, rename = "ln", alias = "link")]
	pub link: Option<String>,
	#[serde(default, rename = "dm", alias = "domain")]
	pub domain: Option<String>,
	#[serde(default, rename = "cid")]
	pub cluster: Option<ClusterId>,
	#[serde(default, rename = "sm", alias = "summary")]
	pub text: String,
}

/// Top-level shape of the summary dataset.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SummaryFile {
	#[serde(default)]
	pub summaries: BTreeMap<String, Summary>,
}
