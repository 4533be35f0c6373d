//! Loading and validating the graph dataset.
//!
//! The exporter writes either a compact schema (`id:int, aid, t, au, pd, dm, ln,
//! cid, [sm], [x], [y]` with links `{s, t, w}`) or a verbose one (string `id`,
//! long field names, links `{source, target, weight}` by string id). Both end
//! up as the same [`Graph`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::LocalBoxFuture;
use log::{debug, info};
use serde::Deserialize;

use super::adjacency::{AdjacencyIndex, DanglingLinkPolicy, Neighbor};
use super::error::{DataError, Result};
use super::search::{SearchHit, SearchIndex};
use super::types::{ClusterId, ClusterInfo, ClusterLegend, GraphMeta, Link, Node, NodeId};

/// Somewhere a dataset body can be fetched from.
pub trait DataSource {
	/// Human-readable location for logs and errors.
	fn location(&self) -> &str;

	/// Fetches the raw body. Called at most once per load.
	fn fetch_text(&self) -> LocalBoxFuture<'static, Result<String>>;
}

/// A dataset body that is already in memory, e.g. embedded in the page.
#[derive(Clone, Debug)]
pub struct InlineSource {
	location: String,
	body: Result<String>,
}

impl InlineSource {
	pub fn new(location: impl Into<String>, body: impl Into<String>) -> Self {
		Self {
			location: location.into(),
			body: Ok(body.into()),
		}
	}

	/// A source whose fetch always fails with `err`.
	pub fn failing(location: impl Into<String>, err: DataError) -> Self {
		Self {
			location: location.into(),
			body: Err(err),
		}
	}
}

impl DataSource for InlineSource {
	fn location(&self) -> &str {
		&self.location
	}

	fn fetch_text(&self) -> LocalBoxFuture<'static, Result<String>> {
		let body = self.body.clone();
		Box::pin(async move { body })
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
	Num(u64),
	Text(String),
}

#[derive(Deserialize)]
struct RawNode {
	id: RawId,
	#[serde(default)]
	aid: Option<String>,
	#[serde(default, alias = "title")]
	t: Option<String>,
	#[serde(default, alias = "authors")]
	au: Option<String>,
	#[serde(default, alias = "published")]
	pd: Option<String>,
	#[serde(default, alias = "domain")]
	dm: Option<String>,
	#[serde(default, alias = "link")]
	ln: Option<String>,
	#[serde(default)]
	cid: ClusterId,
	#[serde(default, alias = "summary")]
	sm: Option<String>,
	#[serde(default)]
	x: Option<f64>,
	#[serde(default)]
	y: Option<f64>,
}

#[derive(Deserialize)]
struct RawLink {
	#[serde(alias = "source")]
	s: RawId,
	#[serde(alias = "target")]
	t: RawId,
	#[serde(alias = "weight")]
	w: f64,
}

#[derive(Deserialize)]
struct RawDataset {
	#[serde(default)]
	meta: GraphMeta,
	#[serde(default)]
	clusters: BTreeMap<String, ClusterInfo>,
	nodes: Vec<RawNode>,
	#[serde(default)]
	links: Vec<RawLink>,
}

/// Assigns numeric ids to string-keyed nodes and link endpoints.
struct IdAllocator {
	by_key: HashMap<String, NodeId>,
	/// `None` once the id space is exhausted.
	next: Option<u64>,
}

impl IdAllocator {
	fn resolve(&mut self, key: String) -> Result<NodeId> {
		if let Some(id) = self.by_key.get(&key) {
			return Ok(*id);
		}
		let id = NodeId(self.next.ok_or_else(|| {
			DataError::Malformed(format!("no free numeric id left for node {key:?}"))
		})?);
		self.next = self.next.and_then(|n| n.checked_add(1));
		self.by_key.insert(key, id);
		Ok(id)
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

fn normalize(raw: RawDataset) -> Result<(GraphMeta, ClusterLegend, Vec<Node>, Vec<Link>)> {
	let first_free = raw
		.nodes
		.iter()
		.try_fold(0u64, |acc, n| match n.id {
			RawId::Num(id) => id.checked_add(1).map(|next| acc.max(next)),
			RawId::Text(_) => Some(acc),
		});
	let mut ids = IdAllocator {
		by_key: HashMap::new(),
		next: first_free,
	};

	let mut seen = HashSet::with_capacity(raw.nodes.len());
	let mut nodes = Vec::with_capacity(raw.nodes.len());
	for n in raw.nodes {
		let (id, key) = match n.id {
			RawId::Num(id) => (NodeId(id), None),
			RawId::Text(key) => (ids.resolve(key.clone())?, Some(key)),
		};
		if !seen.insert(id) {
			return Err(DataError::Malformed(format!("duplicate node id {id}")));
		}
		let source_id = n.aid.or(key).unwrap_or_default();
		let link = non_empty(n.ln).unwrap_or_else(|| source_id.clone());
		nodes.push(Node {
			id,
			source_id,
			title: n.t.unwrap_or_default(),
			authors: n.au.unwrap_or_default(),
			published: n.pd.unwrap_or_default(),
			domain: non_empty(n.dm).unwrap_or_else(|| "unknown".to_owned()),
			link,
			cluster: n.cid,
			summary: non_empty(n.sm),
			position: n.x.zip(n.y),
		});
	}

	let mut links = Vec::with_capacity(raw.links.len());
	for l in raw.links {
		if !l.w.is_finite() {
			return Err(DataError::Malformed(format!("non-finite link weight {}", l.w)));
		}
		let mut endpoint = |raw: RawId| match raw {
			RawId::Num(id) => Ok(NodeId(id)),
			RawId::Text(key) => ids.resolve(key),
		};
		let source = endpoint(l.s)?;
		let target = endpoint(l.t)?;
		links.push(Link {
			source,
			target,
			weight: l.w.clamp(0.0, 1.0),
		});
	}

	Ok((raw.meta, ClusterLegend(raw.clusters), nodes, links))
}

/// A loaded, validated dataset with its derived indexes. Immutable once built.
#[derive(Default)]
pub struct Graph {
	pub meta: GraphMeta,
	pub legend: ClusterLegend,
	nodes: Vec<Node>,
	links: Vec<Link>,
	by_id: HashMap<NodeId, usize>,
	adjacency: AdjacencyIndex,
	search: SearchIndex,
}

impl Graph {
	/// Parses a dataset body and builds the indexes.
	pub fn parse(json: &str, policy: DanglingLinkPolicy) -> Result<Self> {
		let raw: RawDataset = serde_json::from_str(json)?;
		let (meta, legend, nodes, links) = normalize(raw)?;
		Self::from_parts(meta, legend, nodes, links, policy)
	}

	pub fn from_parts(
		meta: GraphMeta,
		legend: ClusterLegend,
		mut nodes: Vec<Node>,
		links: Vec<Link>,
		policy: DanglingLinkPolicy,
	) -> Result<Self> {
		let built = AdjacencyIndex::build(&nodes, &links, policy)?;
		if built.links.len() < links.len() {
			debug!("{} of {} links kept", built.links.len(), links.len());
		}
		nodes.extend(built.placeholders);
		let search = SearchIndex::new(&nodes);
		Ok(Self {
			meta,
			legend,
			nodes,
			links: built.links,
			by_id: built.by_id,
			adjacency: built.adjacency,
			search,
		})
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.by_id.get(&id).and_then(|&i| self.nodes.get(i))
	}

	pub fn adjacency(&self) -> &AdjacencyIndex {
		&self.adjacency
	}

	pub fn neighbors(&self, id: NodeId) -> &[Neighbor] {
		self.adjacency.neighbors(id)
	}

	pub fn degree(&self, id: NodeId) -> usize {
		self.adjacency.degree(id)
	}

	/// `id` plus its direct neighbors.
	pub fn neighborhood(&self, id: NodeId) -> HashSet<NodeId> {
		std::iter::once(id)
			.chain(self.neighbors(id).iter().map(|n| n.id))
			.collect()
	}

	/// Ranked search results, at most `limit`.
	pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit<'_>> {
		self.search.search(&self.nodes, query, &self.adjacency, limit)
	}

	/// All nodes by degree, for the initial listing.
	pub fn default_listing(&self) -> Vec<SearchHit<'_>> {
		self.search.default_listing(&self.nodes, &self.adjacency)
	}

	/// Ids containing `query` as one substring, for dimming decisions.
	pub fn match_set(&self, query: &str) -> HashSet<NodeId> {
		self.search.match_set(&self.nodes, query)
	}
}

impl fmt::Debug for Graph {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Graph")
			.field("nodes", &self.nodes.len())
			.field("links", &self.links.len())
			.field("clusters", &self.legend.0.len())
			.finish()
	}
}

/// Fetches and parses the graph dataset from a [`DataSource`].
pub struct GraphDataStore<S> {
	source: S,
	policy: DanglingLinkPolicy,
}

impl<S: DataSource> GraphDataStore<S> {
	pub fn new(source: S, policy: DanglingLinkPolicy) -> Self {
		Self { source, policy }
	}

	/// Fetches the dataset once and builds a [`Graph`]. Transport and parse
	/// failures are returned as-is; there is no retry.
	pub async fn load(&self) -> Result<Graph> {
		info!("loading graph dataset from {}", self.source.location());
		let body = self.source.fetch_text().await?;
		let graph = Graph::parse(&body, self.policy)?;
		info!(
			"graph loaded: {} nodes, {} links, coords {:?}",
			graph.nodes().len(),
			graph.links().len(),
			graph.meta.coords.method
		);
		Ok(graph)
	}
}

/// Generation counter that lets async completions detect they are stale.
///
/// Each [`Liveness::begin`] issues a token and invalidates every earlier one;
/// [`Liveness::revoke`] invalidates all of them, e.g. on teardown.
#[derive(Clone, Debug, Default)]
pub struct Liveness {
	generation: Arc<AtomicU64>,
}

/// Captured at request time; checked before applying a result.
#[derive(Clone, Debug)]
pub struct LiveToken {
	generation: Arc<AtomicU64>,
	issued: u64,
}

impl Liveness {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn begin(&self) -> LiveToken {
		let issued = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
		LiveToken {
			generation: self.generation.clone(),
			issued,
		}
	}

	pub fn revoke(&self) {
		self.generation.fetch_add(1, Ordering::SeqCst);
	}
}

impl LiveToken {
	pub fn is_live(&self) -> bool {
		self.generation.load(Ordering::SeqCst) == self.issued
	}

	/// Runs `apply` only while the token is live. Returns whether it ran.
	pub fn apply<F: FnOnce()>(&self, what: &str, apply: F) -> bool {
		if self.is_live() {
			apply();
			true
		} else {
			debug!("discarding stale {what}");
			false
		}
	}
}
