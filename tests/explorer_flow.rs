//! End-to-end flows through the public engine API: load, search, hover, lock,
//! keyboard reset and summary lookup, against a scene that records every call.

use std::collections::HashSet;
use std::sync::Arc;

use futures::executor::block_on;
use paper_graph_explorer::engine::keyboard::{KeyCommand, KeyInput, interpret};
use paper_graph_explorer::engine::{
	DanglingLinkPolicy, DataError, Emphasis, Event, Focus, Graph, GraphDataStore, InlineSource,
	InteractionMachine, InteractionSettings, NodeId, Scene, SummaryCache, canonical_url,
};

const TWO_PAPERS: &str = r#"{
	"meta": {"model": "specter2", "coords": {"included": false, "method": "none"}, "compact": true},
	"clusters": {"0": {"label": "Safety", "size": 1}},
	"nodes": [
		{"id": 1, "aid": "2401.00001", "t": "alignment survey", "au": "A", "pd": "2024-01-01", "dm": "cs.AI", "ln": "https://arxiv.org/abs/2401.00001", "cid": 0},
		{"id": 2, "aid": "2401.00002", "t": "robotics", "au": "B", "pd": "2024-01-02", "dm": "cs.RO", "ln": "https://arxiv.org/abs/2401.00002", "cid": 3}
	],
	"links": [{"s": 1, "t": 2, "w": 0.8}]
}"#;

/// Adds two unrelated papers to the pair above.
const FOUR_PAPERS: &str = r#"{
	"nodes": [
		{"id": 1, "t": "alignment survey", "au": "A", "cid": 0},
		{"id": 2, "t": "robotics", "au": "B", "cid": 3},
		{"id": 3, "t": "protein folding", "au": "C", "cid": 1},
		{"id": 4, "t": "alignment tax", "au": "D", "cid": 0}
	],
	"links": [{"s": 1, "t": 2, "w": 0.8}, {"s": 3, "t": 4, "w": 0.6}, {"s": 9, "t": 1, "w": 0.5}]
}"#;

#[derive(Clone, Debug, PartialEq)]
enum Call {
	Pin(NodeId),
	Unpin(NodeId),
	CenterAt(f64, f64),
	ZoomTo(f64),
	Fit,
}

struct RecordingScene {
	calls: Vec<Call>,
	zoom: f64,
}

impl RecordingScene {
	fn new() -> Self {
		Self {
			calls: Vec::new(),
			zoom: 1.0,
		}
	}

	fn pinned(&self) -> HashSet<NodeId> {
		let mut pinned = HashSet::new();
		for call in &self.calls {
			match call {
				Call::Pin(id) => {
					pinned.insert(*id);
				}
				Call::Unpin(id) => {
					pinned.remove(id);
				}
				_ => {}
			}
		}
		pinned
	}

	fn take(&mut self) -> Vec<Call> {
		std::mem::take(&mut self.calls)
	}
}

impl Scene for RecordingScene {
	fn node_position(&self, id: NodeId) -> Option<(f64, f64)> {
		Some((id.0 as f64 * 100.0, -(id.0 as f64)))
	}

	fn pin(&mut self, id: NodeId) {
		self.calls.push(Call::Pin(id));
	}

	fn unpin(&mut self, id: NodeId) {
		self.calls.push(Call::Unpin(id));
	}

	fn zoom(&self) -> Option<f64> {
		Some(self.zoom)
	}

	fn center_at(&mut self, x: f64, y: f64, _duration_ms: f64) {
		self.calls.push(Call::CenterAt(x, y));
	}

	fn zoom_to(&mut self, k: f64, _duration_ms: f64) {
		self.zoom = k;
		self.calls.push(Call::ZoomTo(k));
	}

	fn zoom_to_fit(&mut self, _duration_ms: f64, _padding: f64) {
		self.zoom = 1.0;
		self.calls.push(Call::Fit);
	}
}

fn load(json: &str) -> Arc<Graph> {
	let store = GraphDataStore::new(InlineSource::new("inline", json), DanglingLinkPolicy::Skip);
	Arc::new(block_on(store.load()).unwrap())
}

#[test]
fn alignment_query_ranks_single_paper() {
	let graph = load(TWO_PAPERS);
	let hits = graph.search("alignment", 100);
	assert_eq!(hits.len(), 1);
	assert_eq!(hits[0].node.id, NodeId(1));
	assert!((hits[0].score - 3.02).abs() < 1e-9);

	assert!(graph.search("quantum chromodynamics", 100).is_empty());
	assert_eq!(graph.default_listing().len(), 2);
}

#[test]
fn locking_gates_hit_testing_to_the_neighborhood() {
	let graph = load(FOUR_PAPERS);
	let mut machine = InteractionMachine::new(graph.clone(), InteractionSettings::default());
	let mut scene = RecordingScene::new();

	machine.handle(Event::QueryChange("alignment".into()), &mut scene);
	machine.handle(Event::Click(NodeId(1)), &mut scene);
	assert_eq!(machine.focus(), Focus::Locked(NodeId(1)));
	// A click while searching is a selection, so the query was kept.
	assert_eq!(machine.query(), "alignment");

	let interactive: HashSet<_> = graph
		.nodes()
		.iter()
		.map(|n| n.id)
		.filter(|&id| machine.is_interactive(id))
		.collect();
	assert_eq!(interactive, HashSet::from([NodeId(1), NodeId(2)]));
	assert_eq!(machine.emphasis(NodeId(2)), Emphasis::Focus);
	assert_eq!(machine.emphasis(NodeId(4)), Emphasis::Faded);

	assert_eq!(scene.pinned(), HashSet::from([NodeId(1)]));
	assert!(scene.calls.contains(&Call::CenterAt(100.0, -1.0)));
	assert!(scene.calls.contains(&Call::ZoomTo(4.0)));
}

#[test]
fn escape_in_search_field_clears_query_and_resets() {
	let graph = load(TWO_PAPERS);
	let mut machine = InteractionMachine::new(graph, InteractionSettings::default());
	let mut scene = RecordingScene::new();

	machine.handle(Event::QueryChange("robot".into()), &mut scene);
	machine.handle(Event::PointerEnter(NodeId(2)), &mut scene);
	assert_eq!(machine.hovered(), Some(NodeId(2)));
	scene.take();

	let key = KeyInput {
		key: "Escape".into(),
		search_focused: true,
		editable_focused: true,
		has_query: !machine.query().is_empty(),
		..Default::default()
	};
	assert_eq!(interpret(&key), Some(KeyCommand::ClearSearch));
	machine.clear_search(&mut scene);

	assert_eq!(machine.query(), "");
	assert_eq!(machine.focus(), Focus::Idle);
	assert_eq!(machine.snapshot().active(), None);
	assert_eq!(machine.selected(), None);
	assert_eq!(scene.calls, vec![Call::Unpin(NodeId(2)), Call::Fit]);
	assert!(scene.pinned().is_empty());
}

#[test]
fn hover_survives_brief_exit_and_clears_after_delay() {
	let graph = load(TWO_PAPERS);
	let mut machine = InteractionMachine::new(graph, InteractionSettings::default());
	let mut scene = RecordingScene::new();

	machine.handle(Event::PointerEnter(NodeId(1)), &mut scene);
	machine.handle(Event::PointerLeave, &mut scene);
	machine.handle(Event::Advance(60.0), &mut scene);
	machine.handle(Event::PointerEnter(NodeId(1)), &mut scene);
	machine.handle(Event::Advance(200.0), &mut scene);
	assert_eq!(machine.hovered(), Some(NodeId(1)));

	machine.handle(Event::PointerLeave, &mut scene);
	machine.handle(Event::Advance(119.0), &mut scene);
	assert_eq!(machine.hovered(), Some(NodeId(1)));
	machine.handle(Event::Advance(1.0), &mut scene);
	assert_eq!(machine.hovered(), None);
	assert!(scene.pinned().is_empty());
}

#[test]
fn adjacency_is_symmetric_and_sorted() {
	let graph = load(
		r#"{"nodes":[{"id":1},{"id":2},{"id":3},{"id":4}],
		"links":[{"s":1,"t":2,"w":0.3},{"s":3,"t":1,"w":0.9},{"s":4,"t":1,"w":0.6},{"s":2,"t":3,"w":0.5}]}"#,
	);
	for link in graph.links() {
		let forward = graph.neighbors(link.source).iter().find(|n| n.id == link.target);
		let backward = graph.neighbors(link.target).iter().find(|n| n.id == link.source);
		assert_eq!(forward.map(|n| n.weight), Some(link.weight));
		assert_eq!(backward.map(|n| n.weight), Some(link.weight));
	}
	let weights: Vec<f64> = graph.neighbors(NodeId(1)).iter().map(|n| n.weight).collect();
	assert_eq!(weights, vec![0.9, 0.6, 0.3]);
}

#[test]
fn dangling_links_follow_policy() {
	let skipped = load(FOUR_PAPERS);
	assert_eq!(skipped.nodes().len(), 4);
	assert_eq!(skipped.degree(NodeId(1)), 1);
	assert_eq!(skipped.links().len(), 2);
	for link in skipped.links() {
		assert!(skipped.neighbors(link.source).iter().any(|n| n.id == link.target));
		assert!(skipped.neighbors(link.target).iter().any(|n| n.id == link.source));
	}

	let strict = GraphDataStore::new(InlineSource::new("inline", FOUR_PAPERS), DanglingLinkPolicy::Error);
	assert_eq!(
		block_on(strict.load()).err(),
		Some(DataError::DanglingLink {
			from: NodeId(9),
			to: NodeId(1),
		})
	);

	let padded = Graph::parse(FOUR_PAPERS, DanglingLinkPolicy::Placeholder).unwrap();
	assert_eq!(padded.nodes().len(), 5);
	assert_eq!(padded.node(NodeId(9)).map(|n| n.title.as_str()), Some("Unknown paper 9"));
	assert_eq!(padded.degree(NodeId(1)), 2);
}

#[test]
fn summary_lookup_uses_canonical_links() {
	let summaries = r#"{"summaries":{
		"https://arxiv.org/abs/2401.00001":{"t":"alignment survey","sm":"Surveys alignment."}
	}}"#;
	let cache = SummaryCache::new(InlineSource::new("summaries.json", summaries));
	let graph = load(TWO_PAPERS);

	let first = graph.node(NodeId(1)).unwrap();
	let found = block_on(cache.get_summary(&format!("{}?utm_source=feed#top", first.link))).unwrap();
	assert_eq!(found.map(|s| s.text.clone()).as_deref(), Some("Surveys alignment."));

	let second = graph.node(NodeId(2)).unwrap();
	assert_eq!(block_on(cache.get_summary(&second.link)).unwrap(), None);
	assert_eq!(
		canonical_url("https://x/y?q=1#frag"),
		canonical_url("https://x/y")
	);
}
