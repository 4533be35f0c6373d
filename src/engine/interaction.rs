//! Hover / lock / search state and the interactivity gate derived from it.
//!
//! The pointer drives a three-state focus: `Idle`, `Hovering(id)` and
//! `Locked(id)`. A lock is also the selection. The free-text query lives
//! alongside and only matters while nothing is locked. Gating follows one
//! priority order: lock beats search beats default.

use std::collections::HashSet;
use std::sync::Arc;

use log::debug;

use super::debounce::Debounce;
use super::focus::FocusController;
use super::scene::Scene;
use super::store::Graph;
use super::types::NodeId;

/// Who currently drives the highlight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
	#[default]
	Idle,
	Hovering(NodeId),
	/// Locked by a click or a pick; also the selection.
	Locked(NodeId),
}

impl Focus {
	/// The locked node if any, else the hovered one.
	pub fn active(self) -> Option<NodeId> {
		match self {
			Focus::Idle => None,
			Focus::Hovering(id) | Focus::Locked(id) => Some(id),
		}
	}
}

/// Inputs the machine reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
	PointerEnter(NodeId),
	PointerLeave,
	/// Pointer click on a node; ignored when the node is not interactive.
	Click(NodeId),
	/// Selection from a result list; not subject to pointer gating.
	Pick(NodeId),
	BackgroundClick,
	Escape,
	QueryChange(String),
	/// Advances the logical clock by the given number of milliseconds.
	Advance(f64),
}

/// How strongly a node should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	/// Member of the active neighborhood.
	Focus,
	Normal,
	/// Search is active and the node does not match.
	Muted,
	/// Something else is active.
	Faded,
}

/// Plain copy of the state for reactive views.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionSnapshot {
	pub hover: Option<NodeId>,
	pub locked: Option<NodeId>,
	pub selected: Option<NodeId>,
	pub query: String,
}

impl InteractionSnapshot {
	pub fn active(&self) -> Option<NodeId> {
		self.locked.or(self.hover)
	}
}

/// Timing and camera constants for one surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionSettings {
	pub hover_clear_delay_ms: f64,
	pub focus: FocusController,
	pub fit_duration_ms: f64,
	pub fit_padding: f64,
}

impl Default for InteractionSettings {
	fn default() -> Self {
		Self {
			hover_clear_delay_ms: 120.0,
			focus: FocusController::default(),
			fit_duration_ms: 400.0,
			fit_padding: 40.0,
		}
	}
}

pub struct InteractionMachine {
	graph: Arc<Graph>,
	settings: InteractionSettings,
	focus: Focus,
	query: String,
	matches: HashSet<NodeId>,
	neighborhood: Option<HashSet<NodeId>>,
	/// The single node currently fixed in place on our behalf.
	pinned: Option<NodeId>,
	hover_clear: Debounce,
	clock: f64,
}

impl InteractionMachine {
	pub fn new(graph: Arc<Graph>, settings: InteractionSettings) -> Self {
		Self {
			graph,
			hover_clear: Debounce::new(settings.hover_clear_delay_ms),
			settings,
			focus: Focus::Idle,
			query: String::new(),
			matches: HashSet::new(),
			neighborhood: None,
			pinned: None,
			clock: 0.0,
		}
	}

	pub fn graph(&self) -> &Arc<Graph> {
		&self.graph
	}

	pub fn settings(&self) -> &InteractionSettings {
		&self.settings
	}

	pub fn focus(&self) -> Focus {
		self.focus
	}

	pub fn active(&self) -> Option<NodeId> {
		self.focus.active()
	}

	pub fn hovered(&self) -> Option<NodeId> {
		match self.focus {
			Focus::Hovering(id) => Some(id),
			_ => None,
		}
	}

	pub fn locked(&self) -> Option<NodeId> {
		match self.focus {
			Focus::Locked(id) => Some(id),
			_ => None,
		}
	}

	pub fn selected(&self) -> Option<NodeId> {
		self.locked()
	}

	pub fn query(&self) -> &str {
		&self.query
	}

	pub fn is_searching(&self) -> bool {
		!self.query.trim().is_empty()
	}

	/// Substring matches for the current query.
	pub fn matches(&self) -> &HashSet<NodeId> {
		&self.matches
	}

	/// The active node plus its neighbors, or `None` when nothing is active.
	pub fn neighborhood(&self) -> Option<&HashSet<NodeId>> {
		self.neighborhood.as_ref()
	}

	pub fn pinned(&self) -> Option<NodeId> {
		self.pinned
	}

	pub fn hover_clear_pending(&self) -> bool {
		self.hover_clear.is_pending()
	}

	pub fn snapshot(&self) -> InteractionSnapshot {
		InteractionSnapshot {
			hover: self.hovered(),
			locked: self.locked(),
			selected: self.selected(),
			query: self.query.clone(),
		}
	}

	fn in_neighborhood(&self, id: NodeId) -> bool {
		self.neighborhood.as_ref().is_some_and(|set| set.contains(&id))
	}

	/// Whether `id` may be hit-tested and emphasized right now.
	pub fn is_interactive(&self, id: NodeId) -> bool {
		match self.focus {
			Focus::Locked(_) => self.in_neighborhood(id),
			_ if self.is_searching() => self.matches.contains(&id) || self.in_neighborhood(id),
			_ => true,
		}
	}

	pub fn emphasis(&self, id: NodeId) -> Emphasis {
		if self.in_neighborhood(id) {
			return Emphasis::Focus;
		}
		match (self.active().is_some(), self.is_searching()) {
			(true, _) => Emphasis::Faded,
			(false, true) if self.matches.contains(&id) => Emphasis::Normal,
			(false, true) => Emphasis::Muted,
			(false, false) => Emphasis::Normal,
		}
	}

	/// Applies one event.
	pub fn handle(&mut self, event: Event, scene: &mut dyn Scene) {
		match event {
			Event::PointerEnter(id) => self.pointer_enter(id, scene),
			Event::PointerLeave => self.pointer_leave(),
			Event::Click(id) => self.click(id, scene),
			Event::Pick(id) => self.pick(id, scene),
			Event::BackgroundClick | Event::Escape => self.reset(scene),
			Event::QueryChange(query) => self.query_change(query, scene),
			Event::Advance(dt) => self.advance(dt, scene),
		}
	}

	/// Empties the query and runs the full reset path.
	pub fn clear_search(&mut self, scene: &mut dyn Scene) {
		self.query.clear();
		self.matches.clear();
		self.reset(scene);
	}

	fn set_focus(&mut self, focus: Focus) {
		if self.focus == focus {
			return;
		}
		self.focus = focus;
		self.neighborhood = focus.active().map(|id| self.graph.neighborhood(id));
	}

	fn pin_exclusive(&mut self, id: NodeId, scene: &mut dyn Scene) {
		if self.pinned == Some(id) {
			return;
		}
		self.release_pin(scene);
		scene.pin(id);
		self.pinned = Some(id);
	}

	fn release_pin(&mut self, scene: &mut dyn Scene) {
		if let Some(old) = self.pinned.take() {
			scene.unpin(old);
		}
	}

	fn pointer_enter(&mut self, id: NodeId, scene: &mut dyn Scene) {
		if !self.is_interactive(id) {
			// Only a hover pin can be stale; a lock keeps its pin.
			if self.locked().is_none() {
				self.release_pin(scene);
			}
			self.hover_clear.start(self.clock);
			return;
		}
		if self.locked().is_some() {
			return;
		}
		self.pin_exclusive(id, scene);
		self.hover_clear.cancel();
		self.set_focus(Focus::Hovering(id));
	}

	fn pointer_leave(&mut self) {
		if self.locked().is_none() {
			self.hover_clear.start(self.clock);
		}
	}

	fn click(&mut self, id: NodeId, scene: &mut dyn Scene) {
		if !self.is_interactive(id) {
			return;
		}
		self.lock(id, scene);
	}

	fn pick(&mut self, id: NodeId, scene: &mut dyn Scene) {
		if self.graph.node(id).is_none() {
			debug!("ignoring pick of unknown node {id}");
			return;
		}
		self.lock(id, scene);
	}

	fn lock(&mut self, id: NodeId, scene: &mut dyn Scene) {
		self.hover_clear.cancel();
		self.pin_exclusive(id, scene);
		self.set_focus(Focus::Locked(id));
		self.settings.focus.focus(id, scene);
	}

	fn reset(&mut self, scene: &mut dyn Scene) {
		self.hover_clear.cancel();
		self.release_pin(scene);
		self.set_focus(Focus::Idle);
		scene.zoom_to_fit(self.settings.fit_duration_ms, self.settings.fit_padding);
	}

	fn query_change(&mut self, query: String, scene: &mut dyn Scene) {
		if self.selected().is_some() {
			self.reset(scene);
		}
		self.matches = self.graph.match_set(&query);
		self.query = query;
	}

	fn advance(&mut self, dt: f64, scene: &mut dyn Scene) {
		self.clock += dt;
		if self.hover_clear.fire_due(self.clock) && self.hovered().is_some() {
			self.release_pin(scene);
			self.set_focus(Focus::Idle);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::adjacency::DanglingLinkPolicy;
	use crate::engine::adjacency::tests::node;
	use crate::engine::types::{ClusterLegend, GraphMeta, Link};

	#[derive(Default)]
	struct TestScene {
		pinned: HashSet<NodeId>,
		zoom: f64,
		centered: Option<(f64, f64)>,
		fits: usize,
	}

	impl Scene for TestScene {
		fn node_position(&self, id: NodeId) -> Option<(f64, f64)> {
			Some((id.0 as f64 * 10.0, 0.0))
		}
		fn pin(&mut self, id: NodeId) {
			self.pinned.insert(id);
		}
		fn unpin(&mut self, id: NodeId) {
			self.pinned.remove(&id);
		}
		fn zoom(&self) -> Option<f64> {
			Some(self.zoom)
		}
		fn center_at(&mut self, x: f64, y: f64, _duration_ms: f64) {
			self.centered = Some((x, y));
		}
		fn zoom_to(&mut self, k: f64, _duration_ms: f64) {
			self.zoom = k;
		}
		fn zoom_to_fit(&mut self, _duration_ms: f64, _padding: f64) {
			self.fits += 1;
			self.zoom = 1.0;
		}
	}

	fn link(s: u64, t: u64) -> Link {
		Link {
			source: NodeId(s),
			target: NodeId(t),
			weight: 0.9,
		}
	}

	/// 1 - 2 - 3, 4 isolated. Titles: "alignment survey", "robotics",
	/// "reward models", "alignment tax".
	fn machine() -> (InteractionMachine, TestScene) {
		let nodes = vec![
			node(1, "alignment survey"),
			node(2, "robotics"),
			node(3, "reward models"),
			node(4, "alignment tax"),
		];
		let graph = Graph::from_parts(
			GraphMeta::default(),
			ClusterLegend::default(),
			nodes,
			vec![link(1, 2), link(2, 3)],
			DanglingLinkPolicy::Skip,
		)
		.unwrap();
		let scene = TestScene {
			zoom: 1.0,
			..Default::default()
		};
		(InteractionMachine::new(Arc::new(graph), InteractionSettings::default()), scene)
	}

	#[test]
	fn starts_idle_and_everything_is_interactive() {
		let (m, _) = machine();
		assert_eq!(m.focus(), Focus::Idle);
		assert!(m.neighborhood().is_none());
		assert!((1..=4).all(|i| m.is_interactive(NodeId(i))));
		assert_eq!(m.emphasis(NodeId(4)), Emphasis::Normal);
	}

	#[test]
	fn hover_pins_and_sets_neighborhood() {
		let (mut m, mut scene) = machine();
		m.handle(Event::PointerEnter(NodeId(2)), &mut scene);
		assert_eq!(m.hovered(), Some(NodeId(2)));
		assert_eq!(m.pinned(), Some(NodeId(2)));
		assert!(scene.pinned.contains(&NodeId(2)));
		let hood = m.neighborhood().unwrap();
		assert_eq!(hood.len(), 3);
		assert_eq!(m.emphasis(NodeId(3)), Emphasis::Focus);
		assert_eq!(m.emphasis(NodeId(4)), Emphasis::Faded);
	}

	#[test]
	fn switching_hover_moves_the_single_pin() {
		let (mut m, mut scene) = machine();
		m.handle(Event::PointerEnter(NodeId(1)), &mut scene);
		m.handle(Event::PointerEnter(NodeId(3)), &mut scene);
		assert_eq!(scene.pinned.len(), 1);
		assert!(scene.pinned.contains(&NodeId(3)));
	}

	#[test]
	fn leave_clears_hover_after_debounce() {
		let (mut m, mut scene) = machine();
		m.handle(Event::PointerEnter(NodeId(1)), &mut scene);
		m.handle(Event::PointerLeave, &mut scene);
		m.handle(Event::Advance(100.0), &mut scene);
		assert_eq!(m.hovered(), Some(NodeId(1)));
		m.handle(Event::Advance(20.0), &mut scene);
		assert_eq!(m.focus(), Focus::Idle);
		assert!(scene.pinned.is_empty());
	}

	#[test]
	fn reentering_before_debounce_cancels_clear() {
		let (mut m, mut scene) = machine();
		m.handle(Event::PointerEnter(NodeId(1)), &mut scene);
		m.handle(Event::PointerLeave, &mut scene);
		m.handle(Event::Advance(60.0), &mut scene);
		m.handle(Event::PointerEnter(NodeId(2)), &mut scene);
		m.handle(Event::Advance(500.0), &mut scene);
		assert_eq!(m.hovered(), Some(NodeId(2)));
	}

	#[test]
	fn click_locks_selects_and_focuses() {
		let (mut m, mut scene) = machine();
		m.handle(Event::PointerEnter(NodeId(1)), &mut scene);
		m.handle(Event::Click(NodeId(1)), &mut scene);
		assert_eq!(m.locked(), Some(NodeId(1)));
		assert_eq!(m.selected(), Some(NodeId(1)));
		assert_eq!(scene.centered, Some((10.0, 0.0)));
		assert_eq!(scene.zoom, 4.0);
		assert_eq!(scene.pinned.len(), 1);
	}

	#[test]
	fn lock_gates_to_neighborhood_regardless_of_query() {
		let (mut m, mut scene) = machine();
		m.handle(Event::Click(NodeId(1)), &mut scene);
		assert!(m.is_interactive(NodeId(1)));
		assert!(m.is_interactive(NodeId(2)));
		assert!(!m.is_interactive(NodeId(3)));
		assert!(!m.is_interactive(NodeId(4)));
	}

	#[test]
	fn lock_suppresses_hover() {
		let (mut m, mut scene) = machine();
		m.handle(Event::Click(NodeId(1)), &mut scene);
		m.handle(Event::PointerEnter(NodeId(2)), &mut scene);
		assert_eq!(m.focus(), Focus::Locked(NodeId(1)));
		assert_eq!(m.pinned(), Some(NodeId(1)));
		m.handle(Event::PointerLeave, &mut scene);
		m.handle(Event::Advance(1000.0), &mut scene);
		assert_eq!(m.focus(), Focus::Locked(NodeId(1)));
	}

	#[test]
	fn entering_gated_node_while_locked_keeps_lock_pin() {
		let (mut m, mut scene) = machine();
		m.handle(Event::Click(NodeId(1)), &mut scene);
		m.handle(Event::PointerEnter(NodeId(4)), &mut scene);
		assert!(scene.pinned.contains(&NodeId(1)));
		assert_eq!(m.locked(), Some(NodeId(1)));
	}

	#[test]
	fn click_on_gated_node_is_noop() {
		let (mut m, mut scene) = machine();
		m.handle(Event::Click(NodeId(1)), &mut scene);
		m.handle(Event::Click(NodeId(4)), &mut scene);
		assert_eq!(m.locked(), Some(NodeId(1)));
	}

	#[test]
	fn background_click_resets_everything() {
		let (mut m, mut scene) = machine();
		m.handle(Event::Click(NodeId(2)), &mut scene);
		m.handle(Event::BackgroundClick, &mut scene);
		assert_eq!(m.focus(), Focus::Idle);
		assert!(m.selected().is_none());
		assert!(scene.pinned.is_empty());
		assert_eq!(scene.fits, 1);
		m.handle(Event::Escape, &mut scene);
		assert_eq!(scene.fits, 2);
	}

	#[test]
	fn search_gates_to_matches_and_hover_neighbors() {
		let (mut m, mut scene) = machine();
		m.handle(Event::QueryChange("alignment".into()), &mut scene);
		assert!(m.is_interactive(NodeId(1)));
		assert!(m.is_interactive(NodeId(4)));
		assert!(!m.is_interactive(NodeId(2)));
		assert_eq!(m.emphasis(NodeId(2)), Emphasis::Muted);
		assert_eq!(m.emphasis(NodeId(4)), Emphasis::Normal);

		m.handle(Event::PointerEnter(NodeId(1)), &mut scene);
		assert!(m.is_interactive(NodeId(2)));
		assert!(!m.is_interactive(NodeId(3)));
	}

	#[test]
	fn hovering_non_match_arms_clear_instead_of_hovering() {
		let (mut m, mut scene) = machine();
		m.handle(Event::QueryChange("alignment".into()), &mut scene);
		m.handle(Event::PointerEnter(NodeId(4)), &mut scene);
		m.handle(Event::PointerEnter(NodeId(3)), &mut scene);
		assert_eq!(m.hovered(), Some(NodeId(4)));
		assert!(scene.pinned.is_empty());
		assert!(m.hover_clear_pending());
		m.handle(Event::Advance(120.0), &mut scene);
		assert_eq!(m.focus(), Focus::Idle);
	}

	#[test]
	fn query_change_clears_lock_first() {
		let (mut m, mut scene) = machine();
		m.handle(Event::Click(NodeId(2)), &mut scene);
		m.handle(Event::QueryChange("reward".into()), &mut scene);
		assert!(m.locked().is_none());
		assert!(scene.pinned.is_empty());
		assert_eq!(m.query(), "reward");
		assert!(m.matches().contains(&NodeId(3)));
	}

	#[test]
	fn pick_ignores_search_gating() {
		let (mut m, mut scene) = machine();
		m.handle(Event::QueryChange("survey alignment".into()), &mut scene);
		assert!(!m.is_interactive(NodeId(1)));
		m.handle(Event::Pick(NodeId(1)), &mut scene);
		assert_eq!(m.selected(), Some(NodeId(1)));
		m.handle(Event::Pick(NodeId(99)), &mut scene);
		assert_eq!(m.selected(), Some(NodeId(1)));
	}

	#[test]
	fn clear_search_empties_query_and_resets() {
		let (mut m, mut scene) = machine();
		m.handle(Event::QueryChange("alignment".into()), &mut scene);
		m.handle(Event::PointerEnter(NodeId(1)), &mut scene);
		m.clear_search(&mut scene);
		assert_eq!(m.query(), "");
		assert!(m.matches().is_empty());
		assert_eq!(m.focus(), Focus::Idle);
		assert!(scene.pinned.is_empty());
		assert_eq!(scene.fits, 1);
	}

	#[test]
	fn clear_search_while_locked_fits_once() {
		let (mut m, mut scene) = machine();
		m.handle(Event::QueryChange("alignment".into()), &mut scene);
		m.handle(Event::Click(NodeId(1)), &mut scene);
		assert_eq!(m.locked(), Some(NodeId(1)));
		scene.fits = 0;
		m.clear_search(&mut scene);
		assert_eq!(m.query(), "");
		assert!(m.locked().is_none());
		assert!(scene.pinned.is_empty());
		assert_eq!(scene.fits, 1);
	}

	#[test]
	fn snapshot_reflects_state() {
		let (mut m, mut scene) = machine();
		m.handle(Event::PointerEnter(NodeId(3)), &mut scene);
		let snap = m.snapshot();
		assert_eq!(snap.hover, Some(NodeId(3)));
		assert_eq!(snap.active(), Some(NodeId(3)));
		m.handle(Event::Click(NodeId(2)), &mut scene);
		let snap = m.snapshot();
		assert_eq!(snap.hover, None);
		assert_eq!(snap.locked, Some(NodeId(2)));
		assert_eq!(snap.selected, Some(NodeId(2)));
	}
}
