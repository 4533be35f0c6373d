//! Copyable handle tying the interaction machine to the mounted canvas.
//!
//! Views never touch the machine directly. They send events through the
//! handle and read the published [`InteractionSnapshot`] signal.

use std::cell::RefCell;
use std::sync::Arc;

use leptos::prelude::*;
use leptos::{ev, html};
use log::debug;

use super::force_graph::ForceGraphState;
use crate::engine::keyboard::{self, KeyCommand, KeyInput};
use crate::engine::{
	DetachedScene, Event, Graph, InteractionMachine, InteractionSettings, InteractionSnapshot,
	NodeId, Scene,
};

struct Inner {
	machine: RefCell<InteractionMachine>,
	canvas: RefCell<Option<ForceGraphState>>,
}

#[derive(Clone, Copy)]
pub struct Explorer {
	graph: StoredValue<Arc<Graph>>,
	inner: StoredValue<Inner, LocalStorage>,
	snapshot: RwSignal<InteractionSnapshot>,
	search_input: NodeRef<html::Input>,
}

impl Explorer {
	pub fn new(graph: Arc<Graph>, settings: InteractionSettings) -> Self {
		let machine = InteractionMachine::new(graph.clone(), settings);
		Self {
			graph: StoredValue::new(graph),
			inner: StoredValue::new_local(Inner {
				machine: RefCell::new(machine),
				canvas: RefCell::new(None),
			}),
			snapshot: RwSignal::new(InteractionSnapshot::default()),
			search_input: NodeRef::new(),
		}
	}

	pub fn graph(&self) -> Arc<Graph> {
		self.graph.get_value()
	}

	pub fn snapshot(&self) -> ReadSignal<InteractionSnapshot> {
		self.snapshot.read_only()
	}

	pub fn search_input(&self) -> NodeRef<html::Input> {
		self.search_input
	}

	/// False once the owning view has been torn down.
	pub fn is_alive(&self) -> bool {
		self.inner.try_with_value(|_| ()).is_some()
	}

	fn publish(&self, snapshot: InteractionSnapshot) {
		if self.snapshot.with_untracked(|current| current != &snapshot) {
			self.snapshot.set(snapshot);
		}
	}

	/// Applies `event`, against the canvas when one is mounted.
	pub fn dispatch(&self, event: Event) {
		let snapshot = self.inner.try_with_value(|inner| {
			let mut machine = inner.machine.borrow_mut();
			let mut canvas = inner.canvas.borrow_mut();
			match canvas.as_mut() {
				Some(scene) => machine.handle(event, scene),
				None => machine.handle(event, &mut DetachedScene),
			}
			machine.snapshot()
		});
		match snapshot {
			Some(snapshot) => self.publish(snapshot),
			None => debug!("event after teardown ignored"),
		}
	}

	pub fn pick(&self, id: NodeId) {
		self.dispatch(Event::Pick(id));
	}

	pub fn set_query(&self, query: String) {
		self.dispatch(Event::QueryChange(query));
	}

	pub fn clear_search(&self) {
		let snapshot = self.inner.try_with_value(|inner| {
			let mut machine = inner.machine.borrow_mut();
			let mut canvas = inner.canvas.borrow_mut();
			match canvas.as_mut() {
				Some(scene) => machine.clear_search(scene),
				None => machine.clear_search(&mut DetachedScene),
			}
			machine.snapshot()
		});
		if let Some(snapshot) = snapshot {
			self.publish(snapshot);
		}
	}

	pub fn run(&self, command: KeyCommand) {
		match command {
			KeyCommand::FocusSearch => {
				if let Some(input) = self.search_input.get_untracked() {
					let _ = input.focus();
					input.select();
				}
			}
			KeyCommand::ClearSearch => self.clear_search(),
			KeyCommand::Deselect => self.dispatch(Event::Escape),
		}
	}

	/// Hands the laid-out canvas to the machine, re-applying any pin made
	/// before it mounted, and fits the camera.
	pub fn attach(&self, mut state: ForceGraphState) {
		let attached = self.inner.try_with_value(|inner| {
			let machine = inner.machine.borrow();
			if let Some(id) = machine.pinned() {
				state.pin(id);
			}
			let settings = machine.settings();
			state.zoom_to_fit(0.0, settings.fit_padding);
			*inner.canvas.borrow_mut() = Some(state);
		});
		if attached.is_none() {
			debug!("canvas mounted after teardown");
		}
	}

	/// Runs `f` against the machine and the mounted canvas, then publishes
	/// the resulting state. `None` when nothing is mounted.
	pub fn with_canvas<R>(
		&self,
		f: impl FnOnce(&mut InteractionMachine, &mut ForceGraphState) -> R,
	) -> Option<R> {
		let out = self.inner.try_with_value(|inner| {
			let mut machine = inner.machine.borrow_mut();
			let mut canvas = inner.canvas.borrow_mut();
			let scene = canvas.as_mut()?;
			let out = f(&mut machine, scene);
			Some((out, machine.snapshot()))
		})??;
		self.publish(out.1);
		Some(out.0)
	}
}

fn editable(element: &web_sys::Element) -> bool {
	matches!(element.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
		|| element
			.get_attribute("contenteditable")
			.is_some_and(|value| value != "false")
}

/// Installs the window-level accelerators for `explorer` until the current
/// owner is cleaned up.
pub fn use_keyboard_shortcuts(explorer: Explorer) {
	let handle = window_event_listener(ev::keydown, move |event: web_sys::KeyboardEvent| {
		let active = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.active_element());
		let search_focused = match (active.as_ref(), explorer.search_input.get_untracked()) {
			(Some(element), Some(input)) => {
				let input: &web_sys::Element = input.as_ref();
				element == input
			}
			_ => false,
		};
		let input = KeyInput {
			key: event.key(),
			modifier: event.ctrl_key() || event.meta_key(),
			search_focused,
			editable_focused: active.as_ref().is_some_and(editable),
			has_query: explorer.snapshot.with_untracked(|s| !s.query.is_empty()),
		};
		if let Some(command) = keyboard::interpret(&input) {
			debug!("key {:?} -> {:?}", input.key, command);
			event.prevent_default();
			explorer.run(command);
		}
	});
	on_cleanup(move || handle.remove());
}
