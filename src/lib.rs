//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod engine;
pub mod fetch;
pub mod host;

// Modules
mod components;
mod pages;

use crate::components::detail_panel::SummaryStore;
use crate::engine::ExplorerConfig;
// Top-Level pages
use crate::pages::compact::Compact;
use crate::pages::home::Home;
use crate::pages::loader::use_graph;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging(level: Level) {
	let _ = console_log::init_with_level(level);
	console_error_panic_hook::set_once();
	info!("Logging initialized at {level}");
}

/// An app router for the desktop and compact surfaces. The graph and summary
/// datasets are loaded once here and shared by both.
#[component]
pub fn App(#[prop(optional)] config: ExplorerConfig) -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(SummaryStore::new(&config.summaries_url));
	provide_context(use_graph(&config));
	provide_context(config);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Paper Graph Explorer" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/compact") view=Compact />
			</Routes>
		</Router>
	}
}
