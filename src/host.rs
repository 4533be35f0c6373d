//! Configuration and embedded data read from the host page.

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

use crate::engine::{ConfigError, ExplorerConfig};

/// `<script type="application/json">` holding an [`ExplorerConfig`].
pub const CONFIG_SCRIPT_ID: &str = "explorer-config";
/// `<script type="application/json">` holding the graph dataset inline.
pub const GRAPH_SCRIPT_ID: &str = "graph-data";

/// Text of the script element with `id`, if present and non-blank.
pub fn inline_script(id: &str) -> Option<String> {
	let element = web_sys::window()?.document()?.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let text = script.text().ok()?;
	if text.trim().is_empty() {
		debug!("#{id} is empty");
		return None;
	}
	Some(text)
}

/// Page configuration, or the defaults plus the reason the block was rejected.
pub fn load_config() -> (ExplorerConfig, Option<ConfigError>) {
	match inline_script(CONFIG_SCRIPT_ID) {
		None => (ExplorerConfig::default(), None),
		Some(json) => match ExplorerConfig::from_json(&json) {
			Ok(config) => (config, None),
			Err(err) => (ExplorerConfig::default(), Some(err)),
		},
	}
}
