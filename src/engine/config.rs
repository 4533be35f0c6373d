//! Explorer configuration.
//!
//! Read from an optional inline JSON block in the host page. Every field has a
//! default, so an empty object (or no block at all) is a valid configuration.

use serde::{Deserialize, Serialize};

use super::adjacency::DanglingLinkPolicy;
use super::error::ConfigError;
use super::focus::FocusController;
use super::interaction::InteractionSettings;

/// The two rendering surfaces sharing one engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
	/// Full-window canvas with a search dropdown.
	Desktop,
	/// Ranked list with a small canvas.
	Compact,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
	/// Location of the graph dataset.
	pub graph_url: String,
	/// Location of the summary dataset.
	pub summaries_url: String,
	/// Result cap for the desktop search dropdown.
	pub dense_result_limit: usize,
	/// Result cap for the compact list.
	pub compact_result_limit: usize,
	pub desktop_focus_zoom: f64,
	pub compact_focus_zoom: f64,
	pub focus_duration_ms: f64,
	pub hover_clear_delay_ms: f64,
	pub fit_duration_ms: f64,
	pub fit_padding: f64,
	pub dangling_links: DanglingLinkPolicy,
	/// `log` level name for the browser console.
	pub log_level: String,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			graph_url: "force_graph.json".to_owned(),
			summaries_url: "summaries.json".to_owned(),
			dense_result_limit: 100,
			compact_result_limit: 200,
			desktop_focus_zoom: 4.0,
			compact_focus_zoom: 2.5,
			focus_duration_ms: 600.0,
			hover_clear_delay_ms: 120.0,
			fit_duration_ms: 400.0,
			fit_padding: 40.0,
			dangling_links: DanglingLinkPolicy::Skip,
			log_level: "debug".to_owned(),
		}
	}
}

impl ExplorerConfig {
	/// Parses and validates a configuration block.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let config: Self =
			serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.graph_url.trim().is_empty() {
			return Err(invalid("graph_url", "must not be empty"));
		}
		if self.summaries_url.trim().is_empty() {
			return Err(invalid("summaries_url", "must not be empty"));
		}
		if self.dense_result_limit == 0 {
			return Err(invalid("dense_result_limit", "must be greater than 0"));
		}
		if self.compact_result_limit == 0 {
			return Err(invalid("compact_result_limit", "must be greater than 0"));
		}
		for (field, zoom) in [
			("desktop_focus_zoom", self.desktop_focus_zoom),
			("compact_focus_zoom", self.compact_focus_zoom),
		] {
			if !(zoom.is_finite() && zoom > 0.0) {
				return Err(invalid(field, format!("must be a positive number, got {zoom}")));
			}
		}
		for (field, value) in [
			("focus_duration_ms", self.focus_duration_ms),
			("hover_clear_delay_ms", self.hover_clear_delay_ms),
			("fit_duration_ms", self.fit_duration_ms),
			("fit_padding", self.fit_padding),
		] {
			if !(value.is_finite() && value >= 0.0) {
				return Err(invalid(field, format!("must not be negative, got {value}")));
			}
		}
		Ok(())
	}

	pub fn result_limit(&self, surface: Surface) -> usize {
		match surface {
			Surface::Desktop => self.dense_result_limit,
			Surface::Compact => self.compact_result_limit,
		}
	}

	pub fn interaction_settings(&self, surface: Surface) -> InteractionSettings {
		let zoom = match surface {
			Surface::Desktop => self.desktop_focus_zoom,
			Surface::Compact => self.compact_focus_zoom,
		};
		InteractionSettings {
			hover_clear_delay_ms: self.hover_clear_delay_ms,
			focus: FocusController::new(zoom, self.focus_duration_ms),
			fit_duration_ms: self.fit_duration_ms,
			fit_padding: self.fit_padding,
		}
	}

	pub fn log_level(&self) -> log::Level {
		self.log_level.parse().unwrap_or(log::Level::Debug)
	}
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
	ConfigError::InvalidValue {
		field,
		message: message.into(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_object_yields_defaults() {
		let config = ExplorerConfig::from_json("{}").unwrap();
		assert_eq!(config, ExplorerConfig::default());
		assert_eq!(config.result_limit(Surface::Desktop), 100);
		assert_eq!(config.result_limit(Surface::Compact), 200);
	}

	#[test]
	fn surfaces_differ_only_in_zoom() {
		let config = ExplorerConfig::default();
		let desktop = config.interaction_settings(Surface::Desktop);
		let compact = config.interaction_settings(Surface::Compact);
		assert_eq!(desktop.focus.zoom_level, 4.0);
		assert_eq!(compact.focus.zoom_level, 2.5);
		assert_eq!(desktop.hover_clear_delay_ms, compact.hover_clear_delay_ms);
	}

	#[test]
	fn overrides_and_policy_parse() {
		let config = ExplorerConfig::from_json(
			r#"{"graph_url":"data/graph.json","dangling_links":"placeholder","log_level":"warn"}"#,
		)
		.unwrap();
		assert_eq!(config.graph_url, "data/graph.json");
		assert_eq!(config.dangling_links, DanglingLinkPolicy::Placeholder);
		assert_eq!(config.log_level(), log::Level::Warn);
	}

	#[test]
	fn rejects_invalid_values() {
		assert!(matches!(
			ExplorerConfig::from_json(r#"{"dense_result_limit":0}"#),
			Err(ConfigError::InvalidValue {
				field: "dense_result_limit",
				..
			})
		));
		assert!(matches!(
			ExplorerConfig::from_json(r#"{"compact_focus_zoom":-1.0}"#),
			Err(ConfigError::InvalidValue { .. })
		));
		assert!(matches!(
			ExplorerConfig::from_json(r#"{"hover_clear_delay_ms":-5}"#),
			Err(ConfigError::InvalidValue { .. })
		));
		assert!(matches!(
			ExplorerConfig::from_json("nope"),
			Err(ConfigError::Parse(_))
		));
	}
}
