//! Camera focus on a single node.

use super::scene::Scene;
use super::types::NodeId;

/// Centers the camera on a node and zooms in, never out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusController {
	pub zoom_level: f64,
	pub duration_ms: f64,
}

impl Default for FocusController {
	fn default() -> Self {
		Self {
			zoom_level: 4.0,
			duration_ms: 600.0,
		}
	}
}

impl FocusController {
	pub fn new(zoom_level: f64, duration_ms: f64) -> Self {
		Self {
			zoom_level,
			duration_ms,
		}
	}

	/// Focuses `id` with the controller's defaults.
	pub fn focus(&self, id: NodeId, scene: &mut dyn Scene) -> bool {
		self.focus_with(id, self.zoom_level, self.duration_ms, scene)
	}

	/// Pans to `id` and sets zoom to `max(current, zoom_level)`. Returns `false`
	/// without touching the camera when the node has no position yet or no
	/// camera is attached.
	pub fn focus_with(&self, id: NodeId, zoom_level: f64, duration_ms: f64, scene: &mut dyn Scene) -> bool {
		let Some(current) = scene.zoom() else {
			return false;
		};
		let Some((x, y)) = scene.node_position(id) else {
			return false;
		};
		scene.center_at(x, y, duration_ms);
		scene.zoom_to(current.max(zoom_level), duration_ms);
		true
	}
}
