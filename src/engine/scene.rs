//! What the engine needs from the layout and camera it drives.

use super::types::NodeId;

/// Layout and camera collaborator. Implemented by the canvas; the engine never
/// owns node coordinates.
pub trait Scene {
	/// Current layout coordinates of `id`, if it has been laid out.
	fn node_position(&self, id: NodeId) -> Option<(f64, f64)>;

	/// Fixes `id` in place so the physics stops moving it.
	fn pin(&mut self, id: NodeId);

	/// Releases a node fixed by [`Scene::pin`].
	fn unpin(&mut self, id: NodeId);

	/// Current zoom factor, or `None` while no camera is attached.
	fn zoom(&self) -> Option<f64>;

	/// Pans so graph point `(x, y)` is centered, over `duration_ms`.
	fn center_at(&mut self, x: f64, y: f64, duration_ms: f64);

	/// Animates the zoom factor to `k`, keeping the view center fixed.
	fn zoom_to(&mut self, k: f64, duration_ms: f64);

	/// Fits the whole graph with `padding` screen units around it.
	fn zoom_to_fit(&mut self, duration_ms: f64, padding: f64);
}

/// Stand-in used before the canvas has mounted: nothing is laid out and there
/// is no camera.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedScene;

impl Scene for DetachedScene {
	fn node_position(&self, _id: NodeId) -> Option<(f64, f64)> {
		None
	}

	fn pin(&mut self, _id: NodeId) {}

	fn unpin(&mut self, _id: NodeId) {}

	fn zoom(&self) -> Option<f64> {
		None
	}

	fn center_at(&mut self, _x: f64, _y: f64, _duration_ms: f64) {}

	fn zoom_to(&mut self, _k: f64, _duration_ms: f64) {}

	fn zoom_to_fit(&mut self, _duration_ms: f64, _padding: f64) {}
}
