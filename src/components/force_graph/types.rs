use crate::engine::NodeId;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Per-node payload carried through the physics simulation.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: NodeId,
	pub label: String,
	pub color: &'static str,
}

/// Screen-space offset and scale applied before drawing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	/// Set once the pointer travelled far enough that mouseup is not a click.
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub center_start_x: f64,
	pub center_start_y: f64,
}

/// Graph point at the middle of the viewport plus zoom factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
	pub cx: f64,
	pub cy: f64,
	pub k: f64,
}

impl Default for CameraPose {
	fn default() -> Self {
		Self {
			cx: 0.0,
			cy: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Copy, Debug)]
struct CameraTween {
	from: CameraPose,
	to: CameraPose,
	elapsed_ms: f64,
	duration_ms: f64,
}

/// Camera that eases between poses.
#[derive(Clone, Copy, Debug, Default)]
pub struct Camera {
	pose: CameraPose,
	tween: Option<CameraTween>,
}

impl Camera {
	pub fn pose(&self) -> CameraPose {
		self.pose
	}

	/// Where the camera will rest once the current tween finishes.
	pub fn target(&self) -> CameraPose {
		self.tween.map_or(self.pose, |t| t.to)
	}

	pub fn animate_to(&mut self, to: CameraPose, duration_ms: f64) {
		let to = CameraPose {
			k: to.k.clamp(MIN_ZOOM, MAX_ZOOM),
			..to
		};
		if duration_ms <= 0.0 {
			self.jump(to);
			return;
		}
		self.tween = Some(CameraTween {
			from: self.pose,
			to,
			elapsed_ms: 0.0,
			duration_ms,
		});
	}

	/// Moves immediately and drops any tween in progress.
	pub fn jump(&mut self, pose: CameraPose) {
		self.pose = pose;
		self.tween = None;
	}

	pub fn advance(&mut self, dt_ms: f64) {
		let Some(tween) = self.tween.as_mut() else {
			return;
		};
		tween.elapsed_ms += dt_ms;
		let p = (tween.elapsed_ms / tween.duration_ms).min(1.0);
		let e = ease_out_cubic(p);
		let (from, to) = (tween.from, tween.to);
		self.pose = CameraPose {
			cx: from.cx + (to.cx - from.cx) * e,
			cy: from.cy + (to.cy - from.cy) * e,
			k: from.k + (to.k - from.k) * e,
		};
		if p >= 1.0 {
			self.tween = None;
		}
	}

	pub fn transform(&self, width: f64, height: f64) -> ViewTransform {
		let CameraPose { cx, cy, k } = self.pose;
		ViewTransform {
			x: width / 2.0 - cx * k,
			y: height / 2.0 - cy * k,
			k,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tween_reaches_target_and_stops() {
		let mut camera = Camera::default();
		let to = CameraPose {
			cx: 100.0,
			cy: -50.0,
			k: 4.0,
		};
		camera.animate_to(to, 600.0);
		assert_eq!(camera.target(), to);
		camera.advance(300.0);
		let mid = camera.pose();
		assert!(mid.cx > 50.0 && mid.cx < 100.0);
		camera.advance(400.0);
		assert_eq!(camera.pose(), to);
		camera.advance(100.0);
		assert_eq!(camera.pose(), to);
	}

	#[test]
	fn zero_duration_jumps_and_zoom_is_clamped() {
		let mut camera = Camera::default();
		camera.animate_to(
			CameraPose {
				cx: 1.0,
				cy: 2.0,
				k: 50.0,
			},
			0.0,
		);
		assert_eq!(camera.pose().k, MAX_ZOOM);
		assert_eq!(camera.target(), camera.pose());
	}

	#[test]
	fn transform_centers_the_pose() {
		let mut camera = Camera::default();
		camera.jump(CameraPose {
			cx: 10.0,
			cy: 20.0,
			k: 2.0,
		});
		let t = camera.transform(800.0, 600.0);
		assert_eq!((t.x + 10.0 * t.k, t.y + 20.0 * t.k), (400.0, 300.0));
	}
}
