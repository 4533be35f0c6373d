use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{Camera, CameraPose, MAX_ZOOM, MIN_ZOOM, NodeInfo, PanState, ViewTransform};
use crate::engine::types::PLACEHOLDER_CLUSTER;
use crate::engine::{ClusterId, Graph, NodeId, Scene};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#bcbd22",
	"#17becf", "#aec7e8",
];
const PLACEHOLDER_COLOR: &str = "#7f7f7f";
const LABEL_CHARS: usize = 48;

pub const NODE_RADIUS: f64 = 5.0;
pub const HIT_RADIUS: f64 = 12.0;

pub fn cluster_color(cluster: ClusterId) -> &'static str {
	if cluster == PLACEHOLDER_CLUSTER {
		return PLACEHOLDER_COLOR;
	}
	COLORS[cluster.rem_euclid(COLORS.len() as i64) as usize]
}

fn short_label(title: &str) -> String {
	if title.chars().count() <= LABEL_CHARS {
		return title.to_owned();
	}
	let mut label: String = title.chars().take(LABEL_CHARS - 1).collect();
	label.push('…');
	label
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub camera: Camera,
	pub pan: PanState,
	/// Node under the pointer as last reported to the interaction machine.
	pub pointer_over: Option<NodeId>,
	pub highlight_t: f64,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	delay_t: f64,
}

impl ForceGraphState {
	pub fn new(data: &Graph, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let canvas = &data.meta.coords.canvas;
		let total = data.nodes().len().max(1) as f64;
		let ring = 100.0_f64.max(total.sqrt() * 12.0);
		let mut index = std::collections::HashMap::with_capacity(data.nodes().len());

		for (i, node) in data.nodes().iter().enumerate() {
			// Exported coordinates are in canvas units; the layout is centered on the origin.
			let (x, y) = node
				.position
				.map(|(x, y)| (x - canvas.w / 2.0, y - canvas.h / 2.0))
				.unwrap_or_else(|| {
					let angle = (i as f64) * 2.0 * PI / total;
					(ring * angle.cos(), ring * angle.sin())
				});
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id,
					label: short_label(&node.title),
					color: cluster_color(node.cluster),
				},
			});
			index.insert(node.id, idx);
		}

		for link in data.links() {
			if let (Some(&src), Some(&tgt)) = (index.get(&link.source), index.get(&link.target)) {
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		Self {
			graph,
			camera: Camera::default(),
			pan: PanState::default(),
			pointer_over: None,
			highlight_t: 0.0,
			width,
			height,
			animation_running: true,
			delay_t: 0.0,
		}
	}

	pub fn transform(&self) -> ViewTransform {
		self.camera.transform(self.width, self.height)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		let t = self.transform();
		((sx - t.x) / t.k, (sy - t.y) / t.k)
	}

	/// Nearest node under the pointer among those `interactive` accepts.
	/// Gated nodes are invisible to the pointer.
	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		interactive: impl Fn(NodeId) -> bool,
	) -> Option<NodeId> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut best: Option<(f64, NodeId)> = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let dist = (dx * dx + dy * dy).sqrt();
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if dist >= HIT_RADIUS {
				return;
			}
			let id = node.data.user_data.id;
			if !interactive(id) {
				return;
			}
			if best.is_none_or(|(d, _)| dist < d) {
				best = Some((dist, id));
			}
		});
		best.map(|(_, id)| id)
	}

	fn set_anchor(&mut self, id: NodeId, anchor: bool) {
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data.id == id {
				node.data.is_anchor = anchor;
			}
		});
	}

	/// Graph-space bounding box of every node.
	pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				None => (x, y, x, y),
				Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
			});
		});
		bounds
	}

	pub fn tick(&mut self, dt: f32, has_active: bool) {
		if self.animation_running {
			self.graph.update(dt);
		}
		self.camera.advance(dt as f64 * 1000.0);

		let dt = dt as f64;
		let (target, delay, speed) = if has_active {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if has_active {
			self.delay_t = (self.delay_t + dt).min(delay);
			if self.delay_t >= delay {
				self.highlight_t += (target - self.highlight_t) * speed * dt;
			}
		} else {
			self.delay_t = 0.0;
			self.highlight_t += (target - self.highlight_t) * speed * dt;
			if self.highlight_t < 0.01 {
				self.highlight_t = 0.0;
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Wheel zoom keeping the graph point under `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let pose = self.camera.pose();
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let k = (pose.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		self.camera.jump(CameraPose {
			cx: gx - (sx - self.width / 2.0) / k,
			cy: gy - (sy - self.height / 2.0) / k,
			k,
		});
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		let pose = self.camera.pose();
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: sx,
			start_y: sy,
			center_start_x: pose.cx,
			center_start_y: pose.cy,
		};
	}

	/// Drags the view while a pan is active. Returns whether the pointer has
	/// moved past the click threshold.
	pub fn pan_to(&mut self, sx: f64, sy: f64) -> bool {
		if !self.pan.active {
			return false;
		}
		let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
		if !self.pan.moved && (dx * dx + dy * dy).sqrt() < 4.0 {
			return false;
		}
		self.pan.moved = true;
		let k = self.camera.pose().k;
		self.camera.jump(CameraPose {
			cx: self.pan.center_start_x - dx / k,
			cy: self.pan.center_start_y - dy / k,
			k,
		});
		true
	}
}

impl Scene for ForceGraphState {
	fn node_position(&self, id: NodeId) -> Option<(f64, f64)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.data.user_data.id == id {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	fn pin(&mut self, id: NodeId) {
		self.set_anchor(id, true);
	}

	fn unpin(&mut self, id: NodeId) {
		self.set_anchor(id, false);
	}

	fn zoom(&self) -> Option<f64> {
		Some(self.camera.pose().k)
	}

	fn center_at(&mut self, x: f64, y: f64, duration_ms: f64) {
		let k = self.camera.target().k;
		self.camera.animate_to(CameraPose { cx: x, cy: y, k }, duration_ms);
	}

	fn zoom_to(&mut self, k: f64, duration_ms: f64) {
		let target = self.camera.target();
		self.camera.animate_to(CameraPose { k, ..target }, duration_ms);
	}

	fn zoom_to_fit(&mut self, duration_ms: f64, padding: f64) {
		let Some((x0, y0, x1, y1)) = self.bounds() else {
			return;
		};
		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let (aw, ah) = (
			(self.width - 2.0 * padding).max(1.0),
			(self.height - 2.0 * padding).max(1.0),
		);
		let k = (aw / bw).min(ah / bh);
		self.camera.animate_to(
			CameraPose {
				cx: (x0 + x1) / 2.0,
				cy: (y0 + y1) / 2.0,
				k,
			},
			duration_ms,
		);
	}
}
