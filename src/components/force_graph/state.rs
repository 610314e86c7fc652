use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::GraphData;
use crate::graph::Extent;

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

pub const NODE_RADIUS: f64 = 5.0;
pub const HIT_RADIUS: f64 = 12.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: usize,
	pub label: String,
	pub color: String,
	pub selected: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, f64>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	/// Fades from 0 to 1 while a selection is shown.
	pub highlight_t: f64,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	link_strength_extent: Option<Extent>,
}

fn simulation() -> ForceGraph<NodeInfo, f64> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

/// Stable palette entry per group name.
fn group_color(group: &str) -> &'static str {
	let hash = group
		.bytes()
		.fold(0usize, |hash, byte| hash.wrapping_mul(31).wrapping_add(byte as usize));
	COLORS[hash % COLORS.len()]
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph: simulation(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			highlight_t: 0.0,
			width,
			height,
			animation_running: true,
			link_strength_extent: None,
		};
		state.sync(data);
		state
	}

	/// Rebuilds the simulation from a new broadcast. Nodes that were already
	/// shown keep their position and pinning.
	pub fn sync(&mut self, data: &GraphData) {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.data.user_data.id, (node.x(), node.y(), node.data.is_anchor));
		});

		let mut graph = simulation();
		let mut id_to_idx = HashMap::new();
		for (i, node) in data.nodes.iter().enumerate() {
			let (x, y, is_anchor) = positions.get(&node.id).copied().unwrap_or_else(|| {
				let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
				(
					(100.0 * angle.cos()) as f32,
					(100.0 * angle.sin()) as f32,
					false,
				)
			});
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo {
					id: node.id,
					label: node.label.clone(),
					color: group_color(&node.group).into(),
					selected: node.selected,
				},
			});
			id_to_idx.insert(node.id, idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&link.source), id_to_idx.get(&link.target)) {
				graph.add_edge(src, tgt, EdgeData { user_data: link.value });
			}
		}

		self.graph = graph;
		self.link_strength_extent = data.link_strength_extent;
		// indices of the old simulation are meaningless now
		self.drag = DragState::default();
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	/// Graph node id under a screen position.
	pub fn node_id_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let idx = self.node_at_position(sx, sy)?;
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id);
			}
		});
		id
	}

	/// Link strength mapped onto `0..=1` over the source's strength range.
	pub fn relative_strength(&self, value: f64) -> f64 {
		match self.link_strength_extent {
			Some(Extent { min, max }) if max > min => ((value - min) / (max - min)).clamp(0.0, 1.0),
			_ => 0.5,
		}
	}

	pub fn has_selection(&self) -> bool {
		let mut any = false;
		self.graph.visit_nodes(|node| any |= node.data.user_data.selected);
		any
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);

		let target = if self.has_selection() { 1.0 } else { 0.0 };
		self.highlight_t += (target - self.highlight_t) * 1.8 * dt as f64;
		if target == 0.0 && self.highlight_t < 0.01 {
			self.highlight_t = 0.0;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
