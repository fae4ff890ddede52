use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::warn;

use super::palette::{ColorBy, Palette};
use super::scale::zoom_step;
use super::types::GraphData;

pub const HIT_RADIUS: f64 = 12.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub color: &'static str,
}

#[derive(Clone, Debug)]
pub struct LinkInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub source_id: String,
	pub target_id: String,
	pub label: String,
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

/// Simulation plus view state for one mounted canvas.
///
/// Positions belong to the physics engine; everything else here is view bookkeeping.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub links: Vec<LinkInfo>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, color_by: ColorBy, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.7,
		});
		let palette = Palette::for_taxonomy(color_by);
		let mut id_to_idx = HashMap::new();
		let mut links = Vec::new();

		for (i, node) in data.nodes.iter().enumerate() {
			if id_to_idx.contains_key(&node.id) {
				warn!("duplicate node id '{}' in graph data", node.id);
				continue;
			}
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let idx = graph.add_node(NodeData {
				x: (100.0 * angle.cos()) as f32,
				y: (100.0 * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label().to_string(),
					color: palette.color(node.category(color_by)),
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			match (id_to_idx.get(&link.source), id_to_idx.get(&link.target)) {
				(Some(&source), Some(&target)) => {
					graph.add_edge(source, target, EdgeData::default());
					links.push(LinkInfo {
						source,
						target,
						source_id: link.source.clone(),
						target_id: link.target.clone(),
						label: link.label.clone(),
					});
				}
				_ => warn!(
					"skipping link {}->{}: unknown endpoint",
					link.source,
					link.target
				),
			}
		}

		Self {
			graph,
			links,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			animation_running: true,
		}
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

	/// Current node positions keyed by node index.
	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	/// Mouse down: grab the node under the cursor, or start panning.
	pub fn press(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.node_at_position(x, y) {
			self.drag.active = true;
			self.drag.node_idx = Some(idx);
			self.drag.start_x = x;
			self.drag.start_y = y;
			let drag = &mut self.drag;
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					drag.node_start_x = node.x();
					drag.node_start_y = node.y();
				}
			});
		} else {
			self.pan.active = true;
			self.pan.start_x = x;
			self.pan.start_y = y;
			self.pan.transform_start_x = self.transform.x;
			self.pan.transform_start_y = self.transform.y;
		}
	}

	pub fn move_to(&mut self, x: f64, y: f64) {
		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let (dx, dy) = (
					(x - self.drag.start_x) / self.transform.k,
					(y - self.drag.start_y) / self.transform.k,
				);
				let (nx, ny) = (
					self.drag.node_start_x + dx as f32,
					self.drag.node_start_y + dy as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	/// Mouse up or leave. A dragged node stays pinned where it was dropped.
	pub fn release(&mut self) {
		self.drag.active = false;
		self.drag.node_idx = None;
		self.pan.active = false;
	}

	/// Wheel zoom keeping the point under the cursor fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let new_k = zoom_step(self.transform.k, delta_y);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	/// Keeps the graph centred when the surface changes size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::palette::FALLBACK_COLOR;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn node(id: &str, kind: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			name: format!("{} name", id),
			kind: Some(kind.into()),
			knowledge_source: None,
			group: None,
		}
	}

	fn link(source: &str, target: &str) -> GraphLink {
		GraphLink {
			source: source.into(),
			target: target.into(),
			label: "binds".into(),
			confidence: 0.7,
		}
	}

	fn sample() -> GraphData {
		GraphData {
			nodes: vec![node("A", "drug"), node("B", "protein"), node("C", "gene")],
			links: vec![link("A", "B"), link("B", "C"), link("C", "Z")],
		}
	}

	#[test]
	fn builds_nodes_and_skips_dangling_links() {
		let state = ForceGraphState::new(&sample(), ColorBy::EntityType, 800.0, 600.0);
		assert_eq!(state.positions().len(), 3);
		assert_eq!(state.links.len(), 2);
		assert_eq!(state.links[0].source_id, "A");
	}

	#[test]
	fn colors_come_from_palette_with_fallback() {
		let state = ForceGraphState::new(&sample(), ColorBy::EntityType, 800.0, 600.0);
		let mut colors = HashMap::new();
		state.graph.visit_nodes(|n| {
			colors.insert(n.data.user_data.id.clone(), n.data.user_data.color);
		});
		assert_eq!(colors["A"], "#3B82F6");
		assert_eq!(colors["C"], FALLBACK_COLOR);
	}

	#[test]
	fn duplicate_ids_are_kept_once() {
		let mut data = sample();
		data.nodes.push(node("A", "drug"));
		let state = ForceGraphState::new(&data, ColorBy::EntityType, 800.0, 600.0);
		assert_eq!(state.positions().len(), 3);
	}

	#[test]
	fn resize_tracks_surface_and_recentres() {
		let mut state = ForceGraphState::new(&sample(), ColorBy::EntityType, 800.0, 600.0);
		state.resize(1000.0, 600.0);
		assert_eq!(state.width, 1000.0);
		assert_eq!(state.transform.x, 500.0);
	}

	#[test]
	fn zoom_keeps_cursor_point_fixed() {
		let mut state = ForceGraphState::new(&sample(), ColorBy::EntityType, 800.0, 600.0);
		let before = state.screen_to_graph(100.0, 100.0);
		state.zoom_at(100.0, 100.0, -1.0);
		let after = state.screen_to_graph(100.0, 100.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
		assert!(state.transform.k > 1.0);
	}

	#[test]
	fn background_press_pans() {
		let mut state = ForceGraphState::new(&sample(), ColorBy::EntityType, 800.0, 600.0);
		state.press(5.0, 5.0);
		assert!(state.pan.active);
		state.move_to(25.0, 15.0);
		assert_eq!(state.transform.x, 420.0);
		assert_eq!(state.transform.y, 310.0);
		state.release();
		assert!(!state.pan.active);
	}
}
