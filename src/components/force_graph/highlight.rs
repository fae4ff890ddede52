//! Highlight overlay for the top discovered path, and the paint rules that consume it.
//!
//! The overlay is a pure rendering predicate: nothing here touches the graph itself.

use std::collections::HashSet;

use super::palette::HIGHLIGHT_COLOR;
use crate::discovery::TopPath;

/// Radius of an ordinary node in graph units.
pub const NODE_RADIUS: f64 = 5.0;
/// Opacity of everything off the path while an overlay is shown.
pub const DIMMED_ALPHA: f64 = 0.25;
/// Stroke of ordinary links.
pub const LINK_COLOR: &str = "#9CA3AF";

/// `"source->target"`.
pub fn edge_key(source: &str, target: &str) -> String {
	format!("{}->{}", source, target)
}

fn normalize_edge_key(key: &str) -> Option<String> {
	let (source, target) = key.split_once("->")?;
	let (source, target) = (source.trim(), target.trim());
	(!source.is_empty() && !target.is_empty()).then(|| edge_key(source, target))
}

/// Nodes and edges of one path to emphasise.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightPath {
	node_ids: HashSet<String>,
	edge_keys: HashSet<String>,
}

impl HighlightPath {
	/// Path from node ids and `source->target` keys; malformed keys are skipped.
	pub fn new<N, E>(node_ids: N, edge_keys: E) -> Self
	where
		N: IntoIterator,
		N::Item: Into<String>,
		E: IntoIterator,
		E::Item: AsRef<str>,
	{
		Self {
			node_ids: node_ids.into_iter().map(Into::into).collect(),
			edge_keys: edge_keys
				.into_iter()
				.filter_map(|k| normalize_edge_key(k.as_ref()))
				.collect(),
		}
	}

	/// Overlay for a discovered path.
	pub fn from_top_path(path: &TopPath) -> Self {
		Self::new(path.node_ids.iter().cloned(), &path.edges)
	}

	/// No nodes and no edges.
	pub fn is_empty(&self) -> bool {
		self.node_ids.is_empty() && self.edge_keys.is_empty()
	}

	/// Whether node `id` is on the path.
	pub fn contains_node(&self, id: &str) -> bool {
		self.node_ids.contains(id)
	}

	/// Direction-agnostic: `A->B` matches a link from `B` to `A` too.
	pub fn contains_link(&self, source: &str, target: &str) -> bool {
		self.edge_keys.contains(&edge_key(source, target))
			|| self.edge_keys.contains(&edge_key(target, source))
	}
}

/// Whether an overlay is in effect at all.
pub fn overlay_active(path: Option<&HighlightPath>) -> bool {
	path.is_some_and(|p| !p.is_empty())
}

/// How to draw one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodePaint {
	/// Radius in graph units.
	pub radius: f64,
	/// Fill.
	pub color: &'static str,
	/// Opacity.
	pub alpha: f64,
	/// Draw a halo behind the node.
	pub glow: bool,
}

/// Paint for a node given its category color and whether it is on the shown path.
pub fn node_paint(
	category_color: &'static str,
	highlighted: bool,
	overlay_active: bool,
) -> NodePaint {
	match (overlay_active, highlighted) {
		(true, true) => NodePaint {
			radius: NODE_RADIUS * 1.6,
			color: HIGHLIGHT_COLOR,
			alpha: 1.0,
			glow: true,
		},
		(true, false) => NodePaint {
			radius: NODE_RADIUS,
			color: category_color,
			alpha: DIMMED_ALPHA,
			glow: false,
		},
		(false, _) => NodePaint {
			radius: NODE_RADIUS,
			color: category_color,
			alpha: 1.0,
			glow: false,
		},
	}
}

/// Widths and arrow sizes are in screen pixels; the renderer divides by the zoom scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkPaint {
	/// Stroke width.
	pub width: f64,
	/// Stroke and arrowhead color.
	pub color: &'static str,
	/// Opacity.
	pub alpha: f64,
	/// Arrowhead length.
	pub arrow_size: f64,
	/// Draw the relationship label.
	pub show_label: bool,
}

/// Paint for a link. Labels of ordinary links appear from `label_threshold` zoom on.
pub fn link_paint(
	highlighted: bool,
	overlay_active: bool,
	scale: f64,
	label_threshold: f64,
) -> LinkPaint {
	if overlay_active && highlighted {
		return LinkPaint {
			width: 3.0,
			color: HIGHLIGHT_COLOR,
			alpha: 1.0,
			arrow_size: 10.0,
			show_label: true,
		};
	}
	LinkPaint {
		width: 1.0,
		color: LINK_COLOR,
		alpha: if overlay_active { DIMMED_ALPHA } else { 0.8 },
		arrow_size: 8.0,
		show_label: scale >= label_threshold,
	}
}
