//! Runtime configuration, read once at startup from `<meta name="discovery:*">` tags.

use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlMetaElement;

use crate::components::force_graph::ColorBy;

/// Knowledge graph snapshot.
pub const GRAPH_DATA_PATH: &str = "/api/graph-data";
/// Streamed discovery session.
pub const DISCOVER_STREAM_PATH: &str = "/api/discover-stream";
/// Publication upload and triplet extraction.
pub const UPLOAD_PUBLICATION_PATH: &str = "/api/upload-publication";

/// Settings shared through context by every component.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	/// Prefix for every API path; empty means same origin.
	pub api_base: String,
	/// Fixed height of the graph canvas in CSS pixels.
	pub graph_height: f64,
	/// Node attribute that picks the color.
	pub color_by: ColorBy,
	/// Zoom scale above which labels of non-highlighted links are drawn.
	pub label_zoom_threshold: f64,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base: String::new(),
			graph_height: 600.0,
			color_by: ColorBy::EntityType,
			label_zoom_threshold: 1.5,
		}
	}
}

impl AppConfig {
	/// Defaults overridden by whatever meta tags the page carries.
	pub fn from_document() -> Self {
		let mut config = Self::default();
		let Some(document) = web_sys::window().and_then(|w| w.document()) else {
			return config;
		};
		let meta = |name: &str| -> Option<String> {
			document
				.query_selector(&format!("meta[name=\"discovery:{}\"]", name))
				.ok()
				.flatten()
				.and_then(|el| el.dyn_into::<HtmlMetaElement>().ok())
				.map(|el| el.content())
		};
		for (key, value) in ["api-base", "graph-height", "color-by", "label-zoom-threshold"]
			.into_iter()
			.filter_map(|key| meta(key).map(|v| (key, v)))
		{
			if let Err(reason) = config.apply(key, &value) {
				warn!("ignoring meta discovery:{}={:?}: {}", key, value, reason);
			}
		}
		debug!("config: {:?}", config);
		config
	}

	/// Applies one `key = value` override.
	pub fn apply(&mut self, key: &str, value: &str) -> Result<(), String> {
		let value = value.trim();
		match key {
			"api-base" => self.api_base = value.trim_end_matches('/').to_string(),
			"graph-height" => {
				self.graph_height = parse_positive(value)?;
			}
			"color-by" => {
				self.color_by = value.parse()?;
			}
			"label-zoom-threshold" => {
				self.label_zoom_threshold = parse_positive(value)?;
			}
			other => return Err(format!("unknown key {}", other)),
		}
		Ok(())
	}

	/// Full URL of an API path.
	pub fn endpoint(&self, path: &str) -> String {
		format!("{}{}", self.api_base, path)
	}
}

fn parse_positive(value: &str) -> Result<f64, String> {
	match value.parse::<f64>() {
		Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
		_ => Err("expected a positive number".to_string()),
	}
}
