//! Wire shape of the knowledge graph snapshot.

use serde::{Deserialize, Serialize};

use super::palette::ColorBy;

/// An entity of the knowledge graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	/// Unique within the snapshot.
	pub id: String,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Entity type, `type` on the wire.
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	/// Provenance category.
	#[serde(default)]
	pub knowledge_source: Option<String>,
	/// Older snapshots carry the entity type here.
	#[serde(default)]
	pub group: Option<String>,
}

impl GraphNode {
	/// Category the node is colored by; empty when the node has none.
	pub fn category(&self, color_by: ColorBy) -> &str {
		let value = match color_by {
			ColorBy::EntityType => self.kind.as_ref().or(self.group.as_ref()),
			ColorBy::KnowledgeSource => self.knowledge_source.as_ref(),
		};
		value.map(String::as_str).unwrap_or("")
	}

	/// Name, or the id when the name is blank.
	pub fn label(&self) -> &str {
		if self.name.is_empty() { &self.id } else { &self.name }
	}
}

/// A directed relationship between two entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
	/// Id of the source node.
	pub source: String,
	/// Id of the target node.
	pub target: String,
	/// Relationship name drawn on the link.
	#[serde(default)]
	pub label: String,
	/// 0..=1, 0.5 when absent.
	#[serde(default = "default_confidence")]
	pub confidence: f64,
}

fn default_confidence() -> f64 {
	0.5
}

/// Snapshot served by `/api/graph-data`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// Entities.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// Relationships between them.
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Node count per category, in first-seen order.
	pub fn category_counts(&self, color_by: ColorBy) -> Vec<(String, usize)> {
		let mut counts: Vec<(String, usize)> = Vec::new();
		for node in &self.nodes {
			let category = node.category(color_by);
			match counts.iter_mut().find(|(c, _)| c == category) {
				Some((_, n)) => *n += 1,
				None => counts.push((category.to_string(), 1)),
			}
		}
		counts
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SNAPSHOT: &str = r#"{
		"nodes": [
			{"id": "D1", "name": "Semaglutide", "type": "drug", "group": "drug"},
			{"id": "P1", "name": "GLP1R", "type": "protein", "group": "protein"},
			{"id": "X1", "name": "Obesity", "type": "disease", "knowledge_source": "clinical_trials"},
			{"id": "D2", "name": "Metformin", "type": "drug"}
		],
		"links": [
			{"source": "D1", "target": "P1", "label": "activates", "confidence": 0.9},
			{"source": "P1", "target": "X1", "label": "regulates"}
		]
	}"#;

	#[test]
	fn decodes_backend_snapshot() {
		let data: GraphData = serde_json::from_str(SNAPSHOT).unwrap();
		assert_eq!(data.nodes.len(), 4);
		assert_eq!(data.nodes[0].kind.as_deref(), Some("drug"));
		assert_eq!(data.links[1].confidence, 0.5);
	}

	#[test]
	fn category_follows_selected_taxonomy() {
		let data: GraphData = serde_json::from_str(SNAPSHOT).unwrap();
		assert_eq!(data.nodes[2].category(ColorBy::EntityType), "disease");
		assert_eq!(data.nodes[2].category(ColorBy::KnowledgeSource), "clinical_trials");
		assert_eq!(data.nodes[0].category(ColorBy::KnowledgeSource), "");
	}

	#[test]
	fn counts_categories_in_first_seen_order() {
		let data: GraphData = serde_json::from_str(SNAPSHOT).unwrap();
		assert_eq!(
			data.category_counts(ColorBy::EntityType),
			vec![
				("drug".to_string(), 2),
				("protein".to_string(), 1),
				("disease".to_string(), 1)
			]
		);
	}
}
