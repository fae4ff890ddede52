//! Category colors for nodes and the legend.

use std::fmt;
use std::str::FromStr;

/// Color for categories the palette does not know.
pub const FALLBACK_COLOR: &str = "#6B7280";
/// Fill for nodes and links on the highlighted path.
pub const HIGHLIGHT_COLOR: &str = "#EF4444";

const ENTITY_TYPE_COLORS: &[(&str, &str)] = &[
	("drug", "#3B82F6"),
	("protein", "#10B981"),
	("disease", "#F59E0B"),
	("pathway", "#8B5CF6"),
	("biomarker", "#EC4899"),
];

const KNOWLEDGE_SOURCE_COLORS: &[(&str, &str)] = &[
	("public_literature", "#3B82F6"),
	("internal_research", "#10B981"),
	("clinical_trials", "#F59E0B"),
	("real_world_evidence", "#8B5CF6"),
];

/// Which node attribute picks the color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorBy {
	/// The node `type`, falling back to `group`.
	#[default]
	EntityType,
	/// Where the fact came from.
	KnowledgeSource,
}

impl FromStr for ColorBy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
			"type" | "entity_type" => Ok(ColorBy::EntityType),
			"knowledge_source" | "source" => Ok(ColorBy::KnowledgeSource),
			other => Err(format!("unknown color taxonomy '{}'", other)),
		}
	}
}

impl fmt::Display for ColorBy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ColorBy::EntityType => write!(f, "entity_type"),
			ColorBy::KnowledgeSource => write!(f, "knowledge_source"),
		}
	}
}

/// Category to color table with a fallback for anything unlisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
	entries: &'static [(&'static str, &'static str)],
}

impl Palette {
	/// Table for the given taxonomy.
	pub fn for_taxonomy(color_by: ColorBy) -> Self {
		let entries = match color_by {
			ColorBy::EntityType => ENTITY_TYPE_COLORS,
			ColorBy::KnowledgeSource => KNOWLEDGE_SOURCE_COLORS,
		};
		Self { entries }
	}

	/// Color of `category`, case-insensitive, [`FALLBACK_COLOR`] when unlisted.
	pub fn color(&self, category: &str) -> &'static str {
		self.entries
			.iter()
			.find(|(name, _)| name.eq_ignore_ascii_case(category.trim()))
			.map(|(_, color)| *color)
			.unwrap_or(FALLBACK_COLOR)
	}

	/// `(category, color)` pairs in table order.
	pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
		self.entries.iter().copied()
	}
}

/// Human label for a category key, `real_world_evidence` -> `Real world evidence`.
pub fn category_label(category: &str) -> String {
	if category.is_empty() {
		return "Other".to_string();
	}
	let spaced = category.replace('_', " ");
	let mut chars = spaced.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => spaced,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_categories_map_to_their_color() {
		let palette = Palette::for_taxonomy(ColorBy::EntityType);
		assert_eq!(palette.color("drug"), "#3B82F6");
		assert_eq!(palette.color("Disease"), "#F59E0B");
	}

	#[test]
	fn unknown_category_uses_fallback() {
		let palette = Palette::for_taxonomy(ColorBy::EntityType);
		assert_eq!(palette.color("gene"), FALLBACK_COLOR);
		assert_eq!(palette.color(""), FALLBACK_COLOR);
		let sources = Palette::for_taxonomy(ColorBy::KnowledgeSource);
		assert_eq!(sources.color("drug"), FALLBACK_COLOR);
	}

	#[test]
	fn parses_taxonomy_names() {
		assert_eq!("type".parse::<ColorBy>(), Ok(ColorBy::EntityType));
		assert_eq!("knowledge-source".parse::<ColorBy>(), Ok(ColorBy::KnowledgeSource));
		assert!("mood".parse::<ColorBy>().is_err());
	}

	#[test]
	fn labels_categories() {
		assert_eq!(category_label("real_world_evidence"), "Real world evidence");
		assert_eq!(category_label(""), "Other");
	}
}
