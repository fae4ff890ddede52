//! Presentation helpers for a [`DiscoveryResult`].

use super::events::DiscoveryResult;

/// `0.734` -> `73`.
pub fn percent(fraction: f64) -> u32 {
	if !fraction.is_finite() {
		return 0;
	}
	(fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Visual emphasis of a section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionTone {
	/// No emphasis.
	Plain,
	/// Reassuring.
	Success,
	/// Draws attention.
	Highlight,
	/// Cautionary.
	Warning,
}

/// One optional narrative block of the result card.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
	/// Heading.
	pub title: &'static str,
	/// Trimmed text.
	pub body: String,
	/// Emphasis.
	pub tone: SectionTone,
}

/// Narrative sections in display order. Absent or blank fields are left out.
pub fn sections(result: &DiscoveryResult) -> Vec<Section> {
	let fields: [(&'static str, &Option<String>, SectionTone); 9] = [
		("Hypothesis", &result.hypothesis, SectionTone::Plain),
		("Key Insight", &result.key_insight, SectionTone::Plain),
		("Clinical Significance", &result.clinical_significance, SectionTone::Plain),
		("Mechanism", &result.mechanism_explanation, SectionTone::Plain),
		("Mechanism Summary", &result.mechanism_summary, SectionTone::Plain),
		("Safety in Target Population", &result.safety_rationale, SectionTone::Success),
		("Hidden Knowledge Bridged", &result.hidden_knowledge_insight, SectionTone::Highlight),
		("Confidence Assessment", &result.confidence_assessment, SectionTone::Plain),
		("Key Risks", &result.key_risks, SectionTone::Warning),
	];
	fields
		.into_iter()
		.filter_map(|(title, body, tone)| {
			let body = body.as_deref()?.trim();
			(!body.is_empty()).then(|| Section {
				title,
				body: body.to_string(),
				tone,
			})
		})
		.collect()
}

/// Headline numbers shown as tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathStats {
	/// Path length.
	pub hops: u32,
	/// Path confidence in percent.
	pub confidence_pct: u32,
	/// Hidden connections used.
	pub hidden_links: u32,
	/// Overall score in percent.
	pub overall_score_pct: u32,
}

impl From<&DiscoveryResult> for PathStats {
	fn from(result: &DiscoveryResult) -> Self {
		Self {
			hops: result.top_path.path_length,
			confidence_pct: percent(result.top_path.confidence),
			hidden_links: result.top_path.hidden_connections,
			overall_score_pct: percent(result.scores.overall_score),
		}
	}
}

/// Non-blank next steps, in order.
pub fn next_steps(result: &DiscoveryResult) -> Vec<String> {
	result
		.next_steps
		.iter()
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.map(str::to_string)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::discovery::events::{Scores, TopPath};

	#[test]
	fn percent_rounds_and_clamps() {
		assert_eq!(percent(0.734), 73);
		assert_eq!(percent(1.2), 100);
		assert_eq!(percent(-0.1), 0);
		assert_eq!(percent(f64::NAN), 0);
	}

	#[test]
	fn present_fields_are_shown_absent_are_omitted() {
		let result = DiscoveryResult {
			drug: "Semaglutide".into(),
			disease: "Obesity".into(),
			hypothesis: Some("GLP-1 agonism reduces appetite".into()),
			safety_rationale: Some("Approved for T2D".into()),
			key_risks: Some("  ".into()),
			..Default::default()
		};
		let titles: Vec<_> = sections(&result).iter().map(|s| s.title).collect();
		assert_eq!(titles, vec!["Hypothesis", "Safety in Target Population"]);
	}

	#[test]
	fn every_field_present_yields_every_section() {
		let text = Some("x".to_string());
		let result = DiscoveryResult {
			hypothesis: text.clone(),
			key_insight: text.clone(),
			clinical_significance: text.clone(),
			mechanism_explanation: text.clone(),
			mechanism_summary: text.clone(),
			safety_rationale: text.clone(),
			hidden_knowledge_insight: text.clone(),
			confidence_assessment: text.clone(),
			key_risks: text,
			..Default::default()
		};
		assert_eq!(sections(&result).len(), 9);
	}

	#[test]
	fn empty_result_renders_without_sections() {
		let result = DiscoveryResult::default();
		assert!(sections(&result).is_empty());
		assert!(next_steps(&result).is_empty());
		assert_eq!(
			PathStats::from(&result),
			PathStats {
				hops: 0,
				confidence_pct: 0,
				hidden_links: 0,
				overall_score_pct: 0
			}
		);
	}

	#[test]
	fn stats_format_percentages() {
		let result = DiscoveryResult {
			top_path: TopPath {
				confidence: 0.876,
				path_length: 3,
				hidden_connections: 2,
				..Default::default()
			},
			scores: Scores { overall_score: 0.61 },
			..Default::default()
		};
		let stats = PathStats::from(&result);
		assert_eq!(stats.confidence_pct, 88);
		assert_eq!(stats.overall_score_pct, 61);
		assert_eq!(stats.hops, 3);
	}
}
