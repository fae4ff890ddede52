//! Wire types of the discovery stream.

use serde::{Deserialize, Serialize};

/// Step name of the event that carries the final result.
pub const STEP_COMPLETE: &str = "complete";
/// Step name of the event that reports a backend failure.
pub const STEP_ERROR: &str = "error";

/// One streamed status update, stamped with the time it was received.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProgressEvent {
	/// Agent step name.
	pub step: String,
	/// Human-readable status.
	pub message: String,
	/// Overall progress, 0..=100.
	pub progress: f64,
	/// Milliseconds since the epoch, assigned on receipt.
	pub timestamp: f64,
}

impl ProgressEvent {
	/// Carries the final result.
	pub fn is_complete(&self) -> bool {
		self.step == STEP_COMPLETE
	}

	/// Reports a backend failure.
	pub fn is_error(&self) -> bool {
		self.step == STEP_ERROR
	}

	/// Ends the session either way.
	pub fn is_terminal(&self) -> bool {
		self.is_complete() || self.is_error()
	}
}

/// Event as it appears on the wire, before the client stamps it.
#[derive(Clone, Debug, Deserialize)]
pub struct WireEvent {
	/// Agent step name.
	pub step: String,
	/// Human-readable status.
	#[serde(default)]
	pub message: String,
	/// Progress if the server sent one.
	#[serde(default)]
	pub progress: Option<f64>,
	/// Raw result, present on `complete`.
	#[serde(default)]
	pub result: Option<serde_json::Value>,
}

impl WireEvent {
	/// Stamps the event. A missing `progress` repeats the last known value.
	pub fn into_progress(
		self,
		previous_progress: f64,
		timestamp: f64,
	) -> (ProgressEvent, Option<serde_json::Value>) {
		let progress = self
			.progress
			.filter(|p| p.is_finite())
			.map(|p| p.clamp(0.0, 100.0))
			.unwrap_or(previous_progress);
		(
			ProgressEvent {
				step: self.step,
				message: self.message,
				progress,
				timestamp,
			},
			self.result,
		)
	}
}

/// Best path found between the drug and the disease.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopPath {
	/// Graph node ids along the path.
	#[serde(default, alias = "nodeIds")]
	pub node_ids: Vec<String>,
	/// `source->target` keys of its links.
	#[serde(default)]
	pub edges: Vec<String>,
	/// 0..=1.
	#[serde(default)]
	pub confidence: f64,
	/// Number of hops.
	#[serde(default, alias = "pathLength")]
	pub path_length: u32,
	/// Links that only internal knowledge supplied.
	#[serde(default, alias = "hiddenConnections")]
	pub hidden_connections: u32,
	/// One-line mechanism along the path.
	#[serde(default)]
	pub mechanism: String,
}

/// Aggregate scoring of the hypothesis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
	/// 0..=1.
	#[serde(default, alias = "overallScore")]
	pub overall_score: f64,
}

/// Terminal hypothesis payload carried by the `complete` event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryResult {
	/// Candidate drug.
	#[serde(default)]
	pub drug: String,
	/// Target disease.
	#[serde(default)]
	pub disease: String,
	/// Proposed repurposing hypothesis.
	#[serde(default)]
	pub hypothesis: Option<String>,
	/// Headline finding.
	#[serde(default, alias = "keyInsight")]
	pub key_insight: Option<String>,
	/// Short mechanism text.
	#[serde(default, alias = "mechanismSummary")]
	pub mechanism_summary: Option<String>,
	/// Why it matters clinically.
	#[serde(default, alias = "clinicalSignificance")]
	pub clinical_significance: Option<String>,
	/// Long mechanism text.
	#[serde(default, alias = "mechanismExplanation")]
	pub mechanism_explanation: Option<String>,
	/// How sure the agent is, in words.
	#[serde(default, alias = "confidenceAssessment")]
	pub confidence_assessment: Option<String>,
	/// What internal knowledge added.
	#[serde(default, alias = "hiddenKnowledgeInsight")]
	pub hidden_knowledge_insight: Option<String>,
	/// Safety in the target population.
	#[serde(default, alias = "safetyRationale")]
	pub safety_rationale: Option<String>,
	/// Known risks.
	#[serde(default, alias = "keyRisks")]
	pub key_risks: Option<String>,
	/// Suggested follow-ups.
	#[serde(default, alias = "nextSteps")]
	pub next_steps: Vec<String>,
	/// Path to highlight.
	#[serde(default, alias = "topPath")]
	pub top_path: TopPath,
	/// Scores.
	#[serde(default)]
	pub scores: Scores,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_snake_and_camel_case_results() {
		let snake: DiscoveryResult = serde_json::from_str(
			r#"{"drug":"Semaglutide","disease":"Obesity","top_path":{"node_ids":["A","B"],"edges":["A->B"],"confidence":0.8,"path_length":1,"hidden_connections":1,"mechanism":"GLP-1"},"scores":{"overall_score":0.72}}"#,
		)
		.unwrap();
		let camel: DiscoveryResult = serde_json::from_str(
			r#"{"drug":"Semaglutide","disease":"Obesity","topPath":{"nodeIds":["A","B"],"edges":["A->B"],"confidence":0.8,"pathLength":1,"hiddenConnections":1,"mechanism":"GLP-1"},"scores":{"overallScore":0.72}}"#,
		)
		.unwrap();
		assert_eq!(snake, camel);
		assert_eq!(snake.top_path.node_ids, vec!["A", "B"]);
		assert_eq!(snake.scores.overall_score, 0.72);
	}

	#[test]
	fn missing_progress_repeats_previous() {
		let wire: WireEvent =
			serde_json::from_str(r#"{"step":"search","message":"Searching"}"#).unwrap();
		let (event, result) = wire.into_progress(40.0, 1.0);
		assert_eq!(event.progress, 40.0);
		assert!(result.is_none());
	}

	#[test]
	fn progress_is_clamped() {
		let wire: WireEvent =
			serde_json::from_str(r#"{"step":"x","message":"","progress":140}"#).unwrap();
		assert_eq!(wire.into_progress(0.0, 0.0).0.progress, 100.0);
	}
}
