//! Reply types of the publication upload endpoint.

use serde::{Deserialize, Serialize};

/// One subject-predicate-object fact extracted from a publication.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triplet {
	/// Entity the fact is about.
	pub subject: String,
	/// Entity type of the subject.
	#[serde(default)]
	pub subject_type: String,
	/// Relationship.
	pub predicate: String,
	/// Entity on the other end.
	pub object: String,
	/// Entity type of the object.
	#[serde(default)]
	pub object_type: String,
	/// Extraction confidence, 0..=1.
	#[serde(default)]
	pub confidence: f64,
	/// Sentence the fact was read from.
	#[serde(default)]
	pub source_sentence: String,
}

/// Reply of `/api/upload-publication`. `success` decides which branch the UI shows.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
	/// Extraction succeeded.
	#[serde(default)]
	pub success: bool,
	/// Name of the uploaded file.
	#[serde(default)]
	pub filename: String,
	/// Extracted text.
	#[serde(default)]
	pub content: String,
	/// Facts found in the text.
	#[serde(default)]
	pub triplets: Option<Vec<Triplet>>,
	/// Count reported by the server, which may exceed the triplets sent.
	#[serde(default)]
	pub triplet_count: Option<usize>,
	/// Reason for failure.
	#[serde(default)]
	pub error: Option<String>,
}

impl UploadResult {
	/// Local failure reply, used when the request itself failed.
	pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
		Self {
			success: false,
			filename: filename.into(),
			error: Some(error.into()),
			..Default::default()
		}
	}

	/// Extracted facts, empty when none were sent.
	pub fn triplets(&self) -> &[Triplet] {
		self.triplets.as_deref().unwrap_or_default()
	}

	/// First `max_chars` characters of the content, with an ellipsis when cut.
	pub fn preview(&self, max_chars: usize) -> String {
		let mut chars = self.content.chars();
		let head: String = chars.by_ref().take(max_chars).collect();
		if chars.next().is_some() {
			format!("{}…", head)
		} else {
			head
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_success_with_triplets() {
		let result: UploadResult = serde_json::from_str(
			r#"{"success":true,"filename":"paper.txt","content":"GLP-1 reduces appetite.","length":23,
			"triplets":[{"subject":"GLP-1","subject_type":"protein","predicate":"reduces","object":"appetite","object_type":"phenotype","confidence":0.9,"source_sentence":"GLP-1 reduces appetite."}],
			"triplet_count":1}"#,
		)
		.unwrap();
		assert!(result.success);
		assert_eq!(result.triplets().len(), 1);
		assert_eq!(result.triplets()[0].predicate, "reduces");
	}

	#[test]
	fn decodes_error_reply() {
		let result: UploadResult =
			serde_json::from_str(r#"{"success":false,"error":"No file provided"}"#).unwrap();
		assert!(!result.success);
		assert_eq!(result.error.as_deref(), Some("No file provided"));
		assert!(result.triplets().is_empty());
	}

	#[test]
	fn preview_cuts_on_char_boundary() {
		let result = UploadResult {
			content: "αβγδε".into(),
			..Default::default()
		};
		assert_eq!(result.preview(3), "αβγ…");
		assert_eq!(result.preview(10), "αβγδε");
	}
}
