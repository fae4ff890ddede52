//! Incremental line decoder for the discovery stream.
//!
//! Bytes arrive in arbitrary chunks. Complete lines are split off and decoded, a trailing
//! partial line stays buffered until the next chunk (or [`EventDecoder::finish`]). Lines are
//! decoded as UTF-8 only once complete, so a multi-byte character split across two chunks
//! still decodes.

use super::events::{STEP_COMPLETE, STEP_ERROR, WireEvent};

/// Prefix of every line that carries an event.
pub const EVENT_PREFIX: &str = "data:";

/// Outcome of one `data:` line.
#[derive(Clone, Debug)]
pub enum DecodedLine {
	/// A well-formed event.
	Event(WireEvent),
	/// The line had the event prefix but its payload did not decode.
	Malformed {
		/// Text after the prefix.
		payload: String,
		/// Why it did not decode.
		reason: String,
		/// The payload looks like a `complete`/`error` event.
		terminal: bool,
	},
}

/// Splits a byte stream into decoded lines.
#[derive(Debug, Default)]
pub struct EventDecoder {
	buffer: Vec<u8>,
}

impl EventDecoder {
	/// Decoder with nothing buffered.
	pub fn new() -> Self {
		Self::default()
	}

	/// Consumes a chunk and returns the lines it completed, in order.
	pub fn feed(&mut self, chunk: &[u8]) -> Vec<DecodedLine> {
		self.buffer.extend_from_slice(chunk);
		let mut decoded = Vec::new();
		let mut start = 0;
		while let Some(pos) = self.buffer[start..].iter().position(|&b| b == b'\n') {
			let end = start + pos;
			if let Some(line) = decode_line(&self.buffer[start..end]) {
				decoded.push(line);
			}
			start = end + 1;
		}
		self.buffer.drain(..start);
		decoded
	}

	/// Flushes a final line that was not newline-terminated.
	pub fn finish(&mut self) -> Option<DecodedLine> {
		let rest = std::mem::take(&mut self.buffer);
		decode_line(&rest)
	}

	/// Bytes held back waiting for a newline.
	pub fn pending(&self) -> usize {
		self.buffer.len()
	}
}

fn decode_line(raw: &[u8]) -> Option<DecodedLine> {
	let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
	let line = String::from_utf8_lossy(raw);
	let payload = line.strip_prefix(EVENT_PREFIX)?;
	let payload = payload.strip_prefix(' ').unwrap_or(payload);
	if payload.trim().is_empty() {
		return None;
	}

	Some(match serde_json::from_str::<WireEvent>(payload) {
		Ok(event) => DecodedLine::Event(event),
		Err(err) => DecodedLine::Malformed {
			payload: payload.to_string(),
			reason: err.to_string(),
			terminal: mentions_terminal_step(payload),
		},
	})
}

fn mentions_terminal_step(payload: &str) -> bool {
	let step = match serde_json::from_str::<serde_json::Value>(payload) {
		Ok(value) => value.get("step").and_then(|s| s.as_str()).map(str::to_string),
		Err(_) => top_level_step(payload),
	};
	matches!(step.as_deref(), Some(STEP_COMPLETE | STEP_ERROR))
}

/// Value of the outermost object's `"step"` key, read leniently from JSON that may be cut short.
/// Keys inside nested objects and text inside strings are not considered.
fn top_level_step(payload: &str) -> Option<String> {
	let mut chars = payload.chars();
	let mut depth = 0usize;
	let mut key: Option<String> = None;
	let mut in_value = false;
	while let Some(c) = chars.next() {
		let at_step_value = depth == 1 && in_value && key.as_deref() == Some("step");
		match c {
			c if c.is_whitespace() => {}
			'"' => {
				let text = read_string(&mut chars)?;
				if at_step_value {
					return Some(text);
				}
				if depth == 1 && !in_value {
					key = Some(text);
				}
			}
			// `step` holds something other than a string.
			_ if at_step_value => return None,
			'{' | '[' => depth += 1,
			'}' | ']' => depth = depth.saturating_sub(1),
			':' if depth == 1 => in_value = true,
			',' if depth == 1 => {
				in_value = false;
				key = None;
			}
			_ => {}
		}
	}
	None
}

/// Rest of a JSON string after its opening quote, `None` when it never closes.
fn read_string(chars: &mut std::str::Chars<'_>) -> Option<String> {
	let mut text = String::new();
	while let Some(c) = chars.next() {
		match c {
			'"' => return Some(text),
			'\\' => text.push(chars.next()?),
			c => text.push(c),
		}
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;

	fn steps(lines: &[DecodedLine]) -> Vec<String> {
		lines
			.iter()
			.filter_map(|l| match l {
				DecodedLine::Event(e) => Some(e.step.clone()),
				DecodedLine::Malformed { .. } => None,
			})
			.collect()
	}

	#[test]
	fn splits_lines_in_arrival_order() {
		let mut decoder = EventDecoder::new();
		let out = decoder.feed(
			b"data: {\"step\":\"a\",\"message\":\"one\",\"progress\":10}\ndata: {\"step\":\"b\",\"message\":\"two\",\"progress\":20}\n",
		);
		assert_eq!(steps(&out), vec!["a", "b"]);
		assert_eq!(decoder.pending(), 0);
	}

	#[test]
	fn keeps_partial_line_across_chunks() {
		let mut decoder = EventDecoder::new();
		assert!(decoder.feed(b"data: {\"step\":\"pa").is_empty());
		assert!(decoder.pending() > 0);
		let out = decoder.feed(b"rse\",\"message\":\"ok\"}\r\n");
		assert_eq!(steps(&out), vec!["parse"]);
		assert_eq!(decoder.pending(), 0);
	}

	#[test]
	fn multibyte_character_split_between_chunks() {
		let line = "data: {\"step\":\"s\",\"message\":\"Semaglutide → Obesity\"}\n".as_bytes();
		let arrow = line.iter().position(|&b| b == 0xE2).unwrap();
		let mut decoder = EventDecoder::new();
		assert!(decoder.feed(&line[..arrow + 1]).is_empty());
		let out = decoder.feed(&line[arrow + 1..]);
		match &out[..] {
			[DecodedLine::Event(e)] => assert_eq!(e.message, "Semaglutide → Obesity"),
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn ignores_lines_without_prefix() {
		let mut decoder = EventDecoder::new();
		let out = decoder.feed(b": keep-alive\n\nevent: progress\nid: 7\ndata:\nhello\n");
		assert!(out.is_empty());
	}

	#[test]
	fn prefix_without_space_is_accepted() {
		let mut decoder = EventDecoder::new();
		let out = decoder.feed(b"data:{\"step\":\"x\"}\n");
		assert_eq!(steps(&out), vec!["x"]);
	}

	#[test]
	fn malformed_payload_is_reported_not_dropped() {
		let mut decoder = EventDecoder::new();
		let out = decoder.feed(b"data: {not json}\n");
		match &out[..] {
			[DecodedLine::Malformed { terminal, .. }] => assert!(!terminal),
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn truncated_complete_line_is_flagged_terminal() {
		let mut decoder = EventDecoder::new();
		let out = decoder.feed(b"data: {\"step\": \"complete\", \"result\": {\"drug\": \n");
		match &out[..] {
			[DecodedLine::Malformed { terminal, .. }] => assert!(terminal),
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn finish_flushes_unterminated_line() {
		let mut decoder = EventDecoder::new();
		assert!(decoder.feed(b"data: {\"step\":\"complete\",\"result\":{}}").is_empty());
		match decoder.finish() {
			Some(DecodedLine::Event(e)) => assert_eq!(e.step, "complete"),
			other => panic!("unexpected {:?}", other),
		}
		assert!(decoder.finish().is_none());
	}

	#[test]
	fn nested_terminal_step_in_truncated_progress_line_is_not_terminal() {
		let mut decoder = EventDecoder::new();
		let out = decoder.feed(
			b"data: {\"step\":\"score\",\"result\":{\"step\":\"complete\",\"drug\":\n\
			data: {\"step\":\"search\",\"message\":\"saw \\\"step\\\":\\\"error\\\" in a\n\
			data: {\"message\":\"x\",\"detail\":{\"step\":\"complete\"},\"progress\":\n",
		);
		assert_eq!(out.len(), 3);
		for line in &out {
			match line {
				DecodedLine::Malformed { terminal, .. } => assert!(!terminal, "{:?}", line),
				other => panic!("unexpected {:?}", other),
			}
		}
	}

	#[test]
	fn top_level_step_reads_outer_key_only() {
		assert_eq!(
			top_level_step(r#"{ "step" : "error", "message": "boom"#).as_deref(),
			Some("error")
		);
		assert_eq!(
			top_level_step(r#"{"result":{"step":"complete"},"step":"x","#).as_deref(),
			Some("x")
		);
		assert_eq!(top_level_step(r#"{"step":42,"#), None);
		assert_eq!(top_level_step(r#"{"step":"comp"#), None);
	}
}
