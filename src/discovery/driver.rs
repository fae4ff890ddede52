//! Drives one discovery stream from first byte to terminal outcome.

use log::{debug, warn};

use super::decoder::{DecodedLine, EventDecoder};
use super::events::{DiscoveryResult, ProgressEvent};
use super::session::SessionOutcome;
use crate::error::{Error, Result};

/// Something that yields the response body in chunks.
#[allow(async_fn_in_trait)]
pub trait ChunkSource {
	/// Next chunk of bytes, `None` at end of input.
	async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>>;

	/// Stop reading; called when the session is superseded.
	fn cancel(&mut self) {}
}

enum Step {
	Continue,
	Done(SessionOutcome),
}

struct Driver<C, S> {
	decoder: EventDecoder,
	last_progress: f64,
	clock: C,
	sink: S,
}

impl<C, S> Driver<C, S>
where
	C: Fn() -> f64,
	S: FnMut(ProgressEvent) -> bool,
{
	fn apply(&mut self, line: DecodedLine) -> Step {
		let wire = match line {
			DecodedLine::Event(wire) => wire,
			DecodedLine::Malformed {
				payload,
				reason,
				terminal,
			} => {
				if terminal {
					return Step::Done(SessionOutcome::Failed(Error::StreamDecode(reason)));
				}
				warn!("skipping malformed stream line ({}): {}", reason, payload);
				return Step::Continue;
			}
		};

		let (event, result) = wire.into_progress(self.last_progress, (self.clock)());
		self.last_progress = event.progress;
		let complete = event.is_complete();
		let error = event.is_error().then(|| event.message.clone());
		if !(self.sink)(event) {
			return Step::Done(SessionOutcome::Cancelled);
		}

		if complete {
			return Step::Done(decode_result(result));
		}
		if let Some(message) = error {
			return Step::Done(SessionOutcome::Failed(Error::BackendReported(message)));
		}
		Step::Continue
	}
}

fn decode_result(result: Option<serde_json::Value>) -> SessionOutcome {
	let Some(value) = result else {
		return SessionOutcome::Failed(Error::StreamDecode(
			"complete event carried no result".to_string(),
		));
	};
	match serde_json::from_value::<DiscoveryResult>(value) {
		Ok(result) => SessionOutcome::Completed(result),
		Err(err) => SessionOutcome::Failed(Error::StreamDecode(err.to_string())),
	}
}

/// Reads `source` until a terminal event, end of input, a transport failure or cancellation.
///
/// Every decoded event is stamped with `clock()` and handed to `sink` in arrival order; a
/// `false` from `sink` means the session was superseded. `is_current` is checked before each
/// read so an abandoned session stops consuming without waiting for more data.
pub async fn drive<Src, Cur, C, S>(
	source: &mut Src,
	is_current: Cur,
	clock: C,
	sink: S,
) -> SessionOutcome
where
	Src: ChunkSource,
	Cur: Fn() -> bool,
	C: Fn() -> f64,
	S: FnMut(ProgressEvent) -> bool,
{
	let mut driver = Driver {
		decoder: EventDecoder::new(),
		last_progress: 0.0,
		clock,
		sink,
	};

	loop {
		if !is_current() {
			source.cancel();
			return SessionOutcome::Cancelled;
		}
		let chunk = match source.next_chunk().await {
			Ok(Some(chunk)) => chunk,
			Ok(None) => break,
			Err(err) => return SessionOutcome::Failed(err),
		};
		if !is_current() {
			source.cancel();
			return SessionOutcome::Cancelled;
		}
		for line in driver.decoder.feed(&chunk) {
			if let Step::Done(outcome) = driver.apply(line) {
				source.cancel();
				return outcome;
			}
		}
	}

	if let Some(line) = driver.decoder.finish() {
		if let Step::Done(outcome) = driver.apply(line) {
			return outcome;
		}
	}
	debug!("discovery stream closed without a terminal event");
	SessionOutcome::Failed(Error::IncompleteStream)
}
