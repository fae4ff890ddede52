//! Failure taxonomy shared by the API layer, the stream driver and the session controller.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Everything that can end a discovery session, a graph fetch or an upload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
	/// The question was empty after trimming.
	#[error("question must not be blank")]
	InvalidInput,

	/// A session is already streaming.
	#[error("a discovery session is already running")]
	SessionBusy,

	/// The request never produced a response, or the body stopped mid-read.
	#[error("request failed: {0}")]
	Transport(String),

	/// The server answered with a non-success status.
	#[error("server responded with HTTP {status} {status_text}")]
	HttpStatus {
		/// Numeric status code.
		status: u16,
		/// Reason phrase sent with it.
		status_text: String,
	},

	/// A stream line that had to be understood could not be.
	#[error("malformed stream line: {0}")]
	StreamDecode(String),

	/// The stream closed without a `complete` or `error` event.
	#[error("stream ended before the discovery completed")]
	IncompleteStream,

	/// Message of an `error` event from the backend.
	#[error("{0}")]
	BackendReported(String),

	/// A JSON response body did not match the expected shape.
	#[error("could not decode response body: {0}")]
	Decode(String),
}

impl Error {
	/// Network failures and non-success statuses.
	pub fn is_transport(&self) -> bool {
		matches!(self, Error::Transport(_) | Error::HttpStatus { .. })
	}

	/// Message shown to the user. Backend errors are shown verbatim, blank ones get a fallback.
	pub fn user_message(&self) -> String {
		match self {
			Error::BackendReported(msg) if msg.trim().is_empty() => {
				"discovery failed on the server".to_string()
			}
			other => other.to_string(),
		}
	}
}

impl From<JsValue> for Error {
	fn from(value: JsValue) -> Self {
		if let Some(err) = value.dyn_ref::<js_sys::Error>() {
			return Error::Transport(String::from(err.message()));
		}
		Error::Transport(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::Decode(err.to_string())
	}
}

/// Result with this crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
