//! Owner of one discovery session's state.
//!
//! Every mutation from an in-flight stream carries the [`SessionTicket`] it was started with.
//! Cancelling or starting over bumps the token, so late arrivals from a superseded stream are
//! dropped instead of reaching the activity log or the result.

use log::{debug, info, warn};

use super::events::{DiscoveryResult, ProgressEvent};
use crate::error::{Error, Result};

/// Handle for the session that [`SessionController::begin`] started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionTicket {
	token: u64,
	question: String,
}

impl SessionTicket {
	/// Generation this ticket belongs to.
	pub fn token(&self) -> u64 {
		self.token
	}

	/// The trimmed question this session is answering.
	pub fn question(&self) -> &str {
		&self.question
	}
}

/// Where the page's session stands.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionStatus {
	/// Nothing started, or dismissed.
	#[default]
	Idle,
	/// Streaming.
	Running,
	/// Result available.
	Completed,
	/// Ended with the message to show.
	Failed(String),
	/// Stopped by the user.
	Cancelled,
}

/// How a stream ended, as reported by the driver.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionOutcome {
	/// `complete` with a decodable result.
	Completed(DiscoveryResult),
	/// Transport, decode or backend failure.
	Failed(Error),
	/// The session was superseded while streaming.
	Cancelled,
}

/// At most one running session, plus the log and result of the latest one.
#[derive(Clone, Debug, Default)]
pub struct SessionController {
	token: u64,
	status: SessionStatus,
	log: Vec<ProgressEvent>,
	result: Option<DiscoveryResult>,
}

impl SessionController {
	/// Idle controller.
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts a session for `question`.
	///
	/// Blank questions are rejected with [`Error::InvalidInput`], and a running session with
	/// [`Error::SessionBusy`]; neither changes any state.
	pub fn begin(&mut self, question: &str) -> Result<SessionTicket> {
		let question = question.trim();
		if question.is_empty() {
			return Err(Error::InvalidInput);
		}
		if self.is_running() {
			return Err(Error::SessionBusy);
		}
		self.token += 1;
		self.status = SessionStatus::Running;
		self.log.clear();
		self.result = None;
		info!("discovery session {} started: {}", self.token, question);
		Ok(SessionTicket {
			token: self.token,
			question: question.to_string(),
		})
	}

	/// Appends an event for `ticket`. Returns `false` when the ticket is stale.
	pub fn record(&mut self, ticket: &SessionTicket, event: ProgressEvent) -> bool {
		if !self.accepts(ticket) {
			debug!("dropping event '{}' from stale session {}", event.step, ticket.token);
			return false;
		}
		self.log.push(event);
		true
	}

	/// Applies the terminal outcome for `ticket`; ignored when the ticket is stale.
	pub fn finish(&mut self, ticket: &SessionTicket, outcome: SessionOutcome) {
		if !self.accepts(ticket) {
			debug!("ignoring outcome of stale session {}", ticket.token);
			return;
		}
		match outcome {
			SessionOutcome::Completed(result) => {
				info!(
					"discovery session {} completed: {} -> {}",
					ticket.token, result.drug, result.disease
				);
				self.result = Some(result);
				self.status = SessionStatus::Completed;
			}
			SessionOutcome::Failed(err) => {
				warn!("discovery session {} failed: {}", ticket.token, err);
				self.status = SessionStatus::Failed(err.user_message());
			}
			SessionOutcome::Cancelled => {
				self.token += 1;
				self.status = SessionStatus::Cancelled;
			}
		}
	}

	/// Abandons the running session. Its remaining updates will be dropped.
	pub fn cancel(&mut self) {
		if !self.is_running() {
			return;
		}
		info!("discovery session {} cancelled", self.token);
		self.token += 1;
		self.status = SessionStatus::Cancelled;
	}

	/// Clears the log and the result of a finished session.
	pub fn dismiss(&mut self) {
		if self.is_running() {
			return;
		}
		self.log.clear();
		self.result = None;
		self.status = SessionStatus::Idle;
	}

	/// `ticket` belongs to the newest session.
	pub fn is_current(&self, ticket: &SessionTicket) -> bool {
		self.token == ticket.token
	}

	/// A session is streaming.
	pub fn is_running(&self) -> bool {
		self.status == SessionStatus::Running
	}

	/// Current status.
	pub fn status(&self) -> &SessionStatus {
		&self.status
	}

	/// Events of the latest session, in arrival order.
	pub fn log(&self) -> &[ProgressEvent] {
		&self.log
	}

	/// Result of the latest session once completed.
	pub fn result(&self) -> Option<&DiscoveryResult> {
		self.result.as_ref()
	}

	/// Progress of the newest log entry, 0 for an empty log.
	pub fn latest_progress(&self) -> f64 {
		self.log.last().map(|e| e.progress).unwrap_or(0.0)
	}

	/// Message of a failed session.
	pub fn failure(&self) -> Option<&str> {
		match &self.status {
			SessionStatus::Failed(msg) => Some(msg),
			_ => None,
		}
	}

	fn accepts(&self, ticket: &SessionTicket) -> bool {
		self.is_current(ticket) && self.is_running()
	}
}

/// Abort handle of the session that is currently streaming, keyed by its token.
///
/// The handle is armed before the request goes out, so stopping a session also aborts a request
/// still waiting for headers. A finishing session only clears its own handle, never one armed
/// by a newer session.
#[derive(Debug)]
pub struct CancelSlot<H> {
	armed: Option<(u64, H)>,
}

impl<H> Default for CancelSlot<H> {
	fn default() -> Self {
		Self { armed: None }
	}
}

impl<H> CancelSlot<H> {
	/// Stores `handle` for `ticket`, replacing whatever was armed before.
	pub fn arm(&mut self, ticket: &SessionTicket, handle: H) {
		self.armed = Some((ticket.token, handle));
	}

	/// Removes the armed handle so the caller can abort it.
	pub fn take(&mut self) -> Option<H> {
		self.armed.take().map(|(_, handle)| handle)
	}

	/// Drops the handle armed for `ticket`; a handle armed by another session stays.
	pub fn release(&mut self, ticket: &SessionTicket) -> Option<H> {
		if self.armed_token() == Some(ticket.token) {
			self.take()
		} else {
			None
		}
	}

	/// Token of the session whose handle is armed.
	pub fn armed_token(&self) -> Option<u64> {
		self.armed.as_ref().map(|(token, _)| *token)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn event(step: &str, progress: f64) -> ProgressEvent {
		ProgressEvent {
			step: step.into(),
			message: format!("{} running", step),
			progress,
			timestamp: 0.0,
		}
	}

	#[test]
	fn blank_question_starts_nothing() {
		let mut session = SessionController::new();
		assert_eq!(session.begin("   \n\t"), Err(Error::InvalidInput));
		assert_eq!(session.status(), &SessionStatus::Idle);
		assert!(!session.is_running());
	}

	#[test]
	fn question_is_trimmed() {
		let mut session = SessionController::new();
		let ticket = session.begin("  Could semaglutide treat obesity?  ").unwrap();
		assert_eq!(ticket.question(), "Could semaglutide treat obesity?");
	}

	#[test]
	fn second_begin_while_running_is_rejected() {
		let mut session = SessionController::new();
		let first = session.begin("first").unwrap();
		assert_eq!(session.begin("second"), Err(Error::SessionBusy));
		assert!(session.is_current(&first));
	}

	#[test]
	fn records_in_order_and_completes() {
		let mut session = SessionController::new();
		let ticket = session.begin("q").unwrap();
		assert!(session.record(&ticket, event("search", 10.0)));
		assert!(session.record(&ticket, event("score", 60.0)));
		session.finish(&ticket, SessionOutcome::Completed(DiscoveryResult::default()));

		let steps: Vec<_> = session.log().iter().map(|e| e.step.as_str()).collect();
		assert_eq!(steps, vec!["search", "score"]);
		assert_eq!(session.status(), &SessionStatus::Completed);
		assert!(session.result().is_some());
		assert_eq!(session.latest_progress(), 60.0);
	}

	#[test]
	fn cancelled_session_drops_late_updates() {
		let mut session = SessionController::new();
		let ticket = session.begin("q").unwrap();
		assert!(session.record(&ticket, event("search", 10.0)));
		session.cancel();

		assert!(!session.record(&ticket, event("late", 90.0)));
		session.finish(&ticket, SessionOutcome::Completed(DiscoveryResult::default()));
		assert_eq!(session.log().len(), 1);
		assert!(session.result().is_none());
		assert_eq!(session.status(), &SessionStatus::Cancelled);
	}

	#[test]
	fn new_session_clears_previous_result() {
		let mut session = SessionController::new();
		let first = session.begin("q1").unwrap();
		session.record(&first, event("search", 10.0));
		session.finish(&first, SessionOutcome::Completed(DiscoveryResult::default()));

		let second = session.begin("q2").unwrap();
		assert!(session.log().is_empty());
		assert!(session.result().is_none());
		assert!(!session.record(&first, event("stale", 50.0)));
		assert!(session.record(&second, event("fresh", 5.0)));
	}

	#[test]
	fn failure_keeps_result_unset() {
		let mut session = SessionController::new();
		let ticket = session.begin("q").unwrap();
		session.finish(
			&ticket,
			SessionOutcome::Failed(Error::HttpStatus {
				status: 500,
				status_text: "Internal Server Error".into(),
			}),
		);
		assert!(session.result().is_none());
		assert!(!session.failure().unwrap().is_empty());
	}

	#[test]
	fn dismiss_resets_finished_session_only() {
		let mut session = SessionController::new();
		let ticket = session.begin("q").unwrap();
		session.record(&ticket, event("search", 10.0));
		session.dismiss();
		assert_eq!(session.log().len(), 1);

		session.finish(&ticket, SessionOutcome::Completed(DiscoveryResult::default()));
		session.dismiss();
		assert!(session.log().is_empty());
		assert!(session.result().is_none());
		assert_eq!(session.status(), &SessionStatus::Idle);
	}

	#[test]
	fn stop_before_stream_opens_aborts_that_request() {
		let mut session = SessionController::new();
		let mut slot = CancelSlot::default();
		let ticket = session.begin("q").unwrap();
		slot.arm(&ticket, "h1");

		session.cancel();
		assert_eq!(slot.take(), Some("h1"));
		// The aborted request surfaces as a transport failure once it settles.
		session.finish(
			&ticket,
			SessionOutcome::Failed(Error::Transport("The user aborted a request.".into())),
		);
		assert_eq!(session.status(), &SessionStatus::Cancelled);
		assert!(slot.release(&ticket).is_none());
	}

	#[test]
	fn stale_session_settling_late_keeps_live_handle() {
		let mut session = SessionController::new();
		let mut slot = CancelSlot::default();
		let first = session.begin("q1").unwrap();
		slot.arm(&first, "h1");
		session.cancel();
		slot.take();

		let second = session.begin("q2").unwrap();
		slot.arm(&second, "h2");

		// The first request settles after the second one started.
		assert!(slot.release(&first).is_none());
		session.finish(&first, SessionOutcome::Failed(Error::IncompleteStream));
		assert!(session.is_running());
		assert_eq!(slot.armed_token(), Some(second.token()));

		session.cancel();
		assert_eq!(slot.take(), Some("h2"));
	}

	#[test]
	fn finished_session_releases_its_own_handle() {
		let mut session = SessionController::new();
		let mut slot = CancelSlot::default();
		let ticket = session.begin("q").unwrap();
		slot.arm(&ticket, "h1");
		session.finish(&ticket, SessionOutcome::Completed(DiscoveryResult::default()));
		assert_eq!(slot.release(&ticket), Some("h1"));
		assert!(slot.take().is_none());
	}
}
