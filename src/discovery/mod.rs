//! Discovery session core: wire types, stream decoding and session state.
//!
//! Nothing in here touches the browser, the fetch glue lives in [`crate::api`].

pub mod decoder;
pub mod driver;
pub mod events;
pub mod report;
pub mod session;

pub use driver::{ChunkSource, drive};
pub use events::{DiscoveryResult, ProgressEvent, Scores, TopPath};
pub use session::{CancelSlot, SessionController, SessionOutcome, SessionStatus, SessionTicket};
