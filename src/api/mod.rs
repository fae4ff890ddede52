//! Browser fetch plumbing for the backend endpoints.

mod http;
pub mod upload;

pub use http::{
	AbortHandle, FetchChunkSource, fetch_graph, open_discovery_stream, upload_publication,
};
pub use upload::{Triplet, UploadResult};
