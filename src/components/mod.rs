//! UI building blocks of the discovery page.

pub mod activity_feed;
pub mod discovery_question;
pub mod discovery_result;
pub mod force_graph;
pub mod graph_view;
pub mod publication_upload;
