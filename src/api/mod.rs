//! API Module
//!
//! This module handles the HTTP API for retrieving batches.
//! It provides the `GET /retrieve/{batchid}` endpoint and its router.

mod server;
pub use server::{AppState, Server, batchid_from_path, retrieve, router};
