//! Orchestration Module
//!
//! This module defines the seam between the HTTP layer and the external
//! orchestration service:
//! - `OrchestrationRunner`: the single-operation capability the handler depends on
//! - `ManagedOrchestrator`: HTTP client implementation talking to the real service

mod managed;

pub use managed::ManagedOrchestrator;

use crate::HeaderBag;
use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by an orchestration collaborator
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// The orchestrator could not be reached or the exchange broke off
    #[error("orchestrator unavailable: {0}")]
    Unavailable(String),

    #[error("orchestrator did not answer in time")]
    Timeout,

    /// The orchestrator answered with a non-success status
    #[error("orchestrator rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("orchestrator returned an unusable payload: {0}")]
    InvalidPayload(String),
}

/// Runs a request payload through the orchestration service
///
/// `context` is the caller's header set for this request only; implementations
/// must not retain it between calls.
#[async_trait]
pub trait OrchestrationRunner: Send + Sync {
    async fn run(&self, context: &HeaderBag, payload: String) -> Result<String, OrchestrationError>;
}
