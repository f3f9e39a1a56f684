//! This crate implements a batch retrieval gateway: an HTTP endpoint that wraps a
//! batch identifier in a JSON envelope, forwards it to an external orchestration
//! service, and relays the orchestrator's response back to the caller.

pub mod types; // Request envelope, header bag and retrieval outcome.
pub mod api; // HTTP router and server.
pub mod orchestration; // Orchestrator seam and its HTTP client.
pub mod config; // Defines and loads service configuration.
pub mod logging; // Tracing subscriber setup.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use orchestration::{ManagedOrchestrator, OrchestrationError, OrchestrationRunner};
