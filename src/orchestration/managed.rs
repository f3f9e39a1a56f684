//! Managed Orchestrator Module
//!
//! HTTP client for the external orchestration service. Each call posts the
//! request envelope to the configured run endpoint and relays the caller's
//! headers so the orchestrator sees the same request context.

use super::{OrchestrationError, OrchestrationRunner};
use crate::{HeaderBag, config::OrchestratorConfig};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use tracing::debug;

/// Headers never relayed to the orchestrator
///
/// Connection-scoped headers, plus `accept-encoding`: the client does not
/// decode compressed bodies, so the orchestrator must answer uncompressed.
const CONNECTION_HEADERS: &[&str] = &[
    "host",
    "accept-encoding",
    "content-length",
    "connection",
    "transfer-encoding",
    "keep-alive",
    "upgrade",
    "te",
    "trailer",
    "proxy-connection",
];

/// Orchestration service reached over HTTP
pub struct ManagedOrchestrator {
    client: reqwest::Client,
    run_url: String,
}

impl ManagedOrchestrator {
    /// Creates a new client for the configured orchestrator
    ///
    /// # Arguments
    /// * `config` - Orchestrator endpoint and optional timeout
    pub fn new(config: &OrchestratorConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        Ok(Self {
            client: builder.build()?,
            run_url: config.run_url(),
        })
    }

    pub fn run_url(&self) -> &str {
        &self.run_url
    }

    /// Translate the caller's headers into outbound request headers
    fn forwarded_headers(context: &HeaderBag) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in context.iter() {
            if CONNECTION_HEADERS
                .iter()
                .any(|skipped| skipped.eq_ignore_ascii_case(name))
            {
                continue;
            }
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_bytes(value.as_bytes()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => debug!("Skipping header {:?} that cannot be forwarded", name),
            }
        }

        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers
    }
}

#[async_trait]
impl OrchestrationRunner for ManagedOrchestrator {
    async fn run(&self, context: &HeaderBag, payload: String) -> Result<String, OrchestrationError> {
        debug!("Posting {} bytes to {}", payload.len(), self.run_url);

        let response = self
            .client
            .post(&self.run_url)
            .headers(Self::forwarded_headers(context))
            .body(payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(OrchestrationError::Rejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        String::from_utf8(body.to_vec())
            .map_err(|e| OrchestrationError::InvalidPayload(e.to_string()))
    }
}

fn map_transport_error(err: reqwest::Error) -> OrchestrationError {
    if err.is_timeout() {
        OrchestrationError::Timeout
    } else {
        OrchestrationError::Unavailable(err.to_string())
    }
}
