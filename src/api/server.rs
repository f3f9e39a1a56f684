//! API Server Module
//!
//! This module implements the HTTP surface of the batch retriever.
//! It exposes `GET /retrieve/{batchid}`, wraps the id in a JSON envelope,
//! runs it through the orchestration service and relays the raw result.

use crate::{
    BatchRequestEnvelope, HeaderBag, RetrievalOutcome,
    config::Config,
    orchestration::{OrchestrationError, OrchestrationRunner},
};
use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state that is accessible across all request handlers
///
/// Holds only the orchestration collaborator; everything derived from a
/// request lives in that request's handler invocation.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<dyn OrchestrationRunner>,
}

impl AppState {
    pub fn new(orchestrator: Arc<dyn OrchestrationRunner>) -> Self {
        Self { orchestrator }
    }
}

/// The main API server struct
///
/// Encapsulates the server configuration and application state.
pub struct Server {
    config: Config,
    state: AppState,
}

impl Server {
    /// Creates a new API server instance
    ///
    /// # Arguments
    /// * `config` - Server configuration (host, port, etc.)
    /// * `orchestrator` - Collaborator that produces batch payloads
    pub fn new(config: Config, orchestrator: Arc<dyn OrchestrationRunner>) -> Self {
        Self {
            config,
            state: AppState::new(orchestrator),
        }
    }

    /// Starts the API server and begins listening for incoming requests
    ///
    /// # Returns
    /// `Ok(())` when the server stops, or an error if binding fails
    pub async fn start(self) -> anyhow::Result<()> {
        let app = router(self.state);

        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);
        info!("API server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Path prefix shared by both retrieve routes
const RETRIEVE_PREFIX: &str = "/retrieve/";

/// Build the router serving the retrieve endpoint
///
/// `/retrieve/` is routed explicitly so an empty id still reaches the
/// orchestrator instead of falling through to 404.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/retrieve/:batchid", get(handle_retrieve))
        .route(RETRIEVE_PREFIX, get(handle_retrieve))
        .with_state(state)
}

/// Read the batch id straight from the request path
///
/// The `:batchid` capture is not used: its extractor rejects ids that decode
/// to invalid UTF-8, while every id must reach the orchestrator.
async fn handle_retrieve(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let batchid = batchid_from_path(uri.path());
    retrieve(&state, batchid, &headers).await.into_response()
}

/// Percent-decode the segment after `/retrieve/`, replacing invalid UTF-8
pub fn batchid_from_path(path: &str) -> String {
    let segment = path.strip_prefix(RETRIEVE_PREFIX).unwrap_or_default();
    let decoded = urlencoding::decode_binary(segment.as_bytes());
    String::from_utf8_lossy(&decoded).into_owned()
}

/// Run one retrieval
///
/// The envelope is handed to the orchestrator together with the caller's
/// headers; the result carries the caller's own `Content-Type` back.
pub async fn retrieve(state: &AppState, batchid: String, headers: &HeaderMap) -> RetrievalOutcome {
    let context = HeaderBag::from_header_map(headers);
    let envelope = BatchRequestEnvelope::new(batchid);

    let payload = match envelope.to_payload() {
        Ok(payload) => payload,
        Err(e) => {
            return RetrievalOutcome::CollaboratorFailure(OrchestrationError::InvalidPayload(
                e.to_string(),
            ));
        }
    };

    let outcome = match state.orchestrator.run(&context, payload).await {
        Ok(payload) => RetrievalOutcome::Success {
            payload,
            content_type: context.content_type().cloned(),
        },
        Err(e) => RetrievalOutcome::CollaboratorFailure(e),
    };

    info!(batchid = %envelope.batchid, "request processed");
    outcome
}

impl IntoResponse for RetrievalOutcome {
    fn into_response(self) -> Response {
        match self {
            RetrievalOutcome::Success {
                payload,
                content_type,
            } => {
                let mut response = Response::new(Body::from(payload));
                if let Some(content_type) = content_type {
                    response.headers_mut().insert(CONTENT_TYPE, content_type);
                }
                response
            }
            RetrievalOutcome::CollaboratorFailure(err) => {
                error!("Orchestration failed: {}", err);
                let status = match err {
                    OrchestrationError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::BAD_GATEWAY,
                };
                let mut response = Response::new(Body::from(format!("orchestration failed: {}", err)));
                *response.status_mut() = status;
                response
            }
        }
    }
}
