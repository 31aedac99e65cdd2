//! Gateway error taxonomy and its mapping to caller-facing JSON.
//!
//! Every failure is caught at the handler boundary and rendered as a JSON
//! envelope. Only the error message reaches the caller.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::gateway::params::REQUIRED_PARAMS;

/// Errors that can occur while relaying a search.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// One or more of `postStr`, `type`, `tk` absent or empty.
    #[error("missing required parameters")]
    MissingParameters,

    /// Upstream answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    /// Upstream answered 2xx with a body that is not JSON.
    #[error("upstream returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The forward did not complete within the configured bound.
    #[error("upstream request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Connection, TLS, or protocol failure talking to upstream. Holds no URL,
    /// since the outbound URL carries the caller's token.
    #[error("upstream transport error: {0}")]
    Transport(reqwest::Error),

    /// Upstream client could not be constructed.
    #[error("invalid upstream configuration: {0}")]
    InvalidUpstream(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Transport(e.without_url())
    }
}

impl GatewayError {
    /// Status code relayed to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MissingParameters => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamStatus { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            GatewayError::MissingParameters => "invalid_params",
            GatewayError::UpstreamStatus { .. } => "upstream_status",
            GatewayError::InvalidJson(_) => "invalid_json",
            GatewayError::Timeout(_) => "timeout",
            GatewayError::Transport(_) => "transport",
            GatewayError::InvalidUpstream(_) => "config",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            GatewayError::MissingParameters => {
                tracing::warn!("Rejected search with missing parameters");
                json!({
                    "error": "missing required parameters",
                    "required": REQUIRED_PARAMS,
                })
            }
            GatewayError::UpstreamStatus { status, body } => {
                tracing::error!(status = status.as_u16(), body = %body, "Upstream request failed");
                json!({
                    "error": "upstream request failed",
                    "status": status.as_u16(),
                    "message": body,
                })
            }
            other => {
                tracing::error!(error = %other, "Proxy request failed");
                json!({
                    "error": "proxy request failed",
                    "message": other.to_string(),
                })
            }
        };
        (status, Json(body)).into_response()
    }
}
