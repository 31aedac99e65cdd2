//! Search forwarding handlers.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};

use crate::gateway::error::GatewayError;
use crate::gateway::params::{RawSearchParams, SearchParams};
use crate::http::server::AppState;
use crate::observability::metrics;

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// `GET /api/tdt-search`: parameters come from the query string only.
pub async fn search_get(
    State(state): State<AppState>,
    query: Result<Query<RawSearchParams>, QueryRejection>,
) -> Result<Response, GatewayError> {
    relay(&state, query_params(query)).await
}

/// `POST /api/tdt-search`: parameters from a JSON or form body, query string
/// as fallback.
pub async fn search_post(
    State(state): State<AppState>,
    query: Result<Query<RawSearchParams>, QueryRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let raw = RawSearchParams::from_body(content_type, &body).or(query_params(query));
    relay(&state, raw).await
}

fn query_params(query: Result<Query<RawSearchParams>, QueryRejection>) -> RawSearchParams {
    match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable query string");
            RawSearchParams::default()
        }
    }
}

async fn relay(state: &AppState, raw: RawSearchParams) -> Result<Response, GatewayError> {
    let params = SearchParams::from_raw(raw)?;

    let start_time = Instant::now();
    let outcome = state.upstream.forward(&params).await;
    match &outcome {
        Ok(_) => metrics::record_forward("success", 200, start_time),
        Err(e) => metrics::record_forward(e.outcome(), e.status_code().as_u16(), start_time),
    }
    let payload = outcome?;

    tracing::info!(
        poi_count = payload.poi_count,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Search relayed"
    );

    Ok(([(header::CONTENT_TYPE, JSON_UTF8)], payload.body).into_response())
}
