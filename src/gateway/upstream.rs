//! Outbound client for the upstream search API.
//!
//! # Responsibilities
//! - Build the upstream URL from validated parameters
//! - Attach the browser-like header set upstream expects
//! - Issue exactly one GET per inbound search, bounded by the configured timeout
//! - Hand back the body untouched once it is known to be JSON

use std::time::Duration;

use axum::body::Bytes;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use serde_json::Value;
use url::Url;

use crate::config::UpstreamConfig;
use crate::gateway::error::GatewayError;
use crate::gateway::params::SearchParams;

/// A successful upstream answer. The body is opaque and relayed verbatim.
#[derive(Debug, Clone)]
pub struct UpstreamPayload {
    pub body: Bytes,
    /// Length of a top-level `pois` array, for diagnostics only.
    pub poi_count: usize,
}

/// HTTP client bound to one upstream search endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

impl UpstreamClient {
    /// Build a client from configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| GatewayError::InvalidUpstream(format!("{}: {e}", config.base_url)))?;

        let mut headers = HeaderMap::with_capacity(config.spoofed_headers.len());
        for (name, value) in &config.spoofed_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| GatewayError::InvalidUpstream(format!("header {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| GatewayError::InvalidUpstream(format!("header {name}: {e}")))?;
            headers.insert(name, value);
        }

        let client = Client::builder().no_proxy().build()?;
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));

        Ok(Self {
            client,
            base_url,
            headers,
            timeout,
        })
    }

    /// Outbound URL for a search. Only the payload is percent-encoded.
    pub fn search_url(&self, params: &SearchParams) -> String {
        format!(
            "{}?postStr={}&type={}&tk={}",
            self.base_url,
            urlencoding::encode(&params.post_str),
            params.query_type,
            params.tk
        )
    }

    /// Forward one search and return the upstream JSON body.
    pub async fn forward(&self, params: &SearchParams) -> Result<UpstreamPayload, GatewayError> {
        let url = self.search_url(params);
        tracing::info!(url = %redact_token(&url, &params.tk), "Forwarding search request");

        let body = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(&url))
                .await
                .map_err(|_| GatewayError::Timeout(limit))??,
            None => self.exchange(&url).await?,
        };

        let value: Value = serde_json::from_slice(&body)?;
        Ok(UpstreamPayload {
            poi_count: poi_count(&value),
            body,
        })
    }

    async fn exchange(&self, url: &str) -> Result<Bytes, GatewayError> {
        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(GatewayError::UpstreamStatus { status, body });
        }

        Ok(response.bytes().await?)
    }
}

/// Best-effort count of a top-level `pois` array.
pub fn poi_count(value: &Value) -> usize {
    value
        .get("pois")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

fn redact_token(url: &str, tk: &str) -> String {
    url.replace(&format!("tk={tk}"), "tk=<redacted>")
}
