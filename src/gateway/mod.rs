//! Gateway handler subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound search (query string or body)
//!     → params.rs (extract, reject absent/empty)
//!     → upstream.rs (build URL, spoofed headers, one bounded GET)
//!     → handler.rs (relay JSON body verbatim)
//!     → error.rs (any failure → JSON envelope + status)
//! ```
//!
//! # Design Decisions
//! - Upstream body is an opaque blob; only `pois` is peeked at for logging
//! - No retries: a failure is reported once and the caller decides
//! - No state survives a request

pub mod error;
pub mod handler;
pub mod params;
pub mod upstream;

pub use error::GatewayError;
pub use params::{RawSearchParams, SearchParams, REQUIRED_PARAMS};
pub use upstream::{UpstreamClient, UpstreamPayload};
