//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway handler and HTTP layer produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (forward counters and latency histograms)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape (optional)
//! ```
//!
//! # Design Decisions
//! - Observability never changes response content
//! - Request ID is attached to every request span

pub mod logging;
pub mod metrics;
