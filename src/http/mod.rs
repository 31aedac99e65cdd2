//! HTTP listener subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (request ID, tracing span)
//!     → cors.rs (CORS headers on every response, OPTIONS short-circuit)
//!     → server.rs (routing: search, health, JSON 404 fallback)
//!     → gateway handler
//!     → Send to client
//! ```

pub mod cors;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{build_router, AppState, GatewayServer, HEALTH_PATH, SEARCH_PATH};
