//! Tianditu search gateway library.
//!
//! Forwards browser search queries to the upstream mapping API with the
//! browser-like headers it expects, and relays the JSON answer back with
//! permissive CORS headers.

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use gateway::GatewayError;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
