//! Health check handler
//!
//! ## Endpoints
//! - GET /healthcheck - Liveness check, no authentication

pub mod models;

mod healthcheck;

pub use healthcheck::healthcheck_handler;
