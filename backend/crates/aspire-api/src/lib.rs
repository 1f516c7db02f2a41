// Aspire API Library
//
// This crate provides the HTTP layer of the Aspire LTI gateway:
// the launch handshake endpoints, guarded session endpoints,
// and the JSON error mapping shared by every handler.

pub mod context;
pub mod error;
pub mod handlers;
pub mod routes;

pub use context::{DevSimulator, ToolContext};
pub use error::ApiError;
pub use routes::configure_routes;
