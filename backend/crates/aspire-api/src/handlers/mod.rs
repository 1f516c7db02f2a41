//! HTTP handlers
//!
//! - `lti`: launch handshake and guarded session endpoints
//! - `health`: unauthenticated health check
//! - `dev`: local launch simulator

pub mod dev;
pub mod health;
pub mod lti;

pub use dev::{dev_auth_handler, dev_init_handler, dev_launch_handler};
pub use health::healthcheck_handler;
pub use lti::{
    developer_key_handler, launch_handler, logout_handler, oidc_init_get_handler,
    oidc_init_post_handler, oidc_response_handler, public_jwk_handler, session_handler,
};
