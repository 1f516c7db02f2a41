//! LTI 1.3 launch handlers
//!
//! ## Endpoints
//! - GET|POST /lti/oidc/init - Third-party initiated login, redirects to the platform
//! - POST /lti/oidc/response - Platform authentication response carrying the `id_token`
//! - POST /lti/launch - Binds the new session to the browser and returns the launch context
//! - POST /lti/logout - Ends the caller's session
//! - GET /lti/session - Describes the caller's session
//! - GET /lti/public_jwk - Tool public key
//! - GET /lti/developer_key - Tool registration document

pub mod models;

mod developer_key;
mod init;
mod launch;
mod logout;
mod oidc_response;
mod public_jwk;
mod session;

pub use developer_key::developer_key_handler;
pub use init::{oidc_init_get_handler, oidc_init_post_handler};
pub use launch::launch_handler;
pub use logout::logout_handler;
pub use oidc_response::oidc_response_handler;
pub use public_jwk::public_jwk_handler;
pub use session::session_handler;
