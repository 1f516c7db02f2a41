//! Local launch simulator
//!
//! Plays the platform's part of the launch so the tool can be exercised
//! without an LMS. Every endpoint answers 501 outside a local environment.
//!
//! ## Endpoints
//! - GET /lti/dev/init - Login initiation parameters for the simulated platform
//! - GET|POST /lti/dev/auth - Platform authorization step, mints a tool-signed `id_token`
//! - POST /lti/dev/launch - Same as /lti/launch

pub mod models;

mod auth;
mod init;
mod launch;

pub use auth::dev_auth_handler;
pub use init::dev_init_handler;
pub use launch::dev_launch_handler;

use crate::context::{DevSimulator, ToolContext};
use crate::error::ApiError;

fn simulator(tool: &ToolContext) -> Result<&DevSimulator, ApiError> {
    tool.simulator.as_ref().ok_or_else(|| {
        ApiError::NotImplemented(
            "The launch simulator is only available in a local environment".to_string(),
        )
    })
}
