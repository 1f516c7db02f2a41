// Aspire Authentication Library
// LTI 1.3 launch handshake, session resolution and role checks

pub mod error;
pub mod extractor;
pub mod guard;
pub mod helpers;
pub mod launch;

pub use error::LtiError;
pub use extractor::LtiSession;
pub use guard::{AuthGuard, SessionIdSource};
pub use launch::{AuthRedirect, LaunchHandshake, LaunchOutcome, LaunchState, LoginInitiation};
