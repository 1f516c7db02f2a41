//! aspire-configs
//!
//! Server configuration types and loader for the Aspire LTI gateway.

pub mod config;

pub use config::*;
pub use config::defaults;
