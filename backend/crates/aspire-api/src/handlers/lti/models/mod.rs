//! Launch request and response models

mod developer_key;
mod init_params;
mod launch_context;
mod launch_form;
mod oidc_response_form;
mod session_info;

pub use developer_key::{DeveloperKey, Placement, PlatformExtension};
pub use init_params::InitParams;
pub use launch_context::{LaunchContext, LaunchFrame};
pub use launch_form::LaunchForm;
pub use oidc_response_form::OidcResponseForm;
pub use session_info::SessionInfo;
