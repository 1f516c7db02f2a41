use serde::{Deserialize, Serialize};

/// Form posted by the launch frame once the handshake completed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LaunchForm {
    /// Explicit session id; falls back to the cookie or header when empty
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub storage_target: String,
    #[serde(default)]
    pub oidc_auth_domain: String,
}
