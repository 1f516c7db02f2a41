//! Launch response models

use aspire_auth::LaunchOutcome;
use aspire_commons::StorageTarget;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Returned by the OIDC response endpoint; the launch frame posts it on to
/// `/lti/launch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchFrame {
    pub session_id: String,
    pub storage_target: StorageTarget,
    pub target_link_uri: String,
    pub oidc_auth_domain: String,
}

impl From<LaunchOutcome> for LaunchFrame {
    fn from(outcome: LaunchOutcome) -> Self {
        Self {
            session_id: outcome.session_id,
            storage_target: outcome.storage_target,
            target_link_uri: outcome.target_link_uri,
            oidc_auth_domain: outcome.platform_auth_domain,
        }
    }
}

/// Launch context handed to the client application.
///
/// The custom claims are flattened into the top level next to the
/// transport fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchContext {
    #[serde(flatten)]
    pub claims: Map<String, Value>,
    pub storage_target: StorageTarget,
    pub tool_domain: String,
    pub oidc_auth_domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_header: Option<String>,
}

const RESERVED_KEYS: [&str; 5] = [
    "storage_target",
    "tool_domain",
    "oidc_auth_domain",
    "session_id",
    "session_header",
];

impl LaunchContext {
    pub fn new(
        mut claims: Map<String, Value>,
        storage_target: StorageTarget,
        tool_domain: impl Into<String>,
        oidc_auth_domain: impl Into<String>,
    ) -> Self {
        for key in RESERVED_KEYS {
            claims.remove(key);
        }
        Self {
            claims,
            storage_target,
            tool_domain: tool_domain.into(),
            oidc_auth_domain: oidc_auth_domain.into(),
            session_id: None,
            session_header: None,
        }
    }

    /// Hand the session id to a client that has to send it as a header.
    pub fn with_header_transport(
        mut self,
        session_id: impl Into<String>,
        header_name: impl Into<String>,
    ) -> Self {
        self.session_id = Some(session_id.into());
        self.session_header = Some(header_name.into());
        self
    }
}
