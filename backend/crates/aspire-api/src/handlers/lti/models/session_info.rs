use aspire_commons::{RoleProvider, Session};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Description of the caller's session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub client_id: Option<String>,
    pub roles: Vec<String>,
    pub context: Map<String, Value>,
}

impl SessionInfo {
    pub fn new(session: &Session, role_provider: &dyn RoleProvider) -> Self {
        let mut roles: Vec<String> = session.roles(role_provider).into_iter().collect();
        roles.sort();
        Self {
            session_id: session.session_id.clone(),
            client_id: session.client_id.clone(),
            roles,
            context: session.id_token.custom_claims().cloned().unwrap_or_default(),
        }
    }
}
