use serde::{Deserialize, Serialize};

/// Form fields a platform would post to `/lti/oidc/init`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedInit {
    pub init_url: String,
    pub iss: String,
    pub client_id: String,
    pub login_hint: String,
    pub target_link_uri: String,
}

/// The authorization request the tool redirected to.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulatedAuthQuery {
    pub client_id: String,
    pub nonce: String,
    pub state: String,
    #[serde(default)]
    pub login_hint: Option<String>,
    /// JSON object merged over the configured custom claims
    #[serde(default)]
    pub params: Option<String>,
}

/// What the platform would auto-post to `response_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedAuthResponse {
    pub response_url: String,
    pub id_token: String,
    pub state: String,
}
