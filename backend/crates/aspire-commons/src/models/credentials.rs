use serde::{Deserialize, Serialize};

/// Downstream API token attached to a session after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime in seconds as reported by the token endpoint
    pub expires_in: i64,
    pub token_type: String,
    /// Platform user id (numeric or opaque, kept as a JSON value)
    pub user_id: serde_json::Value,
    pub name: String,
    pub global_id: serde_json::Value,
}
