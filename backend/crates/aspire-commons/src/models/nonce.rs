use super::StorageTarget;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// One in-flight launch attempt, keyed by `nonce`.
///
/// Created when the platform initiates a login and consumed exactly once
/// when the matching `id_token` arrives. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonceRecord {
    pub nonce: String,
    /// CSRF token round-tripped through the platform as `state`
    pub state: String,
    pub client_id: String,
    pub target_link_uri: String,
    #[serde(default)]
    pub storage_target: StorageTarget,
}

impl NonceRecord {
    pub fn new(
        nonce: impl Into<String>,
        state: impl Into<String>,
        client_id: impl Into<String>,
        target_link_uri: impl Into<String>,
        storage_target: StorageTarget,
    ) -> Self {
        Self {
            nonce: nonce.into(),
            state: state.into(),
            client_id: client_id.into(),
            target_link_uri: target_link_uri.into(),
            storage_target,
        }
    }
}

impl PartialEq for NonceRecord {
    fn eq(&self, other: &Self) -> bool {
        self.nonce == other.nonce
    }
}

impl Eq for NonceRecord {}

impl Hash for NonceRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nonce.hash(state);
    }
}

impl fmt::Display for NonceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nonce)
    }
}
