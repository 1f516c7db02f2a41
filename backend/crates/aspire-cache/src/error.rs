use crate::store::StoreKind;
use aspire_commons::ids::fingerprint;

/// Errors produced by a [`SessionCache`](crate::SessionCache).
///
/// Keys are secrets, so the rendered message only carries a fingerprint.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// `create` was called with a key that is already live in the store.
    #[error("Key '{}' already exists in the {store} store", fingerprint(.key))]
    DuplicateKey { store: StoreKind, key: String },

    /// `set` targeted a session that is absent or expired.
    #[error("Session '{}' not found", fingerprint(.0))]
    NotFound(String),
}

pub type CacheResult<T> = Result<T, CacheError>;
