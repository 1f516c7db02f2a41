//! Cache contract shared by every backing store.
//!
//! The gateway only talks to [`SessionCache`] through `Arc<dyn SessionCache>`,
//! so a distributed implementation can replace [`InMemoryCache`](crate::InMemoryCache)
//! without touching the launch or guard logic.

use crate::error::CacheResult;
use aspire_commons::{NonceRecord, Session, SessionUpdate};
use async_trait::async_trait;
use std::fmt;

/// Logical store a key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// In-flight launch attempts, keyed by nonce. Read at most once.
    Nonce,
    /// Authenticated clients, keyed by session id.
    Session,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Nonce => "nonce",
            StoreKind::Session => "session",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value held by the cache.
#[derive(Debug, Clone)]
pub enum CacheRecord {
    Nonce(NonceRecord),
    Session(Session),
}

impl CacheRecord {
    pub fn key(&self) -> &str {
        match self {
            CacheRecord::Nonce(record) => &record.nonce,
            CacheRecord::Session(session) => &session.session_id,
        }
    }

    pub fn store(&self) -> StoreKind {
        match self {
            CacheRecord::Nonce(_) => StoreKind::Nonce,
            CacheRecord::Session(_) => StoreKind::Session,
        }
    }

    pub fn into_nonce(self) -> Option<NonceRecord> {
        match self {
            CacheRecord::Nonce(record) => Some(record),
            CacheRecord::Session(_) => None,
        }
    }

    pub fn into_session(self) -> Option<Session> {
        match self {
            CacheRecord::Session(session) => Some(session),
            CacheRecord::Nonce(_) => None,
        }
    }
}

impl From<NonceRecord> for CacheRecord {
    fn from(record: NonceRecord) -> Self {
        CacheRecord::Nonce(record)
    }
}

impl From<Session> for CacheRecord {
    fn from(session: Session) -> Self {
        CacheRecord::Session(session)
    }
}

/// Nonce and session storage used by the launch handshake and the auth guard.
///
/// Every operation is atomic per key:
/// - `create` inserts only if the key is absent
/// - `get` on [`StoreKind::Nonce`] removes and returns in one step, so two
///   racing readers of one nonce see exactly one hit
/// - `get` on [`StoreKind::Session`] returns a copy and refreshes the idle timer
/// - `set` is serialized per session id
///
/// Expired entries are never returned, even before the reaper removes them.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Insert a new record. Fails with `DuplicateKey` if the key is live.
    async fn create(&self, record: CacheRecord) -> CacheResult<()>;

    /// Look up a record. Destructive for nonces.
    async fn get(&self, key: &str, store: StoreKind) -> Option<CacheRecord>;

    /// Replace one field of a live session and return the updated copy.
    async fn set(&self, session_id: &str, update: SessionUpdate) -> CacheResult<Session>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str, store: StoreKind);

    /// Drop every entry in one store.
    async fn clear(&self, store: StoreKind);

    /// Number of live entries in one store.
    fn entry_count(&self, store: StoreKind) -> u64;

    /// Physically remove expired entries.
    async fn run_maintenance(&self);

    /// Consume the nonce record for `nonce`.
    async fn take_nonce(&self, nonce: &str) -> Option<NonceRecord> {
        self.get(nonce, StoreKind::Nonce)
            .await
            .and_then(CacheRecord::into_nonce)
    }

    async fn get_session(&self, session_id: &str) -> Option<Session> {
        self.get(session_id, StoreKind::Session)
            .await
            .and_then(CacheRecord::into_session)
    }
}
