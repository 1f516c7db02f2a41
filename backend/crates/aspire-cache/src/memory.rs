//! In-process cache backed by two Moka stores.
//!
//! - Nonces: time-to-live, removed on first read
//! - Sessions: time-to-idle, each behind its own mutex so concurrent
//!   updates to one session are serialized without a global lock

use crate::error::{CacheError, CacheResult};
use crate::store::{CacheRecord, SessionCache, StoreKind};
use aspire_commons::ids::fingerprint;
use aspire_commons::{NonceRecord, Session, SessionUpdate};
use aspire_configs::CacheSettings;
use async_trait::async_trait;
use moka::sync::Cache;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

pub struct InMemoryCache {
    nonces: Cache<String, NonceRecord>,
    sessions: Cache<String, Arc<Mutex<Session>>>,
}

impl InMemoryCache {
    /// Build the cache from configured lifetimes.
    ///
    /// Neither store has a capacity bound: an entry leaves only through
    /// expiry, consumption or deletion, never through size-based eviction.
    pub fn new(settings: &CacheSettings) -> Self {
        Self::with_ttls(
            Duration::from_secs(settings.nonce_ttl_seconds),
            Duration::from_secs(settings.session_idle_seconds),
        )
    }

    /// Build the cache with explicit lifetimes.
    pub fn with_ttls(nonce_ttl: Duration, session_idle: Duration) -> Self {
        let nonces = Cache::builder().time_to_live(nonce_ttl).build();
        let sessions = Cache::builder().time_to_idle(session_idle).build();

        Self { nonces, sessions }
    }

    fn insert_nonce(&self, record: NonceRecord) -> CacheResult<()> {
        let key = record.nonce.clone();
        let entry = self.nonces.entry(key.clone()).or_insert_with(|| record);
        if !entry.is_fresh() {
            return Err(CacheError::DuplicateKey {
                store: StoreKind::Nonce,
                key,
            });
        }
        log::debug!("Stored nonce {}", fingerprint(&key));
        Ok(())
    }

    fn insert_session(&self, session: Session) -> CacheResult<()> {
        let key = session.session_id.clone();
        let entry = self
            .sessions
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(session)));
        if !entry.is_fresh() {
            return Err(CacheError::DuplicateKey {
                store: StoreKind::Session,
                key,
            });
        }
        log::debug!("Stored session {}", fingerprint(&key));
        Ok(())
    }

    fn take_nonce_record(&self, nonce: &str) -> Option<NonceRecord> {
        // `remove` can hand back an entry that expired but was not reaped yet
        if !self.nonces.contains_key(nonce) {
            return None;
        }
        let record = self.nonces.remove(nonce);
        if record.is_some() {
            log::debug!("Consumed nonce {}", fingerprint(nonce));
        }
        record
    }

    /// Apply `update` under the session's lock.
    ///
    /// The session may have been deleted between the lookup and the lock, so
    /// its presence is checked again while the lock is held.
    fn apply_update(
        &self,
        session_id: &str,
        entry: &Mutex<Session>,
        update: SessionUpdate,
    ) -> CacheResult<Session> {
        let field = update.field_name();
        let mut session = entry.lock();
        if !self.sessions.contains_key(session_id) {
            return Err(CacheError::NotFound(session_id.to_string()));
        }
        session.apply(update);
        log::debug!("Updated {} on session {}", field, fingerprint(session_id));
        Ok(session.clone())
    }

    fn store_len(&self, store: StoreKind) -> u64 {
        match store {
            StoreKind::Nonce => {
                self.nonces.run_pending_tasks();
                self.nonces.entry_count()
            }
            StoreKind::Session => {
                self.sessions.run_pending_tasks();
                self.sessions.entry_count()
            }
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(&CacheSettings::default())
    }
}

#[async_trait]
impl SessionCache for InMemoryCache {
    async fn create(&self, record: CacheRecord) -> CacheResult<()> {
        match record {
            CacheRecord::Nonce(record) => self.insert_nonce(record),
            CacheRecord::Session(session) => self.insert_session(session),
        }
    }

    async fn get(&self, key: &str, store: StoreKind) -> Option<CacheRecord> {
        match store {
            StoreKind::Nonce => self.take_nonce_record(key).map(CacheRecord::Nonce),
            StoreKind::Session => self
                .sessions
                .get(key)
                .map(|entry| CacheRecord::Session(entry.lock().clone())),
        }
    }

    async fn set(&self, session_id: &str, update: SessionUpdate) -> CacheResult<Session> {
        let entry = self
            .sessions
            .get(session_id)
            .ok_or_else(|| CacheError::NotFound(session_id.to_string()))?;

        self.apply_update(session_id, &entry, update)
    }

    async fn delete(&self, key: &str, store: StoreKind) {
        match store {
            StoreKind::Nonce => self.nonces.invalidate(key),
            StoreKind::Session => self.sessions.invalidate(key),
        }
    }

    async fn clear(&self, store: StoreKind) {
        match store {
            StoreKind::Nonce => self.nonces.invalidate_all(),
            StoreKind::Session => self.sessions.invalidate_all(),
        }
        log::info!("Cleared {} store", store);
    }

    fn entry_count(&self, store: StoreKind) -> u64 {
        self.store_len(store)
    }

    async fn run_maintenance(&self) {
        self.nonces.run_pending_tasks();
        self.sessions.run_pending_tasks();
    }
}
