//! Background task that physically removes expired cache entries.
//!
//! Expired entries are already invisible to readers; the reaper only bounds
//! memory held by abandoned handshakes and idle sessions.

use crate::store::{SessionCache, StoreKind};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct CacheReaper {
    cache: Arc<dyn SessionCache>,
}

impl CacheReaper {
    pub fn new(cache: Arc<dyn SessionCache>) -> Self {
        Self { cache }
    }

    /// Run one maintenance pass and return the live (nonce, session) counts.
    pub async fn run_once(&self) -> (u64, u64) {
        self.cache.run_maintenance().await;
        (
            self.cache.entry_count(StoreKind::Nonce),
            self.cache.entry_count(StoreKind::Session),
        )
    }

    /// Start the reaper at the given interval.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_scheduled(self, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            loop {
                ticker.tick().await;

                let (nonces, sessions) = self.run_once().await;
                log::debug!(
                    "Cache reaper pass: {} nonces, {} sessions live",
                    nonces,
                    sessions
                );
            }
        })
    }
}

/// Spawn a [`CacheReaper`] for `cache`.
pub fn spawn_reaper(cache: Arc<dyn SessionCache>, interval: Duration) -> JoinHandle<()> {
    log::info!("Starting cache reaper (interval: {:?})", interval);
    CacheReaper::new(cache).start_scheduled(interval)
}
