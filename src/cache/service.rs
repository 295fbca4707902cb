//! Geocode Cache Service
//!
//! The orchestrator combining the hot cache, the in-flight request table, the
//! injected resolver client, and the durable mirror behind the public
//! resolve/clear/stats surface.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheKey, HotCache, ResolveStats};
use crate::error::{GeocodeError, Result, StorageError};
use crate::provider::{Lang, ResolvedAddress, ReverseGeocoder};
use crate::storage::DurableStore;

/// Callback receiving storage failures that were contained at the adapter
/// boundary, for hosts that want to log or monitor them.
pub type StorageObserver = Arc<dyn Fn(&StorageError) + Send + Sync>;

/// The shared outcome of one resolution, broadcast to every attached caller.
type Outcome = Result<ResolvedAddress>;

// == Geocode Cache ==
/// Coordinate-resolution cache front.
///
/// One instance owns its hot cache, in-flight table, and counters, so
/// isolated instances can coexist. The resolver client and the durable store
/// are injected by the host; until a provider is installed, lookups that
/// cannot be served from the hot cache fail with
/// [`GeocodeError::ProviderUnavailable`].
///
/// The in-flight table is the sole serialization point: among any number of
/// concurrent callers for the same normalized key, exactly one provider call
/// is issued and all callers observe its outcome.
pub struct GeocodeCache {
    /// Fast path for all lookups
    hot: Arc<RwLock<HotCache>>,
    /// Key → sender of the single outstanding resolution for that key
    in_flight: Arc<Mutex<HashMap<CacheKey, broadcast::Sender<Outcome>>>>,
    /// Operational counters
    stats: Mutex<ResolveStats>,
    /// Injected resolver client; None until the host installs one
    provider: RwLock<Option<Arc<dyn ReverseGeocoder>>>,
    /// Injected durable mirror; None means memory-only
    store: RwLock<Option<Arc<dyn DurableStore>>>,
    /// Optional hook observing contained storage failures
    observer: Mutex<Option<StorageObserver>>,
    /// Entry TTL in seconds
    ttl_secs: u64,
    /// Decimal places kept by the key normalizer
    coord_precision: u32,
}

impl GeocodeCache {
    // == Constructor ==
    /// Creates a memory-only cache with no provider installed.
    ///
    /// # Arguments
    /// * `max_entries` - Size bound of the hot cache
    /// * `ttl_secs` - Entry TTL in seconds
    /// * `coord_precision` - Decimal places kept when normalizing coordinates
    pub fn new(max_entries: usize, ttl_secs: u64, coord_precision: u32) -> Self {
        Self {
            hot: Arc::new(RwLock::new(HotCache::new(max_entries, ttl_secs))),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            stats: Mutex::new(ResolveStats::new()),
            provider: RwLock::new(None),
            store: RwLock::new(None),
            observer: Mutex::new(None),
            ttl_secs,
            coord_precision,
        }
    }

    // == Set Provider ==
    /// Installs the resolver client once the host has constructed it.
    pub fn set_provider(&self, provider: Arc<dyn ReverseGeocoder>) {
        *self.provider.write() = Some(provider);
    }

    // == Attach Store ==
    /// Installs the durable mirror and rehydrates the hot cache from it.
    ///
    /// Only entries still within TTL are loaded; expired rows are skipped. A
    /// failed read is contained: the cache keeps running memory-first and the
    /// observer hook (if any) is notified.
    ///
    /// Returns the number of entries rehydrated.
    pub fn attach_store(&self, store: Arc<dyn DurableStore>) -> usize {
        *self.store.write() = Some(Arc::clone(&store));

        match store.load_all() {
            Ok(rows) => {
                let mut hot = self.hot.write();
                let mut loaded = 0;
                for (key, entry) in rows {
                    if !entry.is_expired(self.ttl_secs) {
                        hot.insert(key, entry);
                        loaded += 1;
                    }
                }
                info!(loaded, "hot cache rehydrated from durable mirror");
                loaded
            }
            Err(err) => {
                warn!(error = %err, "durable mirror load failed; continuing without rehydration");
                self.notify_observer(&err);
                0
            }
        }
    }

    // == Set Storage Observer ==
    /// Registers a hook invoked with every contained storage failure.
    #[allow(dead_code)]
    pub fn set_storage_observer(&self, observer: StorageObserver) {
        *self.observer.lock() = Some(observer);
    }

    // == Resolve ==
    /// Resolves a coordinate pair to a formatted address.
    ///
    /// Hot-cache hits return immediately. On a miss, concurrent callers for
    /// the same normalized key share a single provider call and its outcome.
    /// Fails only with [`GeocodeError::ProviderUnavailable`] or
    /// [`GeocodeError::Provider`]; cache and storage problems never surface
    /// here.
    pub async fn resolve(&self, lat: f64, lng: f64, lang: Lang) -> Result<ResolvedAddress> {
        let key = CacheKey::build(lat, lng, lang, self.coord_precision);

        if let Some(entry) = self.hot.read().get(&key).cloned() {
            self.stats.lock().record_hit();
            debug!(%key, "hot cache hit");
            return Ok(ResolvedAddress {
                address: entry.address,
                details: entry.details,
            });
        }

        let mut rx = {
            let mut in_flight = self.in_flight.lock();
            if let Some(tx) = in_flight.get(&key) {
                // Piggyback on the outstanding resolution for this key
                self.stats.lock().record_deduplicated();
                debug!(%key, "attached to in-flight resolution");
                tx.subscribe()
            } else {
                let provider = self
                    .provider
                    .read()
                    .clone()
                    .ok_or(GeocodeError::ProviderUnavailable)?;

                self.stats.lock().record_miss();
                debug!(%key, "hot cache miss, issuing provider call");

                let (tx, rx) = broadcast::channel(1);
                in_flight.insert(key.clone(), tx.clone());
                self.spawn_resolution(key.clone(), lat, lng, lang, provider, tx);
                rx
            }
        };

        match rx.recv().await {
            Ok(outcome) => outcome,
            // The sender task settles every resolution; a closed channel
            // without a value means it was torn down mid-flight.
            Err(_) => Err(GeocodeError::Provider(
                "resolution task dropped before settling".to_string(),
            )),
        }
    }

    // == Spawn Resolution ==
    /// Drives one provider call to completion on its own task, so it settles
    /// and releases its key even if every caller goes away.
    fn spawn_resolution(
        &self,
        key: CacheKey,
        lat: f64,
        lng: f64,
        lang: Lang,
        provider: Arc<dyn ReverseGeocoder>,
        tx: broadcast::Sender<Outcome>,
    ) {
        let hot = Arc::clone(&self.hot);
        let in_flight = Arc::clone(&self.in_flight);
        let store = self.store.read().clone();
        let observer = self.observer.lock().clone();

        tokio::spawn(async move {
            let outcome = match provider.reverse_geocode(lat, lng, lang).await {
                Ok(resolved) => {
                    let entry = CacheEntry::new(resolved.address.clone(), resolved.details.clone());
                    hot.write().insert(key.clone(), entry.clone());
                    if let Some(store) = store {
                        mirror_to_store(store, key.clone(), entry, observer);
                    }
                    Ok(resolved)
                }
                Err(err) => {
                    // Failures are never cached; the next lookup retries
                    warn!(%key, error = %err, "resolution failed");
                    Err(err)
                }
            };

            // Clear the marker before publishing so the key is free for a
            // fresh attempt the instant the outcome is visible
            in_flight.lock().remove(&key);
            let _ = tx.send(outcome);
        });
    }

    // == Clear Cache ==
    /// Empties the hot cache only; the durable mirror is left as-is.
    ///
    /// Returns the number of entries removed.
    pub fn clear_cache(&self) -> usize {
        let removed = self.hot.write().clear();
        info!(removed, "hot cache cleared");
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the resolution counters.
    pub fn stats(&self) -> ResolveStats {
        self.stats.lock().clone()
    }

    // == Reset Stats ==
    /// Zeroes all resolution counters.
    pub fn reset_stats(&self) {
        self.stats.lock().reset();
    }

    // == Length ==
    /// Current number of hot-cache slots in use, stale entries included.
    pub fn len(&self) -> usize {
        self.hot.read().len()
    }

    /// Returns true if the hot cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.hot.read().is_empty()
    }

    // == Sweep Expired ==
    /// Removes expired entries from the hot cache; used by the maintenance
    /// task. Returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        self.hot.write().remove_expired()
    }

    // == Prune Store ==
    /// Deletes expired rows from the durable mirror, if one is attached.
    /// Failures are contained like every other storage error.
    ///
    /// Returns the number of rows removed.
    pub async fn prune_store(&self) -> usize {
        let Some(store) = self.store.read().clone() else {
            return 0;
        };
        let ttl_secs = self.ttl_secs;
        let observer = self.observer.lock().clone();

        let pruned = tokio::task::spawn_blocking(move || match store.remove_expired(ttl_secs) {
            Ok(count) => count,
            Err(err) => {
                warn!(error = %err, "durable mirror prune failed");
                if let Some(observer) = observer {
                    observer(&err);
                }
                0
            }
        })
        .await
        .unwrap_or(0);

        if pruned > 0 {
            debug!(pruned, "durable mirror pruned");
        }
        pruned
    }

    fn notify_observer(&self, err: &StorageError) {
        if let Some(observer) = self.observer.lock().clone() {
            observer(err);
        }
    }

    /// Direct hot-cache handle for tests that need to plant entries.
    #[cfg(test)]
    pub(crate) fn hot_handle(&self) -> Arc<RwLock<HotCache>> {
        Arc::clone(&self.hot)
    }
}

/// Best-effort asynchronous mirror write; never awaited by the hot path.
fn mirror_to_store(
    store: Arc<dyn DurableStore>,
    key: CacheKey,
    entry: CacheEntry,
    observer: Option<StorageObserver>,
) {
    tokio::task::spawn_blocking(move || {
        if let Err(err) = store.put(&key, &entry) {
            warn!(%key, error = %err, "durable mirror write failed");
            if let Some(observer) = observer {
                observer(&err);
            }
        }
    });
}
