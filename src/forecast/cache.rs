use log::{debug, info};
use std::collections::{hash_map::Entry, HashMap};
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

struct Cached<V> {
    value: V,
    stored_at: Instant,
}

/// One key's storage. Its lock is held while the value is being produced, which is what
/// keeps a second producer for the same key from starting.
type Slot<V> = Arc<Mutex<Option<Cached<V>>>>;

/// A keyed cache whose entries expire a fixed time after they were stored.
///
/// Values are produced on demand by an async producer. Concurrent callers asking for the
/// same key share a single in-flight producer; callers for other keys are not blocked.
/// Failed productions are not stored, so the next caller tries again.
pub struct TtlCache<K, V> {
    ttl: Duration,
    slots: Mutex<HashMap<K, Slot<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Debug,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn slot(&self, key: K) -> Slot<V> {
        let mut slots = self.slots.lock().await;
        match slots.entry(key) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => entry.insert(Arc::new(Mutex::new(None))).clone(),
        }
    }

    fn is_fresh(&self, cached: &Cached<V>) -> bool {
        cached.stored_at.elapsed() < self.ttl
    }

    /// Returns the value stored for `key` if it is younger than the TTL, otherwise runs
    /// `producer` and stores what it returns.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let label = format!("{:?}", key);
        let slot = self.slot(key).await;

        // Held across the producer: other callers for this key queue up here.
        let mut guard = slot.lock().await;
        if let Some(cached) = guard.as_ref() {
            if self.is_fresh(cached) {
                debug!("Cache hit for {}", label);
                return Ok(cached.value.clone());
            }
            info!("Cache entry for {} expired", label);
        } else {
            debug!("Cache miss for {}", label);
        }

        let value = producer().await?;
        *guard = Some(Cached {
            value: value.clone(),
            stored_at: Instant::now(),
        });
        Ok(value)
    }

    /// The stored value for `key`, if there is one and it has not expired.
    pub async fn peek(&self, key: &K) -> Option<V> {
        let slot = self.slots.lock().await.get(key).cloned()?;
        let guard = slot.lock().await;
        guard
            .as_ref()
            .filter(|cached| self.is_fresh(cached))
            .map(|cached| cached.value.clone())
    }

    /// Drops the value stored for `key`. The next lookup produces a new one.
    ///
    /// The slot itself stays in place: if a producer is running for `key`, this waits for
    /// it and then discards its result, so no second producer can start alongside it.
    pub async fn invalidate(&self, key: &K) {
        let Some(slot) = self.slots.lock().await.get(key).cloned() else {
            return;
        };
        if slot.lock().await.take().is_some() {
            info!("Invalidated cache entry for {:?}", key);
        }
    }

    /// Drops every stored value, waiting for running producers like [`Self::invalidate`].
    pub async fn clear(&self) {
        let slots: Vec<Slot<V>> = self.slots.lock().await.values().cloned().collect();
        for slot in slots {
            *slot.lock().await = None;
        }
    }
}
