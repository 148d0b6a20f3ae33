// Single-entry response cache with a fixed time-to-live
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

struct CacheEntry<T> {
    value: T,
    fetched_at: Instant,
}

/// Absorbs near-simultaneous duplicate fetches. Entries expire by monotonic age
/// only, so wall-clock steps (DST, NTP) never extend or cut short a lifetime.
pub struct TtlCache<T> {
    ttl: Duration,
    entry: Mutex<Option<CacheEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    pub async fn get(&self) -> Option<T> {
        let entry = self.entry.lock().await;
        let entry = entry.as_ref()?;
        if entry.fetched_at.elapsed() < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub async fn set(&self, value: T) {
        *self.entry.lock().await = Some(CacheEntry {
            value,
            fetched_at: Instant::now(),
        });
    }

    pub async fn clear(&self) {
        *self.entry.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = TtlCache::new(Duration::from_secs(5));
        assert_eq!(cache.get().await, None::<u32>);

        cache.set(7).await;
        tokio::time::advance(Duration::from_millis(4999)).await;
        assert_eq!(cache.get().await, Some(7));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear() {
        let cache = TtlCache::new(Duration::from_secs(5));
        cache.set("latest".to_string()).await;

        cache.clear().await;

        assert_eq!(cache.get().await, None);
    }
}
