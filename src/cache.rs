use bytes::Bytes;
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

struct Entry {
    body: Bytes,
    stored_at: Instant,
}

/// Time-bounded cache for rendered page bodies, keyed by route path + query.
///
/// Concurrent population is allowed to race; the last write wins. `clear` is
/// the manual, all-entries invalidation.
pub struct PageCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
}

impl PageCache {
    pub fn new(ttl: Duration) -> PageCache {
        PageCache {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Bytes> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                    return Some(entry.body.clone())
                }
                Some(_) => {}
                None => return None,
            }
        }
        // Expired: reclaim the entry rather than letting it sit in the map.
        let mut entries = self.entries.write().await;
        let still_expired = entries
            .get(key)
            .map(|entry| entry.stored_at.elapsed() >= self.ttl)
            .unwrap_or(false);
        if still_expired {
            entries.remove(key);
        }
        None
    }

    pub async fn set(&self, key: &str, body: Bytes) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        entries.insert(
            key.to_string(),
            Entry {
                body,
                stored_at: Instant::now(),
            },
        );
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
