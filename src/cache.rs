//! Short-TTL memoisation of materialised lookup results, keyed by
//! `(query domain, is_whitelist)`. Eviction is lazy: expired entries are
//! dropped when probed, and the whole cache is cleared on ingest.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use parking_lot::RwLock;

use crate::filters::url::UrlFilter;

pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

type CacheKey = (String, bool);

#[derive(Debug, Clone)]
struct CacheEntry {
    filters: Arc<Vec<UrlFilter>>,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct FilterCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl FilterCache {
    pub fn new(ttl: Duration) -> FilterCache {
        FilterCache {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, domain: &str, whitelist: bool) -> Option<Arc<Vec<UrlFilter>>> {
        let key = (domain.to_string(), whitelist);
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(&key) {
                Some(entry) if entry.expires_at > now => return Some(Arc::clone(&entry.filters)),
                Some(_) => {}
                None => return None,
            }
        }
        let mut entries = self.entries.write();
        if let Some(entry) = entries.get(&key) {
            // Re-check: another writer may have refreshed the entry
            // between the two lock acquisitions.
            if entry.expires_at > now {
                return Some(Arc::clone(&entry.filters));
            }
            entries.remove(&key);
            debug!("evicted expired filter list for {}/{}", key.0, key.1);
        }
        None
    }

    /// Stores the list with an expiry chosen now, returning the shared
    /// handle the caller hands out.
    pub fn insert(
        &self,
        domain: &str,
        whitelist: bool,
        filters: Vec<UrlFilter>,
    ) -> Arc<Vec<UrlFilter>> {
        let filters = Arc::new(filters);
        let entry = CacheEntry {
            filters: Arc::clone(&filters),
            expires_at: Instant::now() + self.ttl,
        };
        self.entries
            .write()
            .insert((domain.to_string(), whitelist), entry);
        filters
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        if !entries.is_empty() {
            debug!("dropping {} cached filter lists", entries.len());
        }
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::url::UrlFilter;

    fn some_filters() -> Vec<UrlFilter> {
        vec![UrlFilter::parse("||cached.com^", 0).unwrap()]
    }

    #[test]
    fn returns_inserted_list_until_expiry() {
        let cache = FilterCache::new(Duration::from_secs(60));
        assert!(cache.get("cached.com", false).is_none());
        cache.insert("cached.com", false, some_filters());
        let hit = cache.get("cached.com", false).unwrap();
        assert_eq!(hit.len(), 1);
        assert!(cache.get("cached.com", true).is_none());
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache = FilterCache::new(Duration::ZERO);
        cache.insert("cached.com", false, some_filters());
        assert!(cache.get("cached.com", false).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let cache = FilterCache::new(Duration::from_secs(60));
        cache.insert("a.com", false, some_filters());
        cache.insert("a.com", true, vec![]);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.get("a.com", false).is_none());
        assert!(cache.is_empty());
    }
}
