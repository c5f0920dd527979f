// SPDX-License-Identifier: AGPL-3.0
// Feira Ofertas Core - Offer query cache
//
// Keyed in-memory cache for offer lists and details. Entries are fresh for
// a short window; mutations invalidate the keys they touch. Concurrent
// identical reads may still race to the network, the backend is the
// arbiter.

use crate::types::{Offer, OfferPageQuery, Page};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// How long a cached entry is served without a refetch
pub const STALE_AFTER: Duration = Duration::from_secs(60);

/// Whether a list key covers the public listing or the caller's own offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListScope {
    Public,
    Mine,
}

/// Cache key for a list query: scope plus the full query parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListKey {
    pub scope: ListScope,
    pub query: OfferPageQuery,
}

struct Entry<T> {
    value: T,
    fetched_at: Instant,
}

impl<T: Clone> Entry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
        }
    }

    fn fresh_value(&self, stale_after: Duration) -> Option<T> {
        (self.fetched_at.elapsed() < stale_after).then(|| self.value.clone())
    }
}

/// In-memory cache of offer pages and offer details
pub struct OfferCache {
    lists: RwLock<HashMap<ListKey, Entry<Page<Offer>>>>,
    details: RwLock<HashMap<i64, Entry<Offer>>>,
    stale_after: Duration,
}

impl OfferCache {
    pub fn new() -> Self {
        Self::with_stale_after(STALE_AFTER)
    }

    /// Cache with an explicit freshness window
    pub fn with_stale_after(stale_after: Duration) -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
            details: RwLock::new(HashMap::new()),
            stale_after,
        }
    }

    /// Get a fresh list entry, if one exists
    pub fn get_list(&self, key: &ListKey) -> Option<Page<Offer>> {
        self.lists
            .read()
            .unwrap()
            .get(key)
            .and_then(|e| e.fresh_value(self.stale_after))
    }

    pub fn put_list(&self, key: ListKey, page: Page<Offer>) {
        let mut lists = self.lists.write().unwrap();
        // Inserts double as garbage collection so the map stays bounded by
        // the set of queries issued within one freshness window
        lists.retain(|_, e| e.fetched_at.elapsed() < self.stale_after);
        lists.insert(key, Entry::new(page));
    }

    /// Get a fresh detail entry, if one exists
    pub fn get_detail(&self, id: i64) -> Option<Offer> {
        self.details
            .read()
            .unwrap()
            .get(&id)
            .and_then(|e| e.fresh_value(self.stale_after))
    }

    pub fn put_detail(&self, offer: Offer) {
        let mut details = self.details.write().unwrap();
        details.retain(|_, e| e.fetched_at.elapsed() < self.stale_after);
        details.insert(offer.id, Entry::new(offer));
    }

    /// Drop every cached list page, whatever its scope or query
    pub fn invalidate_lists(&self) {
        self.lists.write().unwrap().clear();
    }

    /// Drop the cached detail entry for one offer
    pub fn invalidate_detail(&self, id: i64) {
        self.details.write().unwrap().remove(&id);
    }

    /// Drop everything
    pub fn clear(&self) {
        self.lists.write().unwrap().clear();
        self.details.write().unwrap().clear();
    }
}

impl Default for OfferCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OfferStatus, Pageable, Sort};
    use chrono::Utc;

    fn offer(id: i64) -> Offer {
        Offer {
            id,
            product_name: "Tomate".to_string(),
            price: 4.5,
            quantity: 3,
            description: String::new(),
            status: OfferStatus::Pending,
            created_at: Utc::now(),
            photo_url: None,
            merchant_name: "Quitanda da Ana".to_string(),
            admin_name: None,
        }
    }

    fn page(offers: Vec<Offer>) -> Page<Offer> {
        let sort = Sort {
            empty: true,
            sorted: false,
            unsorted: true,
        };
        Page {
            number_of_elements: offers.len() as u32,
            total_elements: offers.len() as u64,
            empty: offers.is_empty(),
            content: offers,
            pageable: Pageable {
                page_number: 0,
                page_size: 10,
                sort: sort.clone(),
                offset: 0,
                paged: true,
                unpaged: false,
            },
            total_pages: 1,
            last: true,
            size: 10,
            number: 0,
            sort,
            first: true,
        }
    }

    fn key(scope: ListScope) -> ListKey {
        ListKey {
            scope,
            query: OfferPageQuery::default(),
        }
    }

    #[test]
    fn test_fresh_entries_are_served() {
        let cache = OfferCache::new();
        cache.put_list(key(ListScope::Public), page(vec![offer(1)]));
        cache.put_detail(offer(1));

        assert!(cache.get_list(&key(ListScope::Public)).is_some());
        assert!(cache.get_detail(1).is_some());
        assert!(cache.get_detail(2).is_none());
    }

    #[test]
    fn test_stale_entries_are_not_served() {
        let cache = OfferCache::with_stale_after(Duration::ZERO);
        cache.put_list(key(ListScope::Public), page(vec![]));
        cache.put_detail(offer(1));

        assert!(cache.get_list(&key(ListScope::Public)).is_none());
        assert!(cache.get_detail(1).is_none());
    }

    #[test]
    fn test_invalidate_lists_drops_every_scope() {
        let cache = OfferCache::new();
        cache.put_list(key(ListScope::Public), page(vec![]));
        cache.put_list(key(ListScope::Mine), page(vec![]));
        cache.put_detail(offer(1));

        cache.invalidate_lists();

        assert!(cache.get_list(&key(ListScope::Public)).is_none());
        assert!(cache.get_list(&key(ListScope::Mine)).is_none());
        // Details survive a list-only invalidation
        assert!(cache.get_detail(1).is_some());
    }

    #[test]
    fn test_invalidate_detail_is_per_offer() {
        let cache = OfferCache::new();
        cache.put_detail(offer(1));
        cache.put_detail(offer(2));

        cache.invalidate_detail(1);

        assert!(cache.get_detail(1).is_none());
        assert!(cache.get_detail(2).is_some());
    }

    #[test]
    fn test_inserts_evict_stale_entries() {
        let cache = OfferCache::with_stale_after(Duration::ZERO);
        for page_number in 0..20 {
            let key = ListKey {
                scope: ListScope::Public,
                query: OfferPageQuery {
                    name: None,
                    page: page_number,
                    size: 10,
                },
            };
            cache.put_list(key, page(vec![]));
        }
        for id in 0..20 {
            cache.put_detail(offer(id));
        }

        // Every earlier entry was already stale at insert time
        assert_eq!(cache.lists.read().unwrap().len(), 1);
        assert_eq!(cache.details.read().unwrap().len(), 1);
    }

    #[test]
    fn test_distinct_queries_are_distinct_keys() {
        let cache = OfferCache::new();
        cache.put_list(key(ListScope::Public), page(vec![]));

        let filtered = ListKey {
            scope: ListScope::Public,
            query: OfferPageQuery {
                name: Some("tomate".to_string()),
                page: 0,
                size: 10,
            },
        };
        assert!(cache.get_list(&filtered).is_none());
    }
}
