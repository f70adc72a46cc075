// ── Object cache ──
//
// One bounded store per cacheable kind, routed by the registry. Kinds
// without a cache policy always miss and silently drop writes. Each store
// sits behind its own mutex so a client can be shared across threads.

mod clock;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::mapper::ObjectMapper;
use crate::model::{Entity, EntityId, EntityKind};
use crate::registry::{CachePolicy, TypeRegistry};

use self::store::{BoundedStore, Lookup};

/// Hit/miss counters and current size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

pub struct ObjectCache {
    registry: Arc<TypeRegistry>,
    stores: HashMap<EntityKind, Mutex<BoundedStore>>,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl fmt::Debug for ObjectCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectCache")
            .field("kinds", &self.registry.cacheable_kinds())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl ObjectCache {
    pub fn new(registry: Arc<TypeRegistry>, clock: Arc<dyn Clock>) -> Self {
        let stores = registry
            .cacheable_kinds()
            .into_iter()
            .filter_map(|kind| {
                let store = match registry.cache_policy(kind) {
                    CachePolicy::Lru { capacity } => BoundedStore::new(capacity, None),
                    CachePolicy::Ttl { capacity, ttl } => BoundedStore::new(capacity, Some(ttl)),
                    CachePolicy::Never => return None,
                };
                Some((kind, Mutex::new(store)))
            })
            .collect();

        Self {
            registry,
            stores,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn is_cacheable(&self, kind: EntityKind) -> bool {
        self.stores.contains_key(&kind)
    }

    // ── Single entries ──────────────────────────────────────────────

    /// Cached copy of `(kind, id)`, or `None` on miss.
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn lookup(&self, kind: EntityKind, id: &EntityId) -> Option<Entity> {
        let store = self.stores.get(&kind)?;
        let outcome = store
            .lock()
            .expect("cache lock poisoned")
            .get(id, self.clock.now());

        match outcome {
            Lookup::Hit(entity) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(entity = %kind, %id, "cache hit");
                Some(entity)
            }
            Lookup::Expired => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(entity = %kind, %id, "cache entry expired");
                None
            }
            Lookup::Missing => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(entity = %kind, %id, "cache miss");
                None
            }
        }
    }

    /// Store a copy of `entity`. Returns `false` if its kind is not cached
    /// or it has no id.
    pub fn put(&self, entity: &Entity) -> bool {
        let kind = entity.kind();
        let Some(store) = self.stores.get(&kind) else {
            return false;
        };
        let Some(id) = entity.id() else {
            return false;
        };

        let evicted = store.lock().expect("cache lock poisoned").insert(
            id,
            entity.clone(),
            self.clock.now(),
        );
        if let Some(evicted) = evicted {
            debug!(entity = %kind, id = %evicted, "cache evict");
        }
        true
    }

    pub fn invalidate(&self, kind: EntityKind, id: &EntityId) -> bool {
        let Some(store) = self.stores.get(&kind) else {
            return false;
        };
        let removed = store.lock().expect("cache lock poisoned").remove(id);
        if removed {
            debug!(entity = %kind, %id, "cache invalidate");
        }
        removed
    }

    pub fn clear(&self) {
        for store in self.stores.values() {
            store.lock().expect("cache lock poisoned").clear();
        }
    }

    /// Number of entries held for `kind` (expired ones included until touched).
    pub fn len(&self, kind: EntityKind) -> usize {
        self.stores
            .get(&kind)
            .map_or(0, |store| store.lock().expect("cache lock poisoned").len())
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self
            .stores
            .values()
            .map(|store| store.lock().expect("cache lock poisoned").len())
            .sum();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        }
    }

    // ── Pages ───────────────────────────────────────────────────────

    /// Cache everything cacheable in a raw response page.
    ///
    /// Reads the singular key for `kind` (`"ticket"`) and every plural
    /// collection key (`"tickets"`, plus sideloads like `"users"`). Search
    /// pages keyed by `results` are routed per item by `result_type`
    /// instead. Returns how many entities were stored.
    pub fn put_page(
        &self,
        mapper: &ObjectMapper,
        kind: EntityKind,
        page: &Value,
    ) -> Result<usize, CoreError> {
        let Some(map) = page.as_object() else {
            return Ok(0);
        };

        if let Some(results) = map.get("results").and_then(Value::as_array) {
            return self.put_results(mapper, results);
        }

        let mut stored = 0;
        if let Some(single) = map.get(kind.name()).filter(|v| v.is_object()) {
            stored += self.put_value(mapper, kind, single)?;
        }
        for (key, value) in map {
            let Some(items) = value.as_array() else {
                continue;
            };
            let Some(item_kind) = TypeRegistry::from_collection_key(key) else {
                continue;
            };
            if !self.is_cacheable(item_kind) {
                continue;
            }
            for item in items {
                stored += self.put_value(mapper, item_kind, item)?;
            }
        }

        debug!(entity = %kind, stored, "cached page");
        Ok(stored)
    }

    fn put_results(&self, mapper: &ObjectMapper, results: &[Value]) -> Result<usize, CoreError> {
        let mut stored = 0;
        for item in results {
            let Some(tag) = item.get("result_type").and_then(Value::as_str) else {
                warn!("search result without result_type, not cached");
                continue;
            };
            let kind = self.registry.resolve(tag)?;
            stored += self.put_value(mapper, kind, item)?;
        }
        Ok(stored)
    }

    fn put_value(&self, mapper: &ObjectMapper, kind: EntityKind, value: &Value) -> Result<usize, CoreError> {
        if !self.is_cacheable(kind) {
            return Ok(0);
        }
        let entity = mapper.build_kind(kind, value)?;
        Ok(usize::from(self.put(&entity)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::model::{Group, User};
    use serde_json::json;
    use std::time::Duration;

    fn setup(config: &CacheConfig) -> (ObjectCache, ObjectMapper, Arc<ManualClock>) {
        let registry = Arc::new(TypeRegistry::new(config));
        let clock = Arc::new(ManualClock::new());
        let cache = ObjectCache::new(Arc::clone(&registry), clock.clone());
        (cache, ObjectMapper::new(registry), clock)
    }

    fn user(id: u64) -> Entity {
        Entity::User(User {
            id: Some(id),
            ..User::default()
        })
    }

    #[test]
    fn lru_keeps_the_most_recent_n() {
        let config = CacheConfig {
            user_capacity: 3,
            ..CacheConfig::default()
        };
        let (cache, _, _) = setup(&config);
        for id in 1..=4 {
            cache.put(&user(id));
        }

        assert!(cache.lookup(EntityKind::User, &1.into()).is_none());
        for id in 2..=4 {
            assert!(cache.lookup(EntityKind::User, &id.into()).is_some());
        }
        assert_eq!(cache.len(EntityKind::User), 3);
    }

    #[test]
    fn read_counts_as_use() {
        let config = CacheConfig {
            user_capacity: 2,
            ..CacheConfig::default()
        };
        let (cache, _, _) = setup(&config);
        cache.put(&user(1));
        cache.put(&user(2));
        cache.lookup(EntityKind::User, &1.into());
        cache.put(&user(3));

        assert!(cache.lookup(EntityKind::User, &1.into()).is_some());
        assert!(cache.lookup(EntityKind::User, &2.into()).is_none());
    }

    #[test]
    fn ticket_entries_expire() {
        let (cache, mapper, clock) = setup(&CacheConfig::default());
        let ticket = mapper.build("ticket", &json!({ "id": 5 })).unwrap();
        cache.put(&ticket);

        clock.advance(Duration::from_secs(30));
        assert_eq!(cache.lookup(EntityKind::Ticket, &5.into()), Some(ticket));

        clock.advance(Duration::from_secs(1));
        assert!(cache.lookup(EntityKind::Ticket, &5.into()).is_none());
        assert_eq!(cache.len(EntityKind::Ticket), 0);
    }

    #[test]
    fn uncached_kinds_ignore_puts() {
        let (cache, mapper, _) = setup(&CacheConfig::default());
        let job = mapper
            .build("job_status", &json!({ "id": "abc", "status": "queued" }))
            .unwrap();
        assert!(!cache.put(&job));
        assert!(cache.lookup(EntityKind::JobStatus, &"abc".into()).is_none());
    }

    #[test]
    fn page_with_sideloads_fills_every_cache() {
        let (cache, mapper, _) = setup(&CacheConfig::default());
        let page = json!({
            "tickets": [{ "id": 1 }, { "id": 2 }],
            "users": [{ "id": 10 }],
            "groups": [{ "id": 20 }],
            "next_page": null,
            "count": 2,
        });
        let stored = cache.put_page(&mapper, EntityKind::Ticket, &page).unwrap();

        assert_eq!(stored, 4);
        assert!(cache.lookup(EntityKind::Ticket, &2.into()).is_some());
        assert!(cache.lookup(EntityKind::User, &10.into()).is_some());
        let group = cache.lookup(EntityKind::Group, &20.into()).unwrap();
        assert_eq!(group.into_type::<Group>().unwrap().id, Some(20));
    }

    #[test]
    fn single_key_page() {
        let (cache, mapper, _) = setup(&CacheConfig::default());
        let page = json!({ "user": { "id": 3, "name": "Sam" } });
        assert_eq!(cache.put_page(&mapper, EntityKind::User, &page).unwrap(), 1);
        assert!(cache.lookup(EntityKind::User, &3.into()).is_some());
    }

    #[test]
    fn search_results_route_by_result_type() {
        let (cache, mapper, _) = setup(&CacheConfig::default());
        let page = json!({
            "results": [
                { "id": 1, "result_type": "ticket" },
                { "id": 2, "result_type": "user" },
                { "id": 3, "result_type": "topic" },
            ],
        });
        let stored = cache.put_page(&mapper, EntityKind::Ticket, &page).unwrap();

        assert_eq!(stored, 2);
        assert!(cache.lookup(EntityKind::Ticket, &1.into()).is_some());
        assert!(cache.lookup(EntityKind::User, &2.into()).is_some());
        assert!(cache.lookup(EntityKind::Ticket, &2.into()).is_none());
    }

    #[test]
    fn unknown_result_type_is_an_error() {
        let (cache, mapper, _) = setup(&CacheConfig::default());
        let page = json!({ "results": [{ "id": 1, "result_type": "gadget" }] });
        let err = cache.put_page(&mapper, EntityKind::Ticket, &page).unwrap_err();
        assert!(matches!(err, CoreError::UnknownType { .. }));
    }

    #[test]
    fn stats_count_hits_and_misses() {
        let (cache, _, _) = setup(&CacheConfig::default());
        cache.put(&user(1));
        cache.lookup(EntityKind::User, &1.into());
        cache.lookup(EntityKind::User, &2.into());

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
    }

    #[test]
    fn invalidate_and_clear() {
        let (cache, _, _) = setup(&CacheConfig::default());
        cache.put(&user(1));
        cache.put(&user(2));
        assert!(cache.invalidate(EntityKind::User, &1.into()));
        assert!(!cache.invalidate(EntityKind::User, &1.into()));
        cache.clear();
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn disabled_cache_always_misses() {
        let (cache, _, _) = setup(&CacheConfig::disabled());
        assert!(!cache.put(&user(1)));
        assert!(cache.lookup(EntityKind::User, &1.into()).is_none());
    }
}
