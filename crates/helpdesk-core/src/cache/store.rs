// ── Bounded per-kind store ──
//
// Insertion-ordered map where the front is the least recently used entry.
// Reads and writes move an entry to the back; overflow evicts the front.
// Entries with a TTL are checked lazily on read and purged before insert.

use std::time::{Duration, Instant};

use indexmap::IndexMap;

use crate::model::{Entity, EntityId};

#[derive(Debug, Clone)]
struct CacheEntry {
    entity: Entity,
    inserted: Instant,
}

/// Outcome of a lookup, so the caller can log why a miss happened.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Lookup {
    Hit(Entity),
    Expired,
    Missing,
}

#[derive(Debug)]
pub(crate) struct BoundedStore {
    entries: IndexMap<EntityId, CacheEntry>,
    capacity: usize,
    ttl: Option<Duration>,
}

impl BoundedStore {
    pub(crate) fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity.min(1024)),
            capacity,
            ttl,
        }
    }

    fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.saturating_duration_since(entry.inserted) > ttl)
    }

    pub(crate) fn get(&mut self, id: &EntityId, now: Instant) -> Lookup {
        let Some(index) = self.entries.get_index_of(id) else {
            return Lookup::Missing;
        };
        let expired = self
            .entries
            .get_index(index)
            .is_some_and(|(_, entry)| self.is_expired(entry, now));
        if expired {
            self.entries.shift_remove_index(index);
            return Lookup::Expired;
        }

        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        match self.entries.get_index(last) {
            Some((_, entry)) => Lookup::Hit(entry.entity.clone()),
            None => Lookup::Missing,
        }
    }

    /// Store `entity` under `id`, returning the evicted id if the store was full.
    pub(crate) fn insert(&mut self, id: EntityId, entity: Entity, now: Instant) -> Option<EntityId> {
        if self.capacity == 0 {
            return None;
        }
        self.purge_expired(now);

        let entry = CacheEntry {
            entity,
            inserted: now,
        };
        if let Some(index) = self.entries.get_index_of(&id) {
            let last = self.entries.len() - 1;
            self.entries.move_index(index, last);
            if let Some((_, slot)) = self.entries.get_index_mut(last) {
                *slot = entry;
            }
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0).map(|(id, _)| id)
        } else {
            None
        };
        self.entries.insert(id, entry);
        evicted
    }

    pub(crate) fn remove(&mut self, id: &EntityId) -> bool {
        self.entries.shift_remove(id).is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn contains(&self, id: &EntityId) -> bool {
        self.entries.contains_key(id)
    }

    fn purge_expired(&mut self, now: Instant) {
        if let Some(ttl) = self.ttl {
            self.entries
                .retain(|_, entry| now.saturating_duration_since(entry.inserted) <= ttl);
        }
    }
}
