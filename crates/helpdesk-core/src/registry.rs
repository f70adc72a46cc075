// ── Type registry ──
//
// Maps wire type names to `EntityKind` and each kind to its cache policy.
// Built once per client from `CacheConfig`; there is no global state.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::config::CacheConfig;
use crate::error::CoreError;
use crate::model::EntityKind;

/// Wire field names that collide with Rust keywords, and the struct field
/// each is exposed as. Serialization writes the wire name back.
pub const RESERVED_FIELDS: &[(&str, &str)] = &[("type", "kind")];

/// How entities of one kind are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Capacity-bounded, least recently used entry evicted first.
    Lru { capacity: usize },
    /// Capacity-bounded and expiring `ttl` after insertion.
    Ttl { capacity: usize, ttl: Duration },
    Never,
}

impl CachePolicy {
    pub fn is_cached(self) -> bool {
        !matches!(self, Self::Never)
    }
}

#[derive(Debug, Clone)]
pub struct TypeRegistry {
    policies: HashMap<EntityKind, CachePolicy>,
}

impl TypeRegistry {
    pub fn new(config: &CacheConfig) -> Self {
        let mut policies = HashMap::new();
        if config.enabled {
            let lru = [
                (EntityKind::User, config.user_capacity),
                (EntityKind::Organization, config.organization_capacity),
                (EntityKind::Group, config.group_capacity),
                (EntityKind::Brand, config.brand_capacity),
            ];
            for (kind, capacity) in lru {
                policies.insert(kind, CachePolicy::Lru { capacity });
            }

            let volatile = [
                (EntityKind::Ticket, config.ticket_capacity),
                (EntityKind::Comment, config.comment_capacity),
            ];
            for (kind, capacity) in volatile {
                policies.insert(
                    kind,
                    CachePolicy::Ttl {
                        capacity,
                        ttl: config.volatile_ttl,
                    },
                );
            }
        }
        Self { policies }
    }

    /// Resolve a wire type name such as `"ticket"` or `"job_status"`.
    ///
    /// Plural collection keys (`"tickets"`) resolve to the same kind.
    pub fn resolve(&self, name: &str) -> Result<EntityKind, CoreError> {
        if let Ok(kind) = EntityKind::from_str(name) {
            return Ok(kind);
        }
        Self::from_collection_key(name).ok_or_else(|| CoreError::UnknownType {
            name: name.to_owned(),
        })
    }

    /// Kind whose plural key is `key`, if any.
    pub fn from_collection_key(key: &str) -> Option<EntityKind> {
        use strum::IntoEnumIterator;
        EntityKind::iter().find(|kind| kind.collection_key() == key)
    }

    pub fn cache_policy(&self, kind: EntityKind) -> CachePolicy {
        self.policies.get(&kind).copied().unwrap_or(CachePolicy::Never)
    }

    pub fn is_cacheable(&self, kind: EntityKind) -> bool {
        self.cache_policy(kind).is_cached()
    }

    /// Every kind with a cache, in declaration order.
    pub fn cacheable_kinds(&self) -> Vec<EntityKind> {
        let mut kinds: Vec<EntityKind> = self.policies.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Struct field name for a wire field name.
    pub fn field_name(wire: &str) -> &str {
        RESERVED_FIELDS
            .iter()
            .find(|(from, _)| *from == wire)
            .map_or(wire, |(_, to)| *to)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
