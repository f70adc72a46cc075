use std::time::Duration;

use helpdesk_api::{BaseUrl, Credentials, TransportConfig};

/// Sizes and lifetimes of the per-type caches.
///
/// Reference kinds (users, organizations, groups, brands) are bounded by
/// capacity and evict the least recently used entry. Volatile kinds
/// (tickets, comments) are additionally dropped `volatile_ttl` after
/// insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// When `false` every lookup misses and nothing is stored.
    pub enabled: bool,
    pub user_capacity: usize,
    pub organization_capacity: usize,
    pub group_capacity: usize,
    pub brand_capacity: usize,
    pub ticket_capacity: usize,
    pub comment_capacity: usize,
    pub volatile_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            user_capacity: 200,
            organization_capacity: 100,
            group_capacity: 100,
            brand_capacity: 100,
            ticket_capacity: 100,
            comment_capacity: 100,
            volatile_ttl: Duration::from_secs(30),
        }
    }
}

impl CacheConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Everything needed to build a [`HelpdeskClient`](crate::HelpdeskClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: BaseUrl,
    pub credentials: Credentials,
    pub transport: TransportConfig,
    pub cache: CacheConfig,
}
