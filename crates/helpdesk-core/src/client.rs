// ── Client facade ──
//
// `HelpdeskClient` owns the registry, cache, mapper, and transport for one
// account and hands out per-type API handles that share them.

use std::sync::Arc;

use helpdesk_api::{BaseUrl, Endpoint, EndpointMode, HttpTransport, Transport};
use serde_json::Value;
use url::Url;

use crate::api::{EntityApi, TicketApi, UserApi};
use crate::cache::{Clock, ObjectCache, SystemClock};
use crate::config::{CacheConfig, ClientConfig};
use crate::error::CoreError;
use crate::generator::ResultGenerator;
use crate::mapper::ObjectMapper;
use crate::model::EntityKind;
use crate::registry::TypeRegistry;

/// State shared by every handle created from one client.
pub(crate) struct ClientContext {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) base: BaseUrl,
    pub(crate) registry: Arc<TypeRegistry>,
    pub(crate) cache: ObjectCache,
    pub(crate) mapper: ObjectMapper,
}

impl ClientContext {
    pub(crate) fn get(&self, url: &Url) -> Result<Value, CoreError> {
        let resp = self.transport.get(url)?;
        ensure_success(resp.status, &resp.body)?;
        Ok(resp.body)
    }

    pub(crate) fn post(&self, url: &Url, body: &Value) -> Result<Value, CoreError> {
        let resp = self.transport.post(url, body)?;
        ensure_success(resp.status, &resp.body)?;
        Ok(resp.body)
    }

    pub(crate) fn put(&self, url: &Url, body: &Value) -> Result<Value, CoreError> {
        let resp = self.transport.put(url, body)?;
        ensure_success(resp.status, &resp.body)?;
        Ok(resp.body)
    }

    pub(crate) fn delete(&self, url: &Url) -> Result<u16, CoreError> {
        let status = self.transport.delete(url)?;
        ensure_success(status, &Value::Null)?;
        Ok(status)
    }
}

/// Reject anything outside 200..=299, whatever the transport reported.
fn ensure_success(status: u16, body: &Value) -> Result<(), CoreError> {
    if (200..=299).contains(&status) {
        Ok(())
    } else {
        Err(helpdesk_api::Error::from_status(status, body).into())
    }
}

/// Entry point: one instance per account.
///
/// Cloning is cheap and clones share the same cache.
#[derive(Clone)]
pub struct HelpdeskClient {
    ctx: Arc<ClientContext>,
}

impl std::fmt::Debug for HelpdeskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelpdeskClient")
            .field("base", &self.ctx.base.to_string())
            .field("cache", &self.ctx.cache)
            .finish_non_exhaustive()
    }
}

impl HelpdeskClient {
    /// Build a client over the blocking HTTP transport.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let transport = HttpTransport::new(config.credentials, &config.transport)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            config.base_url,
            &config.cache,
            Arc::new(SystemClock),
        ))
    }

    /// Build a client over any transport and clock.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        base: BaseUrl,
        cache: &CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let registry = Arc::new(TypeRegistry::new(cache));
        let ctx = ClientContext {
            transport,
            base,
            cache: ObjectCache::new(Arc::clone(&registry), clock),
            mapper: ObjectMapper::new(Arc::clone(&registry)),
            registry,
        };
        Self { ctx: Arc::new(ctx) }
    }

    // ── Entity handles ──────────────────────────────────────────────

    pub fn tickets(&self) -> TicketApi {
        TicketApi::new(Arc::clone(&self.ctx))
    }

    pub fn users(&self) -> UserApi {
        UserApi::new(Arc::clone(&self.ctx))
    }

    pub fn organizations(&self) -> EntityApi {
        self.api(EntityKind::Organization, Endpoint::new("organizations"))
    }

    pub fn groups(&self) -> EntityApi {
        self.api(EntityKind::Group, Endpoint::new("groups"))
    }

    pub fn brands(&self) -> EntityApi {
        self.api(EntityKind::Brand, Endpoint::new("brands"))
    }

    pub fn topics(&self) -> EntityApi {
        self.api(EntityKind::Topic, Endpoint::new("topics"))
    }

    /// Background job progress. Never cached.
    pub fn job_statuses(&self) -> EntityApi {
        self.api(EntityKind::JobStatus, Endpoint::new("job_statuses"))
    }

    /// Handle for any kind by wire name, e.g. `"organization"`.
    pub fn api_for(&self, name: &str) -> Result<EntityApi, CoreError> {
        let kind = self.ctx.registry.resolve(name)?;
        Ok(match kind {
            EntityKind::Ticket => self.tickets().into_inner(),
            EntityKind::User => self.users().into_inner(),
            other => self.api(other, Endpoint::new(other.collection_key())),
        })
    }

    fn api(&self, kind: EntityKind, endpoint: Endpoint) -> EntityApi {
        EntityApi::new(Arc::clone(&self.ctx), kind, endpoint)
    }

    // ── Search ──────────────────────────────────────────────────────

    /// Full-text search across kinds. Each result is decoded by its own
    /// `result_type`.
    pub fn search(&self, query: &str, params: &[(&str, &str)]) -> Result<ResultGenerator, CoreError> {
        let mut pairs = vec![("query".to_owned(), query.to_owned())];
        pairs.extend(params.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())));

        let url = Endpoint::new("search").url(
            &self.ctx.base,
            &EndpointMode::List { params: pairs },
            false,
        )?;
        let page = self.ctx.get(&url)?;
        ResultGenerator::new(Arc::clone(&self.ctx), EntityKind::Ticket, "results", &page)
    }

    // ── Internals exposed for inspection ────────────────────────────

    pub fn cache(&self) -> &ObjectCache {
        &self.ctx.cache
    }

    pub fn mapper(&self) -> &ObjectMapper {
        &self.ctx.mapper
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.ctx.registry
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.ctx.base
    }
}
