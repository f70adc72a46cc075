// ── Entity APIs ──
//
// `EntityApi` is the per-kind surface: cache-first lookups, network-only
// listing, and the write path. Tickets and users get thin wrappers that
// add their sub-resources and expose create/update.

mod tickets;
mod users;

pub use tickets::TicketApi;
pub use users::UserApi;

use std::sync::Arc;

use helpdesk_api::{Endpoint, EndpointMode};
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::ClientContext;
use crate::error::CoreError;
use crate::generator::ResultGenerator;
use crate::mapper::MutationResponse;
use crate::model::{Batch, Entity, EntityId, EntityKind};

/// Result of a lookup: one entity, a set served entirely from cache, or a
/// lazily fetched result set.
#[derive(Debug)]
pub enum Lookup {
    One(Entity),
    Cached(Vec<Entity>),
    Paged(ResultGenerator),
}

impl Lookup {
    /// The entity of a single-item answer, if that is what this is.
    pub fn into_one(self) -> Option<Entity> {
        match self {
            Self::One(entity) => Some(entity),
            Self::Cached(_) | Self::Paged(_) => None,
        }
    }

    /// Drain every entity, fetching remaining pages as needed.
    pub fn collect_all(self) -> Result<Vec<Entity>, CoreError> {
        self.into_iter().collect()
    }
}

/// Iterator over a [`Lookup`].
#[derive(Debug)]
pub enum LookupIter {
    Items(std::vec::IntoIter<Entity>),
    Paged(ResultGenerator),
}

impl Iterator for LookupIter {
    type Item = Result<Entity, CoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Items(items) => items.next().map(Ok),
            Self::Paged(generator) => generator.next(),
        }
    }
}

impl IntoIterator for Lookup {
    type Item = Result<Entity, CoreError>;
    type IntoIter = LookupIter;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Self::One(entity) => LookupIter::Items(vec![entity].into_iter()),
            Self::Cached(items) => LookupIter::Items(items.into_iter()),
            Self::Paged(generator) => LookupIter::Paged(generator),
        }
    }
}

/// Lookup, listing, and writes for one entity kind.
#[derive(Clone)]
pub struct EntityApi {
    ctx: Arc<ClientContext>,
    kind: EntityKind,
    endpoint: Endpoint,
}

impl std::fmt::Debug for EntityApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityApi")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl EntityApi {
    pub(crate) fn new(ctx: Arc<ClientContext>, kind: EntityKind, endpoint: Endpoint) -> Self {
        Self {
            ctx,
            kind,
            endpoint,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Fetch one entity, serving it from cache when possible.
    ///
    /// A response that carries `next_page` is a collection rather than a
    /// single object and comes back as [`Lookup::Paged`].
    pub fn get(&self, id: impl Into<EntityId>) -> Result<Lookup, CoreError> {
        let id = id.into();
        if let Some(entity) = self.ctx.cache.lookup(self.kind, &id) {
            return Ok(Lookup::One(entity));
        }

        let url = self.url(&EndpointMode::Show { id: id.to_string() }, true)?;
        let body = self.ctx.get(&url)?;

        if body.get("next_page").is_some() {
            let generator =
                ResultGenerator::new(Arc::clone(&self.ctx), self.kind, self.kind.collection_key(), &body)?;
            return Ok(Lookup::Paged(generator));
        }

        let payload = body.get(self.kind.name()).ok_or_else(|| CoreError::MissingKey {
            key: self.kind.name().to_owned(),
        })?;
        self.ctx.cache.put_page(&self.ctx.mapper, self.kind, &body)?;
        let entity = self.ctx.mapper.build_kind(self.kind, payload)?;
        Ok(Lookup::One(entity))
    }

    /// Fetch several entities by id.
    ///
    /// Either every id is served from cache, or a single `show_many` query
    /// covers the whole set. Partial cache hits are discarded.
    pub fn get_many<I>(&self, ids: I) -> Result<Lookup, CoreError>
    where
        I: IntoIterator,
        I::Item: Into<EntityId>,
    {
        let ids: Vec<EntityId> = ids.into_iter().map(Into::into).collect();

        let cached: Option<Vec<Entity>> = ids
            .iter()
            .map(|id| self.ctx.cache.lookup(self.kind, id))
            .collect();
        if let Some(entities) = cached {
            return Ok(Lookup::Cached(entities));
        }

        debug!(entity = %self.kind, count = ids.len(), "cache incomplete, querying all ids");
        let mode = EndpointMode::ShowMany {
            ids: ids.iter().map(ToString::to_string).collect(),
        };
        let url = self.url(&mode, true)?;
        let body = self.ctx.get(&url)?;
        let generator =
            ResultGenerator::new(Arc::clone(&self.ctx), self.kind, self.kind.collection_key(), &body)?;
        Ok(Lookup::Paged(generator))
    }

    /// List the collection. Always hits the network.
    pub fn list(&self, params: &[(&str, &str)]) -> Result<ResultGenerator, CoreError> {
        let params = params
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let url = self.url(&EndpointMode::List { params }, true)?;
        let body = self.ctx.get(&url)?;
        ResultGenerator::new(Arc::clone(&self.ctx), self.kind, self.kind.collection_key(), &body)
    }

    /// List a per-parent collection such as `users/{id}/groups`, where
    /// this handle's endpoint is the nested one.
    pub(crate) fn list_under(&self, parent: &EntityId) -> Result<ResultGenerator, CoreError> {
        let url = self.url(&EndpointMode::Show { id: parent.to_string() }, false)?;
        let body = self.ctx.get(&url)?;
        ResultGenerator::new(Arc::clone(&self.ctx), self.kind, self.kind.collection_key(), &body)
    }

    /// Another handle on the same client, for a related kind or path.
    pub(crate) fn sibling(&self, kind: EntityKind, endpoint: Endpoint) -> Self {
        Self::new(Arc::clone(&self.ctx), kind, endpoint)
    }

    // ── Writes ──────────────────────────────────────────────────────

    /// POST one entity (under its singular key) or many (plural key,
    /// `create_many`).
    pub(crate) fn create(&self, batch: Batch) -> Result<MutationResponse, CoreError> {
        let (mode, body) = match &batch {
            Batch::One(entity) => (EndpointMode::Create, self.single_body(entity)?),
            Batch::Many(items) => (EndpointMode::CreateMany, self.plural_body(items)?),
        };
        let url = self.url(&mode, false)?;
        let resp = self.ctx.post(&url, &body)?;
        self.finish_write(&resp)
    }

    /// PUT one entity to `{id}` or many to `update_many`. Every entity
    /// needs an id.
    pub(crate) fn update(&self, batch: Batch) -> Result<MutationResponse, CoreError> {
        let ids = self.ids_of(&batch)?;
        let (mode, body) = match &batch {
            Batch::One(entity) => {
                let id = ids.first().map(ToString::to_string).unwrap_or_default();
                (EndpointMode::Update { id }, self.single_body(entity)?)
            }
            Batch::Many(items) => (EndpointMode::UpdateMany, self.plural_body(items)?),
        };
        let url = self.url(&mode, false)?;
        let resp = self.ctx.put(&url, &body)?;
        for id in &ids {
            self.ctx.cache.invalidate(self.kind, id);
        }
        self.finish_write(&resp)
    }

    /// Delete one entity or a batch. Returns the HTTP status.
    pub fn delete(&self, batch: impl Into<Batch>) -> Result<u16, CoreError> {
        let ids = self.ids_of(&batch.into())?;
        self.delete_ids(&ids)
    }

    /// Delete by id: `DELETE {id}` for one, `destroy_many` for several.
    pub fn delete_ids(&self, ids: &[EntityId]) -> Result<u16, CoreError> {
        let mode = match ids {
            [] => return Err(CoreError::EmptyBatch),
            [id] => EndpointMode::Delete { id: id.to_string() },
            many => EndpointMode::DestroyMany {
                ids: many.iter().map(ToString::to_string).collect(),
            },
        };
        let url = self.url(&mode, false)?;
        let status = self.ctx.delete(&url)?;
        for id in ids {
            self.ctx.cache.invalidate(self.kind, id);
        }
        Ok(status)
    }

    // ── Helpers ─────────────────────────────────────────────────────

    fn url(&self, mode: &EndpointMode, sideload: bool) -> Result<url::Url, CoreError> {
        Ok(self.endpoint.url(&self.ctx.base, mode, sideload)?)
    }

    fn check_kind(&self, entity: &Entity) -> Result<(), CoreError> {
        if entity.kind() == self.kind {
            Ok(())
        } else {
            Err(CoreError::KindMismatch {
                expected: self.kind.to_string(),
                found: entity.kind().to_string(),
            })
        }
    }

    fn single_body(&self, entity: &Entity) -> Result<Value, CoreError> {
        self.check_kind(entity)?;
        let mut body = Map::new();
        body.insert(self.kind.name().to_owned(), self.ctx.mapper.to_payload(entity)?);
        Ok(Value::Object(body))
    }

    fn plural_body(&self, items: &[Entity]) -> Result<Value, CoreError> {
        if items.is_empty() {
            return Err(CoreError::EmptyBatch);
        }
        let payloads = items
            .iter()
            .map(|entity| {
                self.check_kind(entity)?;
                self.ctx.mapper.to_payload(entity)
            })
            .collect::<Result<Vec<Value>, CoreError>>()?;
        let mut body = Map::new();
        body.insert(self.kind.collection_key().to_owned(), Value::Array(payloads));
        Ok(Value::Object(body))
    }

    fn ids_of(&self, batch: &Batch) -> Result<Vec<EntityId>, CoreError> {
        if batch.is_empty() {
            return Err(CoreError::EmptyBatch);
        }
        batch
            .entities()
            .iter()
            .map(|entity| {
                self.check_kind(entity)?;
                entity.id().ok_or_else(|| CoreError::MissingField {
                    entity_type: self.kind.to_string(),
                    field: "id",
                })
            })
            .collect()
    }

    fn finish_write(&self, resp: &Value) -> Result<MutationResponse, CoreError> {
        let decoded = self.ctx.mapper.build_mutation_response(resp)?;
        self.ctx.cache.put(&decoded.entity());
        Ok(decoded)
    }
}
