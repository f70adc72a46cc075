use std::ops::Deref;
use std::sync::Arc;

use helpdesk_api::Endpoint;

use super::EntityApi;
use crate::client::ClientContext;
use crate::error::CoreError;
use crate::generator::ResultGenerator;
use crate::mapper::MutationResponse;
use crate::model::{Batch, EntityId, EntityKind};

/// Users: the generic surface plus writes and per-user listings.
#[derive(Debug, Clone)]
pub struct UserApi {
    inner: EntityApi,
}

impl UserApi {
    pub(crate) fn new(ctx: Arc<ClientContext>) -> Self {
        let endpoint = Endpoint::new("users").with_sideloads(&["organizations", "groups"]);
        Self {
            inner: EntityApi::new(ctx, EntityKind::User, endpoint),
        }
    }

    pub fn into_inner(self) -> EntityApi {
        self.inner
    }

    pub fn create(&self, users: impl Into<Batch>) -> Result<MutationResponse, CoreError> {
        self.inner.create(users.into())
    }

    pub fn update(&self, users: impl Into<Batch>) -> Result<MutationResponse, CoreError> {
        self.inner.update(users.into())
    }

    /// Agent groups the user belongs to.
    pub fn groups(&self, user_id: impl Into<EntityId>) -> Result<ResultGenerator, CoreError> {
        self.nested(EntityKind::Group, user_id.into(), "groups")
    }

    pub fn organizations(&self, user_id: impl Into<EntityId>) -> Result<ResultGenerator, CoreError> {
        self.nested(EntityKind::Organization, user_id.into(), "organizations")
    }

    /// Tickets the user requested.
    pub fn requested(&self, user_id: impl Into<EntityId>) -> Result<ResultGenerator, CoreError> {
        self.nested(EntityKind::Ticket, user_id.into(), "tickets/requested")
    }

    /// Tickets the user is copied on.
    pub fn ccd(&self, user_id: impl Into<EntityId>) -> Result<ResultGenerator, CoreError> {
        self.nested(EntityKind::Ticket, user_id.into(), "tickets/ccd")
    }

    /// Tickets assigned to the user.
    pub fn assigned(&self, user_id: impl Into<EntityId>) -> Result<ResultGenerator, CoreError> {
        self.nested(EntityKind::Ticket, user_id.into(), "tickets/assigned")
    }

    fn nested(
        &self,
        kind: EntityKind,
        user_id: EntityId,
        child: &str,
    ) -> Result<ResultGenerator, CoreError> {
        self.inner
            .sibling(kind, Endpoint::nested("users", child))
            .list_under(&user_id)
    }
}

impl Deref for UserApi {
    type Target = EntityApi;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
