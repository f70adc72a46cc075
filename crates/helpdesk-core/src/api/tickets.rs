use std::ops::Deref;
use std::sync::Arc;

use helpdesk_api::Endpoint;

use super::EntityApi;
use crate::client::ClientContext;
use crate::error::CoreError;
use crate::generator::ResultGenerator;
use crate::mapper::MutationResponse;
use crate::model::{Batch, EntityId, EntityKind};

const SIDELOADS: &[&str] = &["users", "groups", "organizations"];

/// Tickets: the generic surface plus writes and ticket sub-resources.
#[derive(Debug, Clone)]
pub struct TicketApi {
    inner: EntityApi,
}

impl TicketApi {
    pub(crate) fn new(ctx: Arc<ClientContext>) -> Self {
        let endpoint = Endpoint::new("tickets").with_sideloads(SIDELOADS);
        Self {
            inner: EntityApi::new(ctx, EntityKind::Ticket, endpoint),
        }
    }

    pub fn into_inner(self) -> EntityApi {
        self.inner
    }

    /// Create one ticket or many. A single ticket answers with the ticket
    /// and its audit; several answer with a job status.
    pub fn create(&self, tickets: impl Into<Batch>) -> Result<MutationResponse, CoreError> {
        self.inner.create(tickets.into())
    }

    pub fn update(&self, tickets: impl Into<Batch>) -> Result<MutationResponse, CoreError> {
        self.inner.update(tickets.into())
    }

    /// Recently viewed tickets.
    pub fn recent(&self) -> Result<ResultGenerator, CoreError> {
        self.inner
            .sibling(
                EntityKind::Ticket,
                Endpoint::new("tickets/recent").with_sideloads(SIDELOADS),
            )
            .list(&[])
    }

    /// Comments on a ticket, oldest first.
    pub fn comments(&self, ticket_id: impl Into<EntityId>) -> Result<ResultGenerator, CoreError> {
        self.inner
            .sibling(EntityKind::Comment, Endpoint::nested("tickets", "comments"))
            .list_under(&ticket_id.into())
    }

    /// The change history of a ticket.
    pub fn audits(&self, ticket_id: impl Into<EntityId>) -> Result<ResultGenerator, CoreError> {
        self.inner
            .sibling(EntityKind::Audit, Endpoint::nested("tickets", "audits"))
            .list_under(&ticket_id.into())
    }

    pub fn organization_tickets(
        &self,
        organization_id: impl Into<EntityId>,
    ) -> Result<ResultGenerator, CoreError> {
        self.inner
            .sibling(EntityKind::Ticket, Endpoint::nested("organizations", "tickets"))
            .list_under(&organization_id.into())
    }
}

impl Deref for TicketApi {
    type Target = EntityApi;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
