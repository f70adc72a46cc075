// ── Object mapper ──
//
// Turns raw JSON objects into typed entities and back. Field renames and
// nested collections are declared on the model structs; this layer picks
// the struct for a kind and decodes the polymorphic create/update response.

use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::error::CoreError;
use crate::model::{Audit, Entity, EntityKind, EntityType, JobStatus, Ticket, TicketAudit, User};
use crate::registry::TypeRegistry;

/// Decoded body of a create or update call.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationResponse {
    /// Ticket writes answer with the ticket and the audit of the change.
    TicketAudit(TicketAudit),
    User(User),
    /// Bulk writes run in the background.
    JobStatus(JobStatus),
}

impl MutationResponse {
    /// The primary entity, for caching and display.
    pub fn entity(&self) -> Entity {
        match self {
            Self::TicketAudit(pair) => Entity::Ticket(pair.ticket.clone()),
            Self::User(user) => Entity::User(user.clone()),
            Self::JobStatus(job) => Entity::JobStatus(job.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObjectMapper {
    registry: Arc<TypeRegistry>,
}

impl ObjectMapper {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Build an entity from a wire type name such as `"ticket"`.
    pub fn build(&self, name: &str, payload: &Value) -> Result<Entity, CoreError> {
        let kind = self.registry.resolve(name)?;
        self.build_kind(kind, payload)
    }

    /// Build an entity of a known kind.
    ///
    /// A `result_type` tag (search results) is dropped before decoding.
    pub fn build_kind(&self, kind: EntityKind, payload: &Value) -> Result<Entity, CoreError> {
        let Some(map) = payload.as_object() else {
            return Err(CoreError::Mapping {
                entity_type: kind.to_string(),
                message: format!("expected a JSON object, got {}", json_type(payload)),
            });
        };

        let mut map = map.clone();
        map.remove("result_type");
        trace!(entity = %kind, fields = map.len(), "mapping payload");

        Entity::from_value(kind, Value::Object(map)).map_err(|e| CoreError::Mapping {
            entity_type: kind.to_string(),
            message: e.to_string(),
        })
    }

    /// Build and unwrap into the concrete struct.
    pub fn build_as<T: EntityType>(&self, payload: &Value) -> Result<T, CoreError> {
        let entity = self.build_kind(T::KIND, payload)?;
        let found = entity.kind();
        T::from_entity(entity).ok_or_else(|| CoreError::KindMismatch {
            expected: T::KIND.to_string(),
            found: found.to_string(),
        })
    }

    /// JSON form of an entity for a request body.
    pub fn to_payload(&self, entity: &Entity) -> Result<Value, CoreError> {
        entity.to_value().map_err(|e| CoreError::Mapping {
            entity_type: entity.kind().to_string(),
            message: e.to_string(),
        })
    }

    /// Decode a create/update response by the keys it carries, trying
    /// `ticket` + `audit`, then `user`, then `job_status`.
    pub fn build_mutation_response(&self, body: &Value) -> Result<MutationResponse, CoreError> {
        let Some(map) = body.as_object() else {
            return Err(CoreError::UnknownResponse { keys: Vec::new() });
        };

        if let (Some(ticket), Some(audit)) = (map.get("ticket"), map.get("audit")) {
            let ticket: Ticket = self.build_as(ticket)?;
            let audit: Audit = self.build_as(audit)?;
            return Ok(MutationResponse::TicketAudit(TicketAudit { ticket, audit }));
        }
        if let Some(user) = map.get("user") {
            return self.build_as(user).map(MutationResponse::User);
        }
        if let Some(job) = map.get("job_status") {
            return self.build_as(job).map(MutationResponse::JobStatus);
        }

        Err(CoreError::UnknownResponse {
            keys: map.keys().cloned().collect(),
        })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Attachment, Comment};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn mapper() -> ObjectMapper {
        ObjectMapper::new(Arc::new(TypeRegistry::default()))
    }

    #[test]
    fn unknown_type_name_fails() {
        let err = mapper().build("widget", &json!({})).unwrap_err();
        assert!(matches!(err, CoreError::UnknownType { .. }));
    }

    #[test]
    fn type_field_becomes_kind() {
        let ticket: Ticket = mapper()
            .build_as(&json!({ "id": 1, "type": "incident", "subject": "Printer on fire" }))
            .unwrap();
        assert_eq!(ticket.kind.as_deref(), Some("incident"));
        assert_eq!(ticket.subject.as_deref(), Some("Printer on fire"));
    }

    #[test]
    fn round_trip_keeps_wire_names_and_unknown_fields() {
        let payload = json!({
            "id": 35436,
            "type": "problem",
            "subject": "Help, my printer is on fire!",
            "status": "open",
            "tags": ["enterprise", "other_tag"],
            "via": { "channel": "email", "source": { "from": { "address": "a@b.c" }, "rel": null } },
            "custom_fields": [{ "id": 27642, "value": "745" }],
            "created_at": "2009-07-20T22:55:29Z",
        });
        let entity = mapper().build("ticket", &payload).unwrap();
        let back = mapper().to_payload(&entity).unwrap();

        assert_eq!(back["type"], "problem");
        assert_eq!(back["subject"], payload["subject"]);
        assert_eq!(back["tags"], payload["tags"]);
        assert_eq!(back["custom_fields"], payload["custom_fields"]);
        assert_eq!(back["via"]["source"]["from"], payload["via"]["source"]["from"]);
        assert_eq!(back["created_at"], "2009-07-20T22:55:29Z");
        assert!(back.get("kind").is_none());
    }

    #[test]
    fn explicit_nulls_survive_the_round_trip() {
        let payload = json!({ "assignee_id": null, "group_id": null, "id": 1, "subject": "x" });
        let entity = mapper().build("ticket", &payload).unwrap();

        let ticket: Ticket = entity.as_type().unwrap();
        assert!(ticket.assignee_id.is_null());
        assert!(ticket.organization_id.is_absent());
        assert_eq!(mapper().to_payload(&entity).unwrap(), payload);
    }

    #[test]
    fn attachments_and_thumbnails_are_fixed_types() {
        let comment: Comment = mapper()
            .build_as(&json!({
                "id": 1,
                "type": "Comment",
                "attachments": [{
                    "id": 2,
                    "file_name": "screen.png",
                    "thumbnails": [{ "id": 3, "file_name": "screen_thumb.png" }],
                }],
            }))
            .unwrap();

        let attachment: &Attachment = &comment.attachments[0];
        assert_eq!(attachment.file_name.as_deref(), Some("screen.png"));
        assert_eq!(attachment.thumbnails[0].id, Some(3));
    }

    #[test]
    fn unmodelled_event_tag_does_not_fail_the_audit() {
        let audit: Audit = mapper()
            .build_as(&json!({
                "id": 1,
                "events": [
                    { "id": 2, "type": "Change", "field_name": "status", "value": "open", "previous_value": "new" },
                    { "id": 3, "type": "Tweet" },
                ],
            }))
            .unwrap();

        assert_eq!(audit.events[0].kind().unwrap(), EntityKind::ChangeEvent);
        let err = audit.events[1].kind().unwrap_err();
        assert!(matches!(err, CoreError::UnknownType { ref name } if name == "Tweet"));
    }

    #[test]
    fn result_type_is_stripped() {
        let entity = mapper()
            .build("user", &json!({ "id": 4, "result_type": "user" }))
            .unwrap();
        let user: User = entity.into_type().unwrap();
        assert!(user.extra.is_empty());
    }

    #[test]
    fn non_object_payload_is_a_mapping_error() {
        let err = mapper().build("user", &json!([1, 2])).unwrap_err();
        assert!(matches!(err, CoreError::Mapping { .. }));
    }

    #[test]
    fn mutation_response_prefers_ticket_and_audit() {
        let body = json!({
            "ticket": { "id": 10, "subject": "New" },
            "audit": { "id": 20, "ticket_id": 10, "events": [{ "id": 1, "type": "Create", "field_name": "subject", "value": "New" }] },
            "user": { "id": 99 },
        });
        match mapper().build_mutation_response(&body).unwrap() {
            MutationResponse::TicketAudit(pair) => {
                assert_eq!(pair.ticket.id, Some(10));
                assert_eq!(pair.audit.events.len(), 1);
            }
            other => panic!("expected ticket audit, got {other:?}"),
        }
    }

    #[test]
    fn ticket_without_audit_falls_through() {
        let body = json!({ "ticket": { "id": 10 }, "job_status": { "id": "abc", "status": "queued" } });
        assert!(matches!(
            mapper().build_mutation_response(&body).unwrap(),
            MutationResponse::JobStatus(_)
        ));
    }

    #[test]
    fn unrecognised_response_lists_keys() {
        let err = mapper()
            .build_mutation_response(&json!({ "organization": { "id": 1 } }))
            .unwrap_err();
        assert_eq!(err.to_string(), "could not interpret response with keys: organization");
    }
}
