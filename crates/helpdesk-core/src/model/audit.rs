// ── Ticket audits ──
//
// An audit records one change to a ticket: who made it, through which
// channel, and the list of events it produced. Events are polymorphic and
// discriminated by their `type` field, compared case-insensitively; a tag
// with no model only fails when its kind is asked for.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

use super::comment::Comment;
use super::kind::EntityKind;
use super::ticket::{Ticket, Via};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Audit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<Via>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request metadata attached to audits and comments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<System>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Client fingerprint recorded with a change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct System {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Events ──────────────────────────────────────────────────────────

/// A field being set when the ticket was created or updated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An email notification fired by a trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<Via>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A field changed by an update, with the value it replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of [`Audit::events`].
///
/// Serializes as the inner object; deserializes by the lowercased `type`
/// tag. Tags without a model (`VoiceComment`, `Cc`, ...) are kept verbatim
/// in [`Event::Unrecognized`] so the rest of the audit still decodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Event {
    Create(CreateEvent),
    Change(ChangeEvent),
    Notification(Notification),
    Comment(Comment),
    Unrecognized(Value),
}

impl Event {
    /// Resolve an event `type` tag to its kind, ignoring case.
    pub fn kind_for_tag(tag: &str) -> Option<EntityKind> {
        match tag.to_ascii_lowercase().as_str() {
            "create" => Some(EntityKind::CreateEvent),
            "change" => Some(EntityKind::ChangeEvent),
            "notification" => Some(EntityKind::Notification),
            "comment" => Some(EntityKind::Comment),
            _ => None,
        }
    }

    /// The modelled kind of this event.
    ///
    /// # Errors
    ///
    /// `UnknownType` for an event kept raw because its tag has no model.
    pub fn kind(&self) -> Result<EntityKind, CoreError> {
        match self {
            Self::Create(_) => Ok(EntityKind::CreateEvent),
            Self::Change(_) => Ok(EntityKind::ChangeEvent),
            Self::Notification(_) => Ok(EntityKind::Notification),
            Self::Comment(_) => Ok(EntityKind::Comment),
            Self::Unrecognized(_) => Err(CoreError::UnknownType {
                name: self.tag().unwrap_or_default().to_owned(),
            }),
        }
    }

    /// The `type` tag as the service sent it.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Create(e) => e.kind.as_deref(),
            Self::Change(e) => e.kind.as_deref(),
            Self::Notification(e) => e.kind.as_deref(),
            Self::Comment(e) => e.kind.as_deref(),
            Self::Unrecognized(raw) => raw.get("type").and_then(Value::as_str),
        }
    }

    pub fn id(&self) -> Option<u64> {
        match self {
            Self::Create(e) => e.id,
            Self::Change(e) => e.id,
            Self::Notification(e) => e.id,
            Self::Comment(e) => e.id,
            Self::Unrecognized(raw) => raw.get("id").and_then(Value::as_u64),
        }
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .and_then(Self::kind_for_tag);

        match kind {
            Some(EntityKind::CreateEvent) => serde_json::from_value(value)
                .map(Self::Create)
                .map_err(de::Error::custom),
            Some(EntityKind::ChangeEvent) => serde_json::from_value(value)
                .map(Self::Change)
                .map_err(de::Error::custom),
            Some(EntityKind::Notification) => serde_json::from_value(value)
                .map(Self::Notification)
                .map_err(de::Error::custom),
            Some(_) => serde_json::from_value(value)
                .map(Self::Comment)
                .map_err(de::Error::custom),
            None => Ok(Self::Unrecognized(value)),
        }
    }
}

/// Response to a ticket create or update: the resulting ticket plus the
/// audit describing the change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketAudit {
    pub ticket: Ticket,
    pub audit: Audit,
}
