// ── Entity kinds ──
//
// The fixed set of resource variants the client understands. The snake_case
// name doubles as the singular wire key (`"ticket"`), and `collection_key`
// gives the plural key used by list responses and batch writes.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Ticket,
    User,
    Organization,
    Group,
    Brand,
    Topic,
    Comment,
    Attachment,
    Thumbnail,
    Metadata,
    System,
    #[serde(rename = "create")]
    #[strum(serialize = "create")]
    CreateEvent,
    #[serde(rename = "change")]
    #[strum(serialize = "change")]
    ChangeEvent,
    Notification,
    Via,
    Source,
    JobStatus,
    Audit,
}

impl EntityKind {
    /// Singular wire key, e.g. `"ticket"`, `"job_status"`.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Plural wire key used by list responses and `*_many` writes.
    pub fn collection_key(self) -> &'static str {
        match self {
            Self::Ticket => "tickets",
            Self::User => "users",
            Self::Organization => "organizations",
            Self::Group => "groups",
            Self::Brand => "brands",
            Self::Topic => "topics",
            Self::Comment => "comments",
            Self::Attachment => "attachments",
            Self::Thumbnail => "thumbnails",
            Self::Metadata => "metadata",
            Self::System => "systems",
            Self::CreateEvent => "creates",
            Self::ChangeEvent => "changes",
            Self::Notification => "notifications",
            Self::Via => "vias",
            Self::Source => "sources",
            Self::JobStatus => "job_statuses",
            Self::Audit => "audits",
        }
    }

    /// Value-like kinds carry no `id` and can never be cached.
    pub fn has_identity(self) -> bool {
        !matches!(self, Self::Metadata | Self::System | Self::Via | Self::Source)
    }

    /// Kinds that may appear in an audit's `events` collection.
    pub fn is_event(self) -> bool {
        matches!(
            self,
            Self::CreateEvent | Self::ChangeEvent | Self::Notification | Self::Comment
        )
    }
}
