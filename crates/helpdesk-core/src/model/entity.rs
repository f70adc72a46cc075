// ── Typed entity wrapper ──
//
// `Entity` is the single currency passed between the cache, the mapper,
// and the paging iterator. Each variant wraps the concrete struct for one
// `EntityKind`; `EntityType` converts between the two.

use serde::Serialize;
use serde_json::Value;

use super::audit::{Audit, ChangeEvent, CreateEvent, Metadata, Notification, System};
use super::brand::{Brand, Topic};
use super::comment::{Attachment, Comment, Thumbnail};
use super::entity_id::EntityId;
use super::job_status::JobStatus;
use super::kind::EntityKind;
use super::ticket::{Source, Ticket, Via};
use super::user::{Group, Organization, User};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Ticket(Ticket),
    User(User),
    Organization(Organization),
    Group(Group),
    Brand(Brand),
    Topic(Topic),
    Comment(Comment),
    Attachment(Attachment),
    Thumbnail(Thumbnail),
    Metadata(Metadata),
    System(System),
    CreateEvent(CreateEvent),
    ChangeEvent(ChangeEvent),
    Notification(Notification),
    Via(Via),
    Source(Source),
    JobStatus(JobStatus),
    Audit(Audit),
}

/// A concrete model struct bound to exactly one [`EntityKind`].
pub trait EntityType: Sized {
    const KIND: EntityKind;

    fn into_entity(self) -> Entity;

    /// Unwrap the matching variant, or `None` for any other kind.
    fn from_entity(entity: Entity) -> Option<Self>;
}

/// One entity or many, as accepted by create/update/delete.
#[derive(Debug, Clone, PartialEq)]
pub enum Batch {
    One(Entity),
    Many(Vec<Entity>),
}

impl Batch {
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entities(&self) -> &[Entity] {
        match self {
            Self::One(entity) => std::slice::from_ref(entity),
            Self::Many(items) => items,
        }
    }
}

impl From<Entity> for Batch {
    fn from(entity: Entity) -> Self {
        Self::One(entity)
    }
}

impl From<Vec<Entity>> for Batch {
    fn from(items: Vec<Entity>) -> Self {
        Self::Many(items)
    }
}

macro_rules! entity_types {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        impl Entity {
            pub fn kind(&self) -> EntityKind {
                match self {
                    $(Self::$variant(_) => EntityKind::$variant,)+
                }
            }

            /// Decode `value` as the struct registered for `kind`.
            pub fn from_value(kind: EntityKind, value: Value) -> Result<Self, serde_json::Error> {
                match kind {
                    $(EntityKind::$variant => serde_json::from_value::<$ty>(value).map(Self::$variant),)+
                }
            }
        }

        $(
            impl EntityType for $ty {
                const KIND: EntityKind = EntityKind::$variant;

                fn into_entity(self) -> Entity {
                    Entity::$variant(self)
                }

                fn from_entity(entity: Entity) -> Option<Self> {
                    match entity {
                        Entity::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Entity {
                fn from(inner: $ty) -> Self {
                    Self::$variant(inner)
                }
            }

            impl From<$ty> for Batch {
                fn from(inner: $ty) -> Self {
                    Self::One(Entity::$variant(inner))
                }
            }

            impl From<Vec<$ty>> for Batch {
                fn from(items: Vec<$ty>) -> Self {
                    Self::Many(items.into_iter().map(Entity::$variant).collect())
                }
            }
        )+
    };
}

entity_types! {
    Ticket => Ticket,
    User => User,
    Organization => Organization,
    Group => Group,
    Brand => Brand,
    Topic => Topic,
    Comment => Comment,
    Attachment => Attachment,
    Thumbnail => Thumbnail,
    Metadata => Metadata,
    System => System,
    CreateEvent => CreateEvent,
    ChangeEvent => ChangeEvent,
    Notification => Notification,
    Via => Via,
    Source => Source,
    JobStatus => JobStatus,
    Audit => Audit,
}

impl Entity {
    /// Cache key, if the entity carries one.
    pub fn id(&self) -> Option<EntityId> {
        let number = match self {
            Self::Ticket(e) => e.id,
            Self::User(e) => e.id,
            Self::Organization(e) => e.id,
            Self::Group(e) => e.id,
            Self::Brand(e) => e.id,
            Self::Topic(e) => e.id,
            Self::Comment(e) => e.id,
            Self::Attachment(e) => e.id,
            Self::Thumbnail(e) => e.id,
            Self::CreateEvent(e) => e.id,
            Self::ChangeEvent(e) => e.id,
            Self::Notification(e) => e.id,
            Self::Audit(e) => e.id,
            Self::JobStatus(e) => return e.id.clone().map(EntityId::from),
            Self::Metadata(_) | Self::System(_) | Self::Via(_) | Self::Source(_) => None,
        };
        number.map(EntityId::Number)
    }

    /// Clone the wrapped struct out if it is a `T`.
    pub fn as_type<T: EntityType + Clone>(&self) -> Option<T> {
        T::from_entity(self.clone())
    }

    /// Move the wrapped struct out if it is a `T`.
    pub fn into_type<T: EntityType>(self) -> Option<T> {
        T::from_entity(self)
    }

    /// Plain JSON form, as the service expects it in request bodies.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
