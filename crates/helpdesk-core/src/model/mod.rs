pub mod audit;
pub mod brand;
pub mod comment;
pub mod entity;
pub mod entity_id;
pub mod job_status;
pub mod kind;
pub mod nullable;
pub mod ticket;
pub mod user;

pub use audit::{Audit, ChangeEvent, CreateEvent, Event, Metadata, Notification, System, TicketAudit};
pub use brand::{Brand, Topic};
pub use comment::{Attachment, Comment, Thumbnail};
pub use entity::{Batch, Entity, EntityType};
pub use entity_id::EntityId;
pub use job_status::JobStatus;
pub use kind::EntityKind;
pub use nullable::Nullable;
pub use ticket::{Source, Ticket, Via};
pub use user::{Group, Organization, User};
