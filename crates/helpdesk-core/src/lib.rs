//! Object resolution, caching, and pagination between `helpdesk-api` and
//! its consumers (the CLI, scripts, services).
//!
//! - **[`HelpdeskClient`]**: facade owning one account's transport, type
//!   registry, cache, and mapper. Hands out per-kind handles
//!   ([`TicketApi`], [`UserApi`], [`EntityApi`]) and runs searches.
//!
//! - **[`TypeRegistry`]**: wire type names to [`EntityKind`], and each kind
//!   to its [`CachePolicy`]. Built per client from [`CacheConfig`].
//!
//! - **[`ObjectCache`]**: one bounded store per cacheable kind. Reference
//!   data (users, organizations, groups, brands) evicts least recently
//!   used; tickets and comments also expire after a short TTL; job
//!   statuses are never cached.
//!
//! - **[`ObjectMapper`]**: raw JSON to typed [`Entity`] values and back,
//!   including polymorphic audit events and create/update responses.
//!
//! - **[`ResultGenerator`]**: lazy, single-pass iteration over paginated
//!   collections, fetching each further page only when needed.
//!
//! Everything is synchronous: a cache miss or page fetch blocks the
//! calling thread for one HTTP round trip.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod mapper;
pub mod model;
pub mod registry;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::{EntityApi, Lookup, TicketApi, UserApi};
pub use cache::{CacheStats, Clock, ManualClock, ObjectCache, SystemClock};
pub use client::HelpdeskClient;
pub use config::{CacheConfig, ClientConfig};
pub use error::CoreError;
pub use generator::ResultGenerator;
pub use mapper::{MutationResponse, ObjectMapper};
pub use registry::{CachePolicy, RESERVED_FIELDS, TypeRegistry};

pub use model::{
    Attachment, Audit, Batch, Brand, ChangeEvent, Comment, CreateEvent, Entity, EntityId, EntityKind, EntityType,
    Event, Group, JobStatus, Metadata, Notification, Nullable, Organization, Source, System, Thumbnail, Ticket,
    TicketAudit, Topic, User, Via,
};
