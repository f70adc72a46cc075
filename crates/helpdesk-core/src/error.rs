use thiserror::Error;

/// Errors raised by the resolution, caching, and paging layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An entity type name (or event tag) the registry does not know.
    #[error("unknown entity type: {name}")]
    UnknownType { name: String },

    /// A write response with none of the recognised top-level shapes.
    #[error("could not interpret response with keys: {}", keys.join(", "))]
    UnknownResponse { keys: Vec<String> },

    /// Any failure from the HTTP layer, including non-2xx statuses.
    #[error(transparent)]
    Transport(#[from] helpdesk_api::Error),

    /// A payload that does not fit the struct registered for its kind.
    #[error("cannot map {entity_type}: {message}")]
    Mapping {
        entity_type: String,
        message: String,
    },

    #[error("{entity_type} has no `{field}`")]
    MissingField {
        entity_type: String,
        field: &'static str,
    },

    /// A response lacking the key the request expected.
    #[error("response has no `{key}` key")]
    MissingKey { key: String },

    #[error("expected {expected}, got {found}")]
    KindMismatch { expected: String, found: String },

    #[error("nothing to send: the batch is empty")]
    EmptyBatch,
}

impl CoreError {
    /// Returns `true` if the service answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_not_found())
    }

    /// HTTP status behind a transport failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}
