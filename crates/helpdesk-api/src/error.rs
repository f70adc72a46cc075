use serde_json::Value;
use thiserror::Error;

/// Top-level error type for the `helpdesk-api` crate.
///
/// Every failure between the core and the remote service lands here:
/// connection problems, TLS setup, non-2xx statuses, and bodies that are
/// not valid JSON. `helpdesk-core` wraps these as its transport error.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The service rejected the email/token pair (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Status errors ───────────────────────────────────────────────
    /// Non-2xx status with a JSON error body, rendered as `key: value` lines.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Non-2xx status without a usable JSON body.
    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// A 2xx body that is not valid JSON, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Build the error for a non-2xx status whose body was already parsed.
    ///
    /// Object bodies become [`Error::Api`] with one `key: value` line per
    /// top-level entry; anything else falls back to [`Error::Http`].
    pub fn from_status(status: u16, body: &Value) -> Self {
        let message = render_error_body(body);

        if status == 401 {
            return Self::Authentication {
                message: message.unwrap_or_else(|| "invalid email or API token".into()),
            };
        }

        match message {
            Some(message) => Self::Api { status, message },
            None => Self::Http {
                status,
                reason: canonical_reason(status),
            },
        }
    }

    /// HTTP status code behind this error, if there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Api { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidUrl(_) | Self::Tls(_) | Self::Deserialization { .. } => None,
        }
    }

    /// Returns `true` if the service answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Render a JSON error body as `key: value` lines.
///
/// Returns `None` for non-object or empty bodies so callers can fall back
/// to the plain status reason.
pub(crate) fn render_error_body(body: &Value) -> Option<String> {
    let map = body.as_object().filter(|m| !m.is_empty())?;
    let lines: Vec<String> = map
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{key}: {s}"),
            other => format!("{key}: {other}"),
        })
        .collect();
    Some(lines.join("\n"))
}

pub(crate) fn canonical_reason(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map_or_else(|| format!("status {status}"), str::to_owned)
}
