//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use helpdesk_config::ConfigError;
use helpdesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the helpdesk API")]
    #[diagnostic(
        code(helpdesk::connection_failed),
        help(
            "Check the subdomain (or base_url) and your network connection.\n\
             Try: helpdesk config show"
        )
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(helpdesk::tls_error),
        help(
            "Use --insecure (-k) to accept self-signed certificates,\n\
             or configure ca_cert in your profile."
        )
    )]
    TlsError { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(helpdesk::auth_failed),
        help(
            "Verify the agent email and API token.\n\
             Run: helpdesk config set-token --profile {profile} <TOKEN>"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(helpdesk::no_credentials),
        help(
            "Store one with: helpdesk config set-token <TOKEN>\n\
             Or set the HELPDESK_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(helpdesk::not_found),
        help("Run: helpdesk {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Permission denied (HTTP 403): {message}")]
    #[diagnostic(
        code(helpdesk::forbidden),
        help("This action needs a role the token's agent does not have.")
    )]
    Forbidden { message: String },

    #[error("Request conflicts with the current state (HTTP {status}): {message}")]
    #[diagnostic(code(helpdesk::conflict))]
    Conflict { status: u16, message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(helpdesk::api_error))]
    ApiError { code: String, message: String },

    #[error("Unexpected response: {message}")]
    #[diagnostic(
        code(helpdesk::unexpected_response),
        help("Run again with -vv to log the raw requests.")
    )]
    UnexpectedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(helpdesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(helpdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: helpdesk config add-profile"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No account configured")]
    #[diagnostic(
        code(helpdesk::no_config),
        help(
            "Create a profile with: helpdesk config add-profile <NAME> --subdomain <SUB> --email <EMAIL>\n\
             Or pass --subdomain, --email and --token.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(helpdesk::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(helpdesk::confirmation_required),
        help("Re-run with --yes (-y) to confirm.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out")]
    #[diagnostic(
        code(helpdesk::timeout),
        help("Increase the timeout with --timeout or retry later.")
    )]
    Timeout,

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Rewrite a 404 from a lookup into a `NotFound` naming what was asked for.
    pub fn lookup(err: CoreError, resource_type: &str, identifier: &str, list_command: &str) -> Self {
        if err.is_not_found() {
            return Self::NotFound {
                resource_type: resource_type.into(),
                identifier: identifier.into(),
                list_command: list_command.into(),
            };
        }
        err.into()
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport(api) => api.into(),

            CoreError::UnknownType { name } => CliError::Validation {
                field: "type".into(),
                reason: format!("unknown entity type '{name}'"),
            },

            CoreError::EmptyBatch => CliError::Validation {
                field: "input".into(),
                reason: "nothing to send".into(),
            },

            other @ (CoreError::UnknownResponse { .. }
            | CoreError::Mapping { .. }
            | CoreError::MissingField { .. }
            | CoreError::MissingKey { .. }
            | CoreError::KindMismatch { .. }) => CliError::UnexpectedResponse {
                message: other.to_string(),
            },
        }
    }
}

impl From<helpdesk_api::Error> for CliError {
    fn from(err: helpdesk_api::Error) -> Self {
        use helpdesk_api::Error as ApiErr;

        match err {
            ApiErr::Authentication { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },
            ApiErr::Transport(e) if e.is_timeout() => CliError::Timeout,
            ApiErr::Transport(e) => CliError::ConnectionFailed { source: e.into() },
            ApiErr::InvalidUrl(e) => CliError::Validation {
                field: "base_url".into(),
                reason: e.to_string(),
            },
            ApiErr::Tls(message) => CliError::TlsError { message },
            ApiErr::Api { status: 403, message } => CliError::Forbidden { message },
            ApiErr::Api {
                status: status @ (409 | 422),
                message,
            } => CliError::Conflict { status, message },
            ApiErr::Api { status, message } => CliError::ApiError {
                code: status.to_string(),
                message,
            },
            ApiErr::Http { status, reason } => CliError::ApiError {
                code: status.to_string(),
                message: reason,
            },
            ApiErr::Deserialization { message, .. } => CliError::UnexpectedResponse { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lookup_names_the_resource() {
        let core = CoreError::Transport(helpdesk_api::Error::Http {
            status: 404,
            reason: "Not Found".into(),
        });
        let err = CliError::lookup(core, "ticket", "42", "tickets list");
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "ticket '42' not found");
    }

    #[test]
    fn status_codes_map_to_exit_codes() {
        let auth: CliError = helpdesk_api::Error::Authentication {
            message: "bad token".into(),
        }
        .into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let forbidden: CliError = helpdesk_api::Error::Api {
            status: 403,
            message: "error: Forbidden".into(),
        }
        .into();
        assert_eq!(forbidden.exit_code(), exit_code::PERMISSION);

        let invalid: CliError = helpdesk_api::Error::Api {
            status: 422,
            message: "error: RecordInvalid".into(),
        }
        .into();
        assert_eq!(invalid.exit_code(), exit_code::CONFLICT);
    }

    #[test]
    fn decoding_failures_are_general_errors() {
        let err: CliError = CoreError::UnknownResponse {
            keys: vec!["surprise".into()],
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::GENERAL);
        assert!(err.to_string().contains("surprise"));
    }

    #[test]
    fn missing_token_is_an_auth_error() {
        let err: CliError = ConfigError::NoCredentials {
            profile: "work".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
