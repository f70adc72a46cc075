// Blocking HTTP transport for the helpdesk REST API.
//
// The core only ever talks to the service through the `Transport` trait;
// `HttpTransport` is the production implementation over
// `reqwest::blocking::Client`. Every call blocks the calling thread until
// the round trip completes and performs exactly one attempt.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::Credentials;
use crate::error::{Error, canonical_reason};

/// Status code and parsed JSON body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

/// The narrow request surface the core depends on.
///
/// Implementations must surface any status outside 200..=299 as an
/// [`Error`]: [`Error::Api`] when the body is a JSON error document,
/// [`Error::Http`] otherwise.
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> Result<ApiResponse, Error>;

    fn post(&self, url: &Url, body: &Value) -> Result<ApiResponse, Error>;

    fn put(&self, url: &Url, body: &Value) -> Result<ApiResponse, Error>;

    /// Returns the response status code.
    fn delete(&self, url: &Url) -> Result<u16, Error>;
}

// ── Transport configuration ─────────────────────────────────────────

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the bundled/system certificate roots.
    #[default]
    System,
    /// Add a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (proxies with self-signed certs).
    DangerAcceptInvalid,
}

/// Shared configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            user_agent: concat!("helpdesk/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Build a blocking `reqwest` client from this config.
    pub fn build_client(&self) -> Result<Client, Error> {
        let mut builder = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str());

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

// ── HTTP transport ──────────────────────────────────────────────────

/// [`Transport`] over a blocking `reqwest` client with token auth.
pub struct HttpTransport {
    http: Client,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(credentials: Credentials, config: &TransportConfig) -> Result<Self, Error> {
        let http = config.build_client()?;
        Ok(Self { http, credentials })
    }

    /// Wrap a pre-built client (caller manages TLS and timeouts).
    pub fn with_client(http: Client, credentials: Credentials) -> Self {
        Self { http, credentials }
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(self.credentials.username(), Some(self.credentials.password()))
    }

    /// Check the status and parse the body.
    ///
    /// Empty success bodies (204, some DELETEs) come back as `Value::Null`.
    fn handle_response(resp: Response) -> Result<ApiResponse, Error> {
        let status = resp.status();
        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let text = resp.text()?;
        trace!(status = status.as_u16(), bytes = text.len(), "response received");

        if !status.is_success() {
            return Err(Self::status_error(status.as_u16(), is_json, &text));
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                let preview: String = text.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body: text.clone(),
                }
            })?
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }

    fn status_error(status: u16, is_json: bool, text: &str) -> Error {
        if is_json {
            if let Ok(body) = serde_json::from_str::<Value>(text) {
                return Error::from_status(status, &body);
            }
        }

        if status == 401 {
            return Error::Authentication {
                message: "invalid email or API token".into(),
            };
        }

        let preview: String = text.chars().take(200).collect();
        Error::Http {
            status,
            reason: if preview.trim().is_empty() {
                canonical_reason(status)
            } else {
                preview
            },
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<ApiResponse, Error> {
        debug!("GET {url}");
        let resp = self.authed(self.http.get(url.clone())).send()?;
        Self::handle_response(resp)
    }

    fn post(&self, url: &Url, body: &Value) -> Result<ApiResponse, Error> {
        debug!("POST {url}");
        let resp = self.authed(self.http.post(url.clone()).json(body)).send()?;
        Self::handle_response(resp)
    }

    fn put(&self, url: &Url, body: &Value) -> Result<ApiResponse, Error> {
        debug!("PUT {url}");
        let resp = self.authed(self.http.put(url.clone()).json(body)).send()?;
        Self::handle_response(resp)
    }

    fn delete(&self, url: &Url) -> Result<u16, Error> {
        debug!("DELETE {url}");
        let resp = self.authed(self.http.delete(url.clone())).send()?;
        Self::handle_response(resp).map(|r| r.status)
    }
}
