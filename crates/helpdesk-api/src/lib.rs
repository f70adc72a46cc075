// helpdesk-api: blocking transport and URL plumbing for the helpdesk REST API (v2)

pub mod auth;
pub mod endpoint;
pub mod error;
pub mod transport;

pub use auth::Credentials;
pub use endpoint::{BaseUrl, Endpoint, EndpointMode};
pub use error::Error;
pub use transport::{ApiResponse, HttpTransport, TlsMode, Transport, TransportConfig};
