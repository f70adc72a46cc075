use secrecy::{ExposeSecret, SecretString};

/// Credentials for the helpdesk REST API.
///
/// The service authenticates API tokens with HTTP Basic auth where the
/// user part is `"{email}/token"` and the password is the token itself.
#[derive(Debug, Clone)]
pub struct Credentials {
    email: String,
    token: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, token: SecretString) -> Self {
        Self {
            email: email.into(),
            token,
        }
    }

    /// The account email the token belongs to.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Basic-auth user name: `{email}/token`.
    pub fn username(&self) -> String {
        format!("{}/token", self.email)
    }

    pub(crate) fn password(&self) -> &str {
        self.token.expose_secret()
    }
}
