// URL construction for helpdesk resources.
//
// Every resource lives under `https://{subdomain}.zendesk.com/api/v2/` and
// is addressed as `{path}.json`. An `Endpoint` names the resource path
// (optionally a per-parent sub-collection) and the sideloads it supports;
// an `EndpointMode` picks the operation.

use std::fmt;

use url::Url;

use crate::error::Error;

// ── Base URL ────────────────────────────────────────────────────────

/// Root of the v2 API for one account. Always ends with a `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// `https://{subdomain}.zendesk.com/api/v2/`
    pub fn for_subdomain(subdomain: &str) -> Result<Self, Error> {
        Self::parse(&format!("https://{subdomain}.zendesk.com/api/v2/"))
    }

    /// Parse an explicit base URL (proxies, mock servers).
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Endpoint ────────────────────────────────────────────────────────

/// Which operation a URL is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointMode {
    /// `{collection}/{id}` or, for sub-collections, `{collection}/{id}/{child}`.
    Show { id: String },
    /// `{collection}` with query parameters.
    List { params: Vec<(String, String)> },
    /// `{collection}/show_many?ids=..`
    ShowMany { ids: Vec<String> },
    /// `{collection}` (POST)
    Create,
    /// `{collection}/create_many` (POST)
    CreateMany,
    /// `{collection}/{id}` (PUT)
    Update { id: String },
    /// `{collection}/update_many` (PUT)
    UpdateMany,
    /// `{collection}/{id}` (DELETE)
    Delete { id: String },
    /// `{collection}/destroy_many?ids=..` (DELETE)
    DestroyMany { ids: Vec<String> },
}

/// A resource path plus the sideloads it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    collection: String,
    child: Option<String>,
    sideloads: Vec<&'static str>,
}

impl Endpoint {
    /// A top-level collection such as `"tickets"` or `"tickets/recent"`.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            child: None,
            sideloads: Vec::new(),
        }
    }

    /// A per-parent collection, e.g. `users/{id}/groups`.
    pub fn nested(collection: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            child: Some(child.into()),
            sideloads: Vec::new(),
        }
    }

    /// Declare the related collections requested via `include=` on reads.
    pub fn with_sideloads(mut self, sideloads: &[&'static str]) -> Self {
        self.sideloads = sideloads.to_vec();
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Build the fully qualified URL for `mode`.
    ///
    /// `sideload` only applies to read modes; writes never request it.
    pub fn url(&self, base: &BaseUrl, mode: &EndpointMode, sideload: bool) -> Result<Url, Error> {
        let collection = self.collection.trim_matches('/');
        let (path, query): (String, Vec<(String, String)>) = match mode {
            EndpointMode::Show { id } => match &self.child {
                Some(child) => (format!("{collection}/{id}/{child}"), Vec::new()),
                None => (format!("{collection}/{id}"), Vec::new()),
            },
            EndpointMode::List { params } => (collection.to_owned(), params.clone()),
            EndpointMode::ShowMany { ids } => (
                format!("{collection}/show_many"),
                vec![("ids".to_owned(), ids.join(","))],
            ),
            EndpointMode::Create => (collection.to_owned(), Vec::new()),
            EndpointMode::CreateMany => (format!("{collection}/create_many"), Vec::new()),
            EndpointMode::Update { id } | EndpointMode::Delete { id } => {
                (format!("{collection}/{id}"), Vec::new())
            }
            EndpointMode::UpdateMany => (format!("{collection}/update_many"), Vec::new()),
            EndpointMode::DestroyMany { ids } => (
                format!("{collection}/destroy_many"),
                vec![("ids".to_owned(), ids.join(","))],
            ),
        };

        let mut url = base.as_url().join(&format!("{path}.json"))?;

        let is_read = matches!(
            mode,
            EndpointMode::Show { .. } | EndpointMode::List { .. } | EndpointMode::ShowMany { .. }
        );
        let include = (sideload && is_read && !self.sideloads.is_empty())
            .then(|| self.sideloads.join(","));

        if !query.is_empty() || include.is_some() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &query {
                pairs.append_pair(key, value);
            }
            if let Some(include) = include {
                pairs.append_pair("include", &include);
            }
        }

        Ok(url)
    }
}
