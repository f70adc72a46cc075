// ── Paged result iteration ──
//
// A forward-only iterator over a collection that may span several pages.
// The first page arrives already fetched; later pages are requested only
// when the current one is used up. Every fetched page is handed to the
// cache once, as a whole, before any of its items are yielded.

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::client::ClientContext;
use crate::error::CoreError;
use crate::model::{Entity, EntityKind};

/// Lazy sequence of entities from a paginated response.
///
/// Single pass: once exhausted it stays exhausted, and iterating again
/// needs a new query. Not meant to be shared between threads.
pub struct ResultGenerator {
    ctx: Arc<ClientContext>,
    kind: EntityKind,
    result_key: String,
    items: Vec<Value>,
    position: usize,
    next_page: Option<Url>,
    total: Option<u64>,
    done: bool,
}

impl fmt::Debug for ResultGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultGenerator")
            .field("kind", &self.kind)
            .field("result_key", &self.result_key)
            .field("position", &self.position)
            .field("page_len", &self.items.len())
            .field("next_page", &self.next_page.as_ref().map(Url::as_str))
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl ResultGenerator {
    /// Wrap an already-fetched first page. Items are read from
    /// `result_key` and decoded as `kind` unless they carry `result_type`.
    pub(crate) fn new(
        ctx: Arc<ClientContext>,
        kind: EntityKind,
        result_key: impl Into<String>,
        first_page: &Value,
    ) -> Result<Self, CoreError> {
        let mut generator = Self {
            ctx,
            kind,
            result_key: result_key.into(),
            items: Vec::new(),
            position: 0,
            next_page: None,
            total: None,
            done: false,
        };
        generator.load(first_page)?;
        Ok(generator)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Size of the whole result set, when the service reports `count`.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Whether another page is still to be fetched.
    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }

    fn load(&mut self, page: &Value) -> Result<(), CoreError> {
        self.ctx.cache.put_page(&self.ctx.mapper, self.kind, page)?;

        self.items = page
            .get(&self.result_key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        self.position = 0;
        self.next_page = page
            .get("next_page")
            .and_then(Value::as_str)
            .map(Url::parse)
            .transpose()
            .map_err(helpdesk_api::Error::from)?;
        if let Some(count) = page.get("count").and_then(Value::as_u64) {
            self.total = Some(count);
        }
        if self.items.is_empty() {
            self.done = true;
        }

        trace!(
            entity = %self.kind,
            items = self.items.len(),
            more = self.next_page.is_some(),
            "page loaded"
        );
        Ok(())
    }

    fn fetch_next(&mut self, url: &Url) -> Result<(), CoreError> {
        debug!(entity = %self.kind, %url, "fetching next page");
        let page = self.ctx.get(url)?;
        self.load(&page)
    }

    fn decode(&self, item: &Value) -> Result<Entity, CoreError> {
        let kind = match item.get("result_type").and_then(Value::as_str) {
            Some(tag) => self.ctx.registry.resolve(tag)?,
            None => self.kind,
        };
        self.ctx.mapper.build_kind(kind, item)
    }
}

impl Iterator for ResultGenerator {
    type Item = Result<Entity, CoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if let Some(item) = self.items.get(self.position) {
                let decoded = self.decode(item);
                self.position += 1;
                return Some(decoded);
            }

            let Some(url) = self.next_page.take() else {
                self.done = true;
                return None;
            };
            if let Err(e) = self.fetch_next(&url) {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}

impl FusedIterator for ResultGenerator {}
