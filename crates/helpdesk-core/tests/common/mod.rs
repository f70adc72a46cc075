// In-memory transport that replays scripted responses and records every
// request, so tests can count network calls.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use helpdesk_api::{ApiResponse, BaseUrl, Error, Transport};
use helpdesk_core::{CacheConfig, HelpdeskClient, ManualClock};
use serde_json::Value;
use url::Url;

pub const BASE: &str = "https://acme.zendesk.com/api/v2/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
}

/// Responses are queued per (method, path) and served in order. Statuses
/// are returned as-is, including non-2xx, so the client's own status
/// checks are exercised.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<(Method, String), VecDeque<(u16, Value)>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response for `path` relative to the API root, e.g. `"tickets/1.json"`.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        let key = (method, format!("/api/v2/{path}"));
        self.responses
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .push_back((status, body));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn serve(&self, method: Method, url: &Url, body: Option<&Value>) -> Result<ApiResponse, Error> {
        self.requests.lock().unwrap().push(Request {
            method,
            url: url.clone(),
            body: body.cloned(),
        });
        let key = (method, url.path().to_owned());
        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);
        match next {
            Some((status, body)) => Ok(ApiResponse { status, body }),
            None => Err(Error::Http {
                status: 599,
                reason: format!("no scripted response for {method:?} {}", url.path()),
            }),
        }
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &Url) -> Result<ApiResponse, Error> {
        self.serve(Method::Get, url, None)
    }

    fn post(&self, url: &Url, body: &Value) -> Result<ApiResponse, Error> {
        self.serve(Method::Post, url, Some(body))
    }

    fn put(&self, url: &Url, body: &Value) -> Result<ApiResponse, Error> {
        self.serve(Method::Put, url, Some(body))
    }

    fn delete(&self, url: &Url) -> Result<u16, Error> {
        self.serve(Method::Delete, url, None).map(|r| r.status)
    }
}

pub struct Harness {
    pub client: HelpdeskClient,
    pub transport: Arc<ScriptedTransport>,
    pub clock: Arc<ManualClock>,
}

pub fn harness() -> Harness {
    harness_with(&CacheConfig::default())
}

pub fn harness_with(cache: &CacheConfig) -> Harness {
    let transport = ScriptedTransport::new();
    let clock = Arc::new(ManualClock::new());
    let client = HelpdeskClient::with_transport(
        transport.clone(),
        BaseUrl::parse(BASE).unwrap(),
        cache,
        clock.clone(),
    );
    Harness {
        client,
        transport,
        clock,
    }
}

/// Query parameter value from a recorded URL.
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}
