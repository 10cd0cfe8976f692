//! Shared test fixtures: scripted transport, recording navigator, temp dirs.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::auth::navigator::Navigator;
use crate::error::ApiError;
use crate::net::gateway::ApiClient;
use crate::net::transport::{ApiRequest, ApiResponse, Transport};
use crate::net::types::{CredentialPair, UserProfile};
use crate::store::{MemoryTokenStore, TokenStore};

// =========================================================================
// Fixtures
// =========================================================================

pub fn pair(access: &str, refresh: &str) -> CredentialPair {
    CredentialPair { access_token: access.into(), refresh_token: refresh.into() }
}

pub fn user(id: &str) -> UserProfile {
    serde_json::from_value(serde_json::json!({ "id": id, "name": format!("user {id}"), "email": format!("{id}@example.test") }))
        .unwrap()
}

pub fn user_json(id: &str) -> Value {
    serde_json::to_value(user(id)).unwrap()
}

pub fn tokens_json(access: &str, refresh: &str) -> Value {
    serde_json::json!({ "accessToken": access, "refreshToken": refresh })
}

// =========================================================================
// MockTransport
// =========================================================================

/// What the mock server does for one call.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, Value),
    Empty(u16),
    Network(&'static str),
    Delayed(Duration, Box<Reply>),
}

/// Transport that answers from per-route queues and records every request.
///
/// Routes are keyed `"METHOD /path"`. The last queued reply for a route is
/// sticky so a test only scripts what changes. Unscripted routes get 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry(route_key(&method, path))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|req| req.method == method && req.path == path)
            .count()
    }

    pub fn total(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next_reply(&self, request: &ApiRequest) -> Reply {
        let mut routes = self.routes.lock().unwrap();
        let Some(queue) = routes.get_mut(&route_key(&request.method, &request.path)) else {
            return Reply::Json(404, serde_json::json!({ "message": "no such route" }));
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

fn route_key(method: &Method, path: &str) -> String {
    format!("{method} {path}")
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.calls.lock().unwrap().push(request.clone());
        let mut reply = self.next_reply(request);
        loop {
            match reply {
                Reply::Json(status, body) => return Ok(ApiResponse::new(status, body.to_string())),
                Reply::Empty(status) => return Ok(ApiResponse::new(status, "")),
                Reply::Network(message) => return Err(ApiError::Network(message.into())),
                Reply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
            }
        }
    }
}

// =========================================================================
// RecordingNavigator
// =========================================================================

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: AtomicUsize,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

// =========================================================================
// Harness
// =========================================================================

/// A gateway wired to a mock transport, memory store, and recording navigator.
pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub store: Arc<MemoryTokenStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub client: Arc<ApiClient>,
}

impl Harness {
    pub fn new(store: MemoryTokenStore) -> Self {
        let transport = MockTransport::new();
        let store = Arc::new(store);
        let navigator = RecordingNavigator::new();
        let client = Arc::new(ApiClient::new(
            transport.clone(),
            store.clone() as Arc<dyn TokenStore>,
            navigator.clone(),
        ));
        Self { transport, store, navigator, client }
    }

    pub fn empty() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    pub fn logged_in(access: &str, refresh: &str) -> Self {
        Self::new(MemoryTokenStore::with_credentials(&pair(access, refresh)))
    }
}

// =========================================================================
// TempDir
// =========================================================================

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Unique scratch directory, removed on drop.
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(label: &str) -> Self {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!("watchlog-{label}-{}-{n}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
