//! Shared fixtures: a scripted HTTP transport and pre-wired app contexts.

#![allow(dead_code)]

use async_trait::async_trait;
use deal_pipeline::{
    ApiClient, ApiMetrics, AppContext, ClientConfig, Credential, HttpTransport, KeyValueStore, MemoryStore,
    Role, Router, SessionStore,
};
use reqwest::{Method, Request, Response, header::HeaderMap};
use serde_json::Value;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// A request as the transport saw it, after authentication
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.url
            .strip_prefix("http://localhost:8080/api")
            .unwrap_or(&self.url)
    }

    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
    }
}

/// Serves queued responses in order and records every request
#[derive(Default)]
pub struct FakeTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<VecDeque<(u16, String)>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: impl Into<String>) {
        self.responses.lock().unwrap().push_back((status, body.into()));
    }

    pub fn respond_json(&self, status: u16, body: Value) {
        self.respond(status, body.to_string());
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> RecordedRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request was sent")
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn execute(&self, request: Request) -> Result<Response, reqwest::Error> {
        let body = request
            .body()
            .and_then(|b| b.as_bytes())
            .map(|raw| serde_json::from_slice(raw).expect("request body is JSON"));
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method().clone(),
            url: request.url().to_string(),
            headers: request.headers().clone(),
            body,
        });

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((404, r#"{"message":"no response queued"}"#.to_string()));
        let response = http::Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        Ok(Response::from(response))
    }
}

pub struct Harness {
    pub ctx: AppContext,
    pub transport: Arc<FakeTransport>,
    pub router: Arc<Router>,
    pub metrics: ApiMetrics,
}

impl Harness {
    pub fn session(&self) -> &SessionStore {
        &self.ctx.session
    }
}

/// Context with an in-memory session, logged in as `role` if given
pub fn harness(role: Option<Role>) -> Harness {
    harness_with_storage(Arc::new(MemoryStore::new()), role)
}

/// Context whose session lives in `storage`
pub fn harness_with_storage(storage: Arc<dyn KeyValueStore>, role: Option<Role>) -> Harness {
    let config = ClientConfig::default();
    let session = SessionStore::new(storage);
    if let Some(role) = role {
        session
            .set_session(&credential(role))
            .expect("in-memory store accepts writes");
    }

    let transport = FakeTransport::new();
    let api = ApiClient::with_transport(
        &config.api,
        session.clone(),
        reqwest::Client::new(),
        transport.clone(),
    )
    .expect("default base URL parses");
    let metrics = ApiMetrics::new().expect("fresh registry");
    let api = api.with_metrics(metrics.clone());
    let router = Arc::new(Router::new());
    let ctx = AppContext::new(config, session, router.clone(), api);

    Harness {
        ctx,
        transport,
        router,
        metrics,
    }
}

pub fn credential(role: Role) -> Credential {
    Credential {
        access_token: format!("access-{}", role.as_str().to_lowercase()),
        refresh_token: "refresh-1".to_string(),
        role,
    }
}

/// Deal JSON as the server returns it
pub fn deal_json(id: &str, client: &str, sector: &str, deal_type: &str, stage: &str) -> Value {
    serde_json::json!({
        "id": id,
        "clientName": client,
        "sector": sector,
        "dealType": deal_type,
        "summary": format!("{client} summary"),
        "currentStage": stage,
        "notes": [],
        "createdAt": "2024-03-01T10:00:00Z",
        "updatedAt": "2024-03-01T10:00:00Z"
    })
}

pub fn user_json(id: &str, username: &str, role: &str, active: bool) -> Value {
    serde_json::json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "role": role,
        "active": active
    })
}
