//! Shared fixtures for HTTP and search integration tests

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use occupancy_lookup::{
    api::{build_router, AppState},
    config::Config,
    error::{AppError, Result},
    models::{Document, PasswordScheme, UserCredential},
    state::{create_in_memory_store, DocumentFilter, DocumentStore},
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const COOKIE_NAME: &str = "occupancy_session";

pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

/// Records used across the flow tests
pub fn sample_records() -> Vec<Document> {
    vec![
        doc(json!({
            "address": "12 Main St",
            "name": "John Doe",
            "bsl_on_roll": "Yes",
            "lease": "L-1001",
            "licence": "LIC-77",
        })),
        doc(json!({
            "address": "14 Main St",
            "name": "Jane Smith",
            "bsl_on_roll": "No",
            "lease": "a.b*c",
            "licence": "",
        })),
        doc(json!({
            "address": "16 Main St",
            "name": "John Doe",
            "bsl_on_roll": "No",
            "lease": "L-1003",
            "licence": "LIC-78",
        })),
    ]
}

/// In-memory store seeded with `admin`/`correct` and the sample records
pub async fn seeded_store(scheme: PasswordScheme) -> Arc<dyn DocumentStore> {
    let store = create_in_memory_store();
    store
        .insert_one("users", UserCredential::new("admin", "correct", scheme).into_document())
        .await
        .unwrap();
    for record in sample_records() {
        store.insert_one("details", record).await.unwrap();
    }
    store
}

pub fn test_config(scheme: PasswordScheme) -> Config {
    let mut config = Config::default();
    config.store.url = Some("memory://".to_string());
    config.auth.password_scheme = scheme;
    config
}

/// Wraps a store and fails every lookup in one collection
pub struct UnreachableCollection {
    pub inner: Arc<dyn DocumentStore>,
    pub collection: &'static str,
}

impl UnreachableCollection {
    fn check(&self, collection: &str) -> Result<()> {
        if collection == self.collection {
            return Err(AppError::Database("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for UnreachableCollection {
    async fn find_one(&self, collection: &str, filter: &DocumentFilter) -> Result<Option<Document>> {
        self.check(collection)?;
        self.inner.find_one(collection, filter).await
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<String> {
        self.check(collection)?;
        self.inner.insert_one(collection, document).await
    }

    async fn count(&self, collection: &str) -> Result<u64> {
        self.check(collection)?;
        self.inner.count(collection).await
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}

/// Router whose store fails every lookup in `collection`
pub async fn app_with_unreachable(collection: &'static str) -> Router {
    let store = seeded_store(PasswordScheme::Plaintext).await;
    let store = Arc::new(UnreachableCollection {
        inner: store,
        collection,
    });
    build_router(AppState::new(store, &test_config(PasswordScheme::Plaintext)))
}

pub async fn test_app() -> Router {
    let store = seeded_store(PasswordScheme::Plaintext).await;
    build_router(AppState::new(store, &test_config(PasswordScheme::Plaintext)))
}

/// A response reduced to what the tests inspect
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookie: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Session id issued by the server, if any
    pub fn session_id(&self) -> Option<String> {
        let cookie = self.set_cookie.as_deref()?;
        let (pair, _) = cookie.split_once(';')?;
        let (name, value) = pair.split_once('=')?;
        (name == COOKIE_NAME && !value.is_empty()).then(|| value.to_string())
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let header_str = |name| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let location = header_str(header::LOCATION);
    let set_cookie = header_str(header::SET_COOKIE);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        location,
        set_cookie,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub fn get(uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(id) = session {
        builder = builder.header(header::COOKIE, format!("{}={}", COOKIE_NAME, id));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, session: Option<&str>, fields: &[(&str, &str)]) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, form_encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(id) = session {
        builder = builder.header(header::COOKIE, format!("{}={}", COOKIE_NAME, id));
    }
    builder.body(Body::from(body)).unwrap()
}

fn form_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            other => format!("%{:02X}", other),
        })
        .collect()
}

/// Log in as admin and return the authenticated session id
pub async fn login(app: &Router) -> String {
    let response = send(
        app,
        post_form("/login", None, &[("username", "admin"), ("password", "correct")]),
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    response.session_id().expect("login issues a session cookie")
}
