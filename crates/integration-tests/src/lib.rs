//! Integration test harness for Barrel + Verse.
//!
//! Drives the real router in-process over the volatile storage backend, so
//! the full stack - session layer, extractors, validation, handlers,
//! storage - is exercised without a network listener or a database.
//!
//! ```rust,ignore
//! let app = TestApp::new();
//! let mut client = app.client();
//! let (status, body) = client
//!     .post("/api/auth/register", json!({
//!         "email": "sam@example.com",
//!         "password": "password123",
//!         "name": "Sam",
//!     }))
//!     .await;
//! assert_eq!(status, StatusCode::OK);
//! ```

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use barrel_verse_api::config::{Config, Environment};
use barrel_verse_api::middleware::session_layer;
use barrel_verse_api::routes;
use barrel_verse_api::state::AppState;
use barrel_verse_api::storage::{MemoryStorage, Storage};
use barrel_verse_core::Email;

/// A fully wired application instance backed by volatile storage.
///
/// Keeps a direct handle on the storage so tests can inspect state or
/// perform out-of-band mutations (admin grants happen via CLI in
/// production, so there is no HTTP route for them).
pub struct TestApp {
    router: Router,
    storage: Arc<MemoryStorage>,
}

impl TestApp {
    /// Build a fresh application with empty storage.
    #[must_use]
    pub fn new() -> Self {
        let config = Config {
            database_url: None,
            environment: Environment::Development,
            host: std::net::IpAddr::from([127, 0, 0, 1]),
            port: 0,
            sentry_dsn: None,
        };

        let storage = Arc::new(MemoryStorage::new());
        let state = AppState::new(config.clone(), Arc::clone(&storage) as Arc<dyn Storage>);
        let router = routes::app(state, session_layer(MemoryStore::default(), &config));

        Self { router, storage }
    }

    /// A client with its own cookie state.
    #[must_use]
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Direct access to the storage backend.
    #[must_use]
    pub fn storage(&self) -> &MemoryStorage {
        &self.storage
    }

    /// Register a user through the API and flip their admin flag directly
    /// in storage, mirroring what `bv-cli admin grant` does in production.
    ///
    /// Returns a logged-in client for the new admin.
    ///
    /// # Panics
    ///
    /// Panics if registration fails.
    pub async fn register_admin(&self, email: &str, password: &str) -> TestClient {
        let mut client = self.client();
        let (status, _) = client
            .post(
                "/api/auth/register",
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "name": "Admin",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "admin registration failed");

        let parsed = Email::parse(email).expect("valid admin email");
        let user = self
            .storage
            .get_user_by_email(&parsed)
            .await
            .expect("storage reachable")
            .expect("admin user present");
        self.storage
            .set_user_admin(user.id, true)
            .await
            .expect("storage reachable");

        client
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// An HTTP client over the in-process router, carrying the session cookie
/// between requests like a browser would.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// Send a request, capturing any session cookie the response sets.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the response body is not
    /// readable.
    pub async fn request(
        &mut self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let raw = set_cookie.to_str().expect("cookie is ascii");
            let pair = raw.split(';').next().expect("cookie has a value");
            self.cookie = Some(pair.to_owned());
        }

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body is readable")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }

    /// GET a path.
    pub async fn get(&mut self, path: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, None).await
    }

    /// POST a JSON body.
    pub async fn post(&mut self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(body)).await
    }

    /// POST with no body.
    pub async fn post_empty(&mut self, path: &str) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(Value::Object(serde_json::Map::new())))
            .await
    }

    /// PUT a JSON body.
    pub async fn put(&mut self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// DELETE a path.
    pub async fn delete(&mut self, path: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, None).await
    }
}
