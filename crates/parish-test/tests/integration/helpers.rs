#![allow(clippy::unused_async, clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Setting up an isolated store per test
//! - Creating the Salvo service with the same hoops as the server binary
//! - Making JSON requests and asserting on responses
//!
//! ## Store Isolation
//! Each `TestDb` opens its own in-memory SQLite database through the regular
//! provider bootstrap, schema included. Nothing is shared between tests, so
//! they run in parallel without coordination.

use std::sync::Arc;

use salvo::http::{Method, StatusCode};
use salvo::prelude::*;
use salvo::test::{RequestBuilder, ResponseExt, TestClient};
use serde_json::Value;

use parish_test::app::api::routes;
use parish_test::app::{ConfigHandler, ServicesHandler};
use parish_test::component::config::{
    DatabaseConfig, LoggingConfig, PaginationConfig, ServerConfig, Settings,
};
use parish_test::component::constants::API_V1_PREFIX;
use parish_test::component::db::connection::create_provider;
use parish_test::component::db::query::user;
use parish_test::component::db::statement::Statement;
use parish_test::component::db::DbProvider;
use parish_test::component::model::user::NewUser;
use parish_test::component::service::Services;

pub use serde_json::json;
pub use tracing;

/// Settings matching the server defaults, pointed at a private in-memory store.
#[must_use]
pub fn test_config() -> Settings {
    Settings {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            auth_token: None,
            max_connections: 1,
            apply_schema: true,
            timeout_secs: None,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        pagination: PaginationConfig::default(),
    }
}

/// Database test helper for setup and seeding.
pub struct TestDb {
    provider: Arc<dyn DbProvider>,
    config: Settings,
}

impl TestDb {
    /// Opens a fresh store with the schema applied.
    ///
    /// ## Errors
    /// Returns an error if the store cannot be opened or bootstrapped.
    pub async fn new() -> anyhow::Result<Self> {
        let config = test_config();
        let provider = create_provider(&config.database).await?;
        Ok(Self { provider, config })
    }

    /// Builds the service with the same hoops and routes as the server binary.
    #[must_use]
    pub fn service(&self) -> Service {
        let router = Router::new()
            .hoop(ServicesHandler {
                services: Arc::new(Services::new(&self.provider)),
            })
            .hoop(ConfigHandler {
                settings: self.config.clone(),
            })
            .push(routes());
        Service::new(router)
    }

    /// Seeds a login account and returns its id.
    ///
    /// ## Errors
    /// Returns an error if the account cannot be inserted or read back.
    pub async fn seed_user(&self, username: &str) -> anyhow::Result<i64> {
        let mut conn = self.provider.get_connection().await?;
        user::ensure_user(
            &mut conn,
            &NewUser {
                email: format!("{username}@parish.local"),
                username: username.to_string(),
                password_hash: "$argon2id$placeholder".to_string(),
                full_name: Some(username.to_string()),
                role: "staff".to_string(),
                is_active: true,
            },
        )
        .await?;
        let found = user::find_user_by_username(&mut conn, username)
            .await?
            .ok_or_else(|| anyhow::anyhow!("seeded user {username} not found"))?;
        Ok(found.id)
    }

    /// Runs a scalar query, typically a `COUNT(*)`.
    ///
    /// ## Errors
    /// Returns an error if the query fails.
    pub async fn count(&self, sql: &str) -> anyhow::Result<i64> {
        let mut conn = self.provider.get_connection().await?;
        Ok(conn.fetch_scalar(&Statement::new(sql)).await?)
    }

    /// Runs a statement directly against the store, bypassing the API, and
    /// returns the affected row count.
    ///
    /// ## Errors
    /// Returns an error if the statement fails.
    pub async fn execute(&self, sql: &str) -> anyhow::Result<u64> {
        let mut conn = self.provider.get_connection().await?;
        Ok(conn.execute(&Statement::new(sql)).await?.rows_affected())
    }
}

/// Test request builder for JSON endpoints under `/api/v1`.
pub struct TestRequest {
    method: Method,
    path: String,
    body: Option<Value>,
}

impl TestRequest {
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// ## Panics
    /// Panics if the response body cannot be read.
    pub async fn send(self, service: &Service) -> TestResponse {
        let url = format!("http://127.0.0.1:5800{API_V1_PREFIX}{}", self.path);

        let mut client = match self.method.as_str() {
            "GET" => TestClient::get(&url),
            "POST" => TestClient::post(&url),
            "PUT" => TestClient::put(&url),
            "DELETE" => TestClient::delete(&url),
            _ => RequestBuilder::new(&url, self.method.clone()),
        };

        if let Some(body) = &self.body {
            client = client.json(body);
        }

        let mut response = client.send(service).await;
        let status = response
            .status_code
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.take_string().await.expect("readable response body");

        TestResponse { status, body }
    }
}

/// Represents an HTTP test response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    /// Asserts that the response status matches the expected code.
    #[must_use]
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status, expected,
            "Expected status {expected} but got {}: {}",
            self.status, self.body
        );
        self
    }

    /// Asserts that the response status is in the 2xx range.
    #[must_use]
    pub fn assert_success(self) -> Self {
        assert!(
            self.status.is_success(),
            "Expected success status but got {}: {}",
            self.status,
            self.body
        );
        self
    }

    /// Asserts that the error envelope's `detail` contains `expected`.
    #[must_use]
    pub fn assert_detail_contains(self, expected: &str) -> Self {
        let detail = self.json()["detail"].as_str().map(str::to_string);
        assert!(
            detail.as_deref().is_some_and(|d| d.contains(expected)),
            "Expected detail containing {expected:?}, got {detail:?}"
        );
        self
    }

    /// ## Panics
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("JSON response body")
    }

    /// The `id` of a create response.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.json()["id"].as_i64().expect("create response carries an id")
    }

    /// Length of a JSON array body.
    #[must_use]
    pub fn array_len(&self) -> usize {
        self.json().as_array().map_or(0, Vec::len)
    }
}

/// Body of a minimal member registration.
#[must_use]
pub fn member_body(name: &str, created_by: i64) -> Value {
    json!({
        "name": name,
        "birth_date": "1980-05-12",
        "gender": "남",
        "registration_date": "2020-01-05",
        "created_by": created_by,
    })
}

/// Registers a member through the API and returns its id.
pub async fn create_member(service: &Service, name: &str, created_by: i64) -> i64 {
    TestRequest::post("/members")
        .json(member_body(name, created_by))
        .send(service)
        .await
        .assert_success()
        .id()
}

/// Creates a family through the API and returns its id.
pub async fn create_family(service: &Service, name: &str) -> i64 {
    TestRequest::post("/families")
        .json(json!({ "family_name": name }))
        .send(service)
        .await
        .assert_success()
        .id()
}

/// Shorthand for the common opening of a test: a fresh store, its service and a user.
pub async fn setup() -> (TestDb, Service, i64) {
    let db = TestDb::new().await.expect("Failed to create test database");
    let service = db.service();
    let user_id = db.seed_user("tester").await.expect("Failed to seed user");
    (db, service, user_id)
}
