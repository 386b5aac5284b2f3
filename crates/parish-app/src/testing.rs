//! Fixtures shared by the handler tests: the full API router over a private
//! in-memory store.

use std::sync::Arc;

use parish_db::db::DbProvider;
use parish_db::db::local::LocalDb;
use parish_db::db::query::user;
use parish_db::db::schema;
use parish_db::model::user::NewUser;
use parish_service::Services;
use salvo::http::StatusCode;
use salvo::prelude::*;
use salvo::test::{ResponseExt, TestClient};
use serde_json::Value;

use crate::app::api::{API_V1_PREFIX, routes};
use crate::services_handler::ServicesHandler;

pub struct TestApp {
    pub service: Service,
    pub db: Arc<dyn DbProvider>,
    /// Id of a login account usable as `created_by` / `user_id`.
    pub user_id: i64,
}

pub async fn app() -> TestApp {
    let local = LocalDb::in_memory().await.unwrap();
    let mut conn = local.get_connection().await.unwrap();
    schema::apply(&mut conn).await.unwrap();
    user::ensure_user(
        &mut conn,
        &NewUser {
            email: "admin@parish.local".to_string(),
            username: "admin".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            full_name: None,
            role: "admin".to_string(),
            is_active: true,
        },
    )
    .await
    .unwrap();
    let user_id = user::find_user_by_username(&mut conn, "admin")
        .await
        .unwrap()
        .unwrap()
        .id;
    drop(conn);

    let db: Arc<dyn DbProvider> = Arc::new(local);
    let router = Router::new()
        .hoop(ServicesHandler {
            services: Arc::new(Services::new(&db)),
        })
        .push(routes());

    TestApp {
        service: Service::new(router),
        db,
        user_id,
    }
}

pub fn url(path: &str) -> String {
    format!("http://127.0.0.1:5800{API_V1_PREFIX}{path}")
}

/// Sends the request and returns the status with the decoded JSON body.
pub async fn send(request: salvo::test::RequestBuilder, app: &TestApp) -> (StatusCode, Value) {
    let mut resp = request.send(&app.service).await;
    let status = resp.status_code.unwrap_or(StatusCode::OK);
    let body = resp.take_json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

pub async fn get(app: &TestApp, path: &str) -> (StatusCode, Value) {
    send(TestClient::get(url(path)), app).await
}

pub async fn post(app: &TestApp, path: &str, body: &Value) -> (StatusCode, Value) {
    send(TestClient::post(url(path)).json(body), app).await
}

pub async fn put(app: &TestApp, path: &str, body: &Value) -> (StatusCode, Value) {
    send(TestClient::put(url(path)).json(body), app).await
}

pub async fn delete(app: &TestApp, path: &str) -> (StatusCode, Value) {
    send(TestClient::delete(url(path)), app).await
}

/// Creates a member through the API and returns its id.
pub async fn member(app: &TestApp, name: &str) -> i64 {
    let (status, body) = post(
        app,
        "/members",
        &serde_json::json!({
            "name": name,
            "birth_date": "1980-05-12",
            "gender": "남",
            "registration_date": "2020-01-05",
            "created_by": app.user_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_i64().unwrap()
}
