//! Shared helpers for HTTP-level integration tests.
//!
//! Requests go through [`build_app_router`] so the tests exercise the same
//! middleware stack as the server binary.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use erp_api::auth::jwt::JwtConfig;
use erp_api::auth::password::hash_password;
use erp_api::config::ServerConfig;
use erp_api::router::build_app_router;
use erp_api::state::AppState;
use erp_core::identity::ADMIN_GROUP;
use erp_core::policy::PolicyRegistry;
use erp_core::types::DbId;
use erp_db::models::group::CreateGroup;
use erp_db::models::user::{CreateUser, User};
use erp_db::repositories::{GroupRepo, UserRepo};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// Password of every user created through [`create_user`].
pub const TEST_PASSWORD: &str = "secret-password";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        database_url: String::new(),
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
            remember_token_expiry_days: 30,
        },
    }
}

pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        policies: Arc::new(PolicyRegistry::standard()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Find or create a group by name.
pub async fn ensure_group(pool: &PgPool, name: &str) -> DbId {
    if let Some(group) = GroupRepo::find_by_name(pool, name).await.unwrap() {
        return group.id;
    }
    GroupRepo::create(pool, &CreateGroup { name: name.to_string() })
        .await
        .unwrap()
        .id
}

/// Create an active user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, group_id: Option<DbId>) -> User {
    let input = CreateUser {
        name: format!("{username} Test"),
        username: username.to_string(),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        avatar: None,
        group_id,
        email: format!("{username}@example.test"),
        email_verified: true,
    };
    UserRepo::create(pool, &input).await.unwrap()
}

/// Create a member of the `administrators` group.
pub async fn create_admin(pool: &PgPool, username: &str) -> User {
    let group_id = ensure_group(pool, ADMIN_GROUP).await;
    create_user(pool, username, Some(group_id)).await
}

/// Log in through the API and return the access token.
pub async fn login_token(app: &Router, username: &str) -> String {
    let body = serde_json::json!({ "username": username, "password": TEST_PASSWORD });
    let response = send(app, Method::POST, "/api/auth/login", None, Some(body)).await;
    assert_eq!(response.status(), StatusCode::OK, "login of {username} failed");
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Send a request, optionally authenticated and with a JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    send_with_locale(app, method, uri, token, body, None).await
}

pub async fn send_with_locale(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
    accept_language: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(lang) = accept_language {
        builder = builder.header(ACCEPT_LANGUAGE, lang);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// Send `raw` verbatim as an `application/json` body.
pub async fn send_raw_json(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    raw: &str,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(raw.to_string())).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

/// Collect and parse a JSON response body.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
