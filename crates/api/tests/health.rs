//! Health check and middleware behaviour.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, send};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn health_check_reports_database(pool: PgPool) {
    let app = build_test_app(pool);
    let response = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = send(&app, Method::GET, "/api/does-not-exist", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn responses_carry_a_request_id(pool: PgPool) {
    let app = build_test_app(pool);
    let response = send(&app, Method::GET, "/health", None, None).await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header")
        .to_str()
        .unwrap();
    assert_eq!(request_id.len(), 36);
}
