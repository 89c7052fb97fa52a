//! HTTP-level tests for `/api/auth`: login, lockout, refresh, logout,
//! token handling, `me` and password changes.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, build_test_app, create_admin, create_user, get_auth, login_token, post_json,
    put_json_auth, send, send_with_locale, test_config, TEST_PASSWORD,
};
use erp_api::auth::jwt::{generate_access_token, Claims};
use erp_db::repositories::{ContactRepo, UserRepo};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use sqlx::PgPool;

fn credentials(username: &str, password: &str) -> serde_json::Value {
    json!({ "username": username, "password": password })
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_token_and_user(pool: PgPool) {
    let user = create_user(&pool, "frank", None).await;
    let app = build_test_app(pool.clone());

    let response = post_json(&app, "/api/auth/login", credentials("frank", TEST_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["message"], "Login successful.");
    assert!(json["access_token"].is_string());
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["expires_in"], 3600);
    assert!(json.get("remember_token").is_none());
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["username"], "frank");
    assert_eq!(json["user"]["status"], "active");
    assert!(json["user"].get("password_hash").is_none());

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.last_login_at.is_some());
    assert_eq!(stored.failed_login_count, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn wrong_password_and_unknown_user_look_the_same(pool: PgPool) {
    create_user(&pool, "grace", None).await;
    let app = build_test_app(pool);

    for body in [credentials("grace", "not-the-password"), credentials("nobody", TEST_PASSWORD)] {
        let response = post_json(&app, "/api/auth/login", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["code"], "AUTH_FAILED");
        assert_eq!(json["error"], "These credentials do not match our records.");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn failure_message_follows_accept_language(pool: PgPool) {
    let app = build_test_app(pool);

    let response = send_with_locale(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(credentials("nobody", TEST_PASSWORD)),
        Some("de-DE,de;q=0.9"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Diese Kombination aus Zugangsdaten wurde nicht in unserer Datenbank gefunden."
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_form_is_validated(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(&app, "/api/auth/login", json!({ "password": "123" })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["errors"]["username"][0], "The username field is required.");
    assert_eq!(
        json["errors"]["password"][0],
        "The password field must be at least 6 characters."
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn mistyped_login_body_is_a_json_validation_error(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        &app,
        "/api/auth/login",
        json!({ "username": 5, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("username"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn inactive_user_cannot_log_in(pool: PgPool) {
    let user = create_user(&pool, "henry", None).await;
    UserRepo::deactivate(&pool, user.id).await.unwrap();
    let app = build_test_app(pool);

    let response = post_json(&app, "/api/auth/login", credentials("henry", TEST_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "USER_INACTIVE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn inactive_user_with_wrong_password_gets_generic_failure(pool: PgPool) {
    let user = create_user(&pool, "hilda", None).await;
    UserRepo::deactivate(&pool, user.id).await.unwrap();
    let app = build_test_app(pool);

    let response = post_json(&app, "/api/auth/login", credentials("hilda", "wrong-password")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "AUTH_FAILED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_trims_the_username(pool: PgPool) {
    create_user(&pool, "hugo", None).await;
    let app = build_test_app(pool);

    let response = post_json(&app, "/api/auth/login", credentials("  hugo ", TEST_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["user"]["username"], "hugo");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn expired_lock_restarts_the_failure_count(pool: PgPool) {
    let user = create_user(&pool, "ivy", None).await;
    sqlx::query(
        "UPDATE users SET failed_login_count = 5, locked_until = NOW() - INTERVAL '1 minute'
         WHERE id = $1",
    )
    .bind(user.id)
    .execute(&pool)
    .await
    .unwrap();
    let app = build_test_app(pool.clone());

    let response = post_json(&app, "/api/auth/login", credentials("ivy", "wrong-password")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(stored.failed_login_count, 1);
    assert!(stored.locked_until.is_none());

    let response = post_json(&app, "/api/auth/login", credentials("ivy", TEST_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn repeated_failures_lock_the_account(pool: PgPool) {
    let user = create_user(&pool, "ivan", None).await;
    let app = build_test_app(pool.clone());

    for _ in 0..5 {
        let response = post_json(&app, "/api/auth/login", credentials("ivan", "wrong-password")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let locked = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(locked.locked_until.is_some());

    // Even the right password is refused while locked.
    let response = post_json(&app, "/api/auth/login", credentials("ivan", TEST_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = body_json(response).await;
    assert_eq!(json["code"], "AUTH_THROTTLED");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Too many login attempts. Please try again in "));
}

// ---------------------------------------------------------------------------
// Remember tokens
// ---------------------------------------------------------------------------

async fn remembered_login(app: &axum::Router, username: &str) -> String {
    let body = json!({ "username": username, "password": TEST_PASSWORD, "remember": true });
    let json = body_json(post_json(app, "/api/auth/login", body).await).await;
    json["remember_token"].as_str().unwrap().to_string()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rotates_the_remember_token(pool: PgPool) {
    create_user(&pool, "judy", None).await;
    let app = build_test_app(pool);
    let original = remembered_login(&app, "judy").await;

    let response = post_json(&app, "/api/auth/refresh", json!({ "remember_token": original })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rotated = json["remember_token"].as_str().unwrap().to_string();
    assert_ne!(rotated, original);
    assert!(json["access_token"].is_string());
    assert!(json.get("message").is_none());

    let response = post_json(&app, "/api/auth/refresh", json!({ "remember_token": original })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "TOKEN_INVALID");

    let response = post_json(&app, "/api/auth/refresh", json!({ "remember_token": rotated })).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_revokes_the_remember_token(pool: PgPool) {
    create_user(&pool, "kate", None).await;
    let app = build_test_app(pool);
    let remember = remembered_login(&app, "kate").await;
    let token = login_token(&app, "kate").await;

    let response = send(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Logout successful.");

    let response = post_json(&app, "/api/auth/refresh", json!({ "remember_token": remember })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_for_deactivated_user_is_forbidden(pool: PgPool) {
    let user = create_user(&pool, "liam", None).await;
    let app = build_test_app(pool.clone());
    let remember = remembered_login(&app, "liam").await;

    UserRepo::set_status(&pool, user.id, erp_core::lookup::UserStatus::Suspended)
        .await
        .unwrap();

    let response = post_json(&app, "/api/auth/refresh", json!({ "remember_token": remember })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "USER_INACTIVE");
}

// ---------------------------------------------------------------------------
// Access tokens
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_token_is_invalid(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get_auth(&app, "/api/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "TOKEN_INVALID");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn expired_token_is_reported_as_expired(pool: PgPool) {
    let user = create_user(&pool, "mia", None).await;
    let app = build_test_app(pool);

    let past = chrono::Utc::now().timestamp() - 7200;
    let claims = Claims {
        sub: user.id,
        exp: past,
        iat: past - 60,
        jti: "expired".to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(test_config().jwt.secret.as_bytes()),
    )
    .unwrap();

    let response = get_auth(&app, "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "TOKEN_EXPIRED");
    assert_eq!(json["error"], "Your session has expired. Please log in again.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn token_for_missing_user_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);
    let token = generate_access_token(987_654, &test_config().jwt).unwrap();

    let response = get_auth(&app, "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "USER_NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deactivation_applies_to_live_tokens(pool: PgPool) {
    let user = create_user(&pool, "noah", None).await;
    let app = build_test_app(pool.clone());
    let token = login_token(&app, "noah").await;

    UserRepo::deactivate(&pool, user.id).await.unwrap();

    let response = get_auth(&app, "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Me / password
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn me_includes_contacts_and_preference(pool: PgPool) {
    let admin = create_admin(&pool, "olivia").await;
    let app = build_test_app(pool);
    let token = login_token(&app, "olivia").await;

    let response = get_auth(&app, "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = &body_json(response).await["data"];

    assert_eq!(data["user"]["id"], admin.id);
    assert_eq!(data["is_admin"], true);
    assert_eq!(data["emails"].as_array().unwrap().len(), 1);
    assert_eq!(data["emails"][0]["email"], "olivia@example.test");
    assert_eq!(data["emails"][0]["is_primary"], true);
    assert_eq!(data["phones"], json!([]));
    assert_eq!(data["preference"]["locale"], "en");
    assert_eq!(data["preference"]["timezone"], "UTC");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn password_change_requires_current_password(pool: PgPool) {
    let user = create_user(&pool, "paul", None).await;
    let app = build_test_app(pool.clone());
    let token = login_token(&app, "paul").await;

    let response = put_json_auth(
        &app,
        "/api/auth/password",
        &token,
        json!({ "current_password": "wrong-password", "password": "brand-new-pass" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "AUTH_PASSWORD");
    assert_eq!(json["error"], "The provided password is incorrect.");

    let response = put_json_auth(
        &app,
        "/api/auth/password",
        &token,
        json!({ "current_password": TEST_PASSWORD, "password": "brand-new-pass" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(&app, "/api/auth/login", credentials("paul", "brand-new-pass")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = post_json(&app, "/api/auth/login", credentials("paul", TEST_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The primary email is untouched by a password change.
    let emails = ContactRepo::list_emails(&pool, user.id).await.unwrap();
    assert_eq!(emails.len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn short_new_password_is_rejected(pool: PgPool) {
    create_user(&pool, "quinn", None).await;
    let app = build_test_app(pool);
    let token = login_token(&app, "quinn").await;

    let response = put_json_auth(
        &app,
        "/api/auth/password",
        &token,
        json!({ "current_password": TEST_PASSWORD, "password": "123" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
