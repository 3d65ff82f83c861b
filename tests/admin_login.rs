mod common;

use chrono::{Duration, Utc};
use common::{error_code, ALICE_EMAIL, ALICE_ID, CAROL_EMAIL, PASSWORD};
use reqwest::StatusCode;

fn set_cookie(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("set-cookie")
        .expect("Set-Cookie header missing")
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn login_returns_token_profile_and_cookie() {
    let app = common::spawn_app().await;

    let response = app.login(ALICE_EMAIL, PASSWORD).await;
    assert_eq!(StatusCode::OK, response.status());

    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("adminToken="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Max-Age=2592000"));
    // development settings
    assert!(!cookie.contains("Secure"));

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["admin"]["id"], ALICE_ID);
    assert_eq!(body["admin"]["name"], "Alice");

    let claims = app.codec.decode(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub, ALICE_ID);
    assert!(claims.is_admin);
    assert_eq!(claims.exp - claims.iat, Duration::days(30).num_seconds());

    let sessions = app.registry.list_active();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].identity, ALICE_ID);
}

#[tokio::test]
async fn login_email_is_case_insensitive() {
    let app = common::spawn_app().await;

    let response = app.login("  Alice@Shop.TEST ", PASSWORD).await;
    assert_eq!(StatusCode::OK, response.status());
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = common::spawn_app().await;

    for (email, password) in [
        (ALICE_EMAIL, "wrong password"),
        ("nobody@shop.test", PASSWORD),
    ] {
        let response = app.login(email, password).await;
        assert_eq!(StatusCode::UNAUTHORIZED, response.status());
        assert!(response.headers().get("set-cookie").is_none());

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid credentials");
        assert!(body.get("code").is_none());
    }
    assert!(app.registry.list_active().is_empty());
}

#[tokio::test]
async fn login_refuses_account_without_admin_rights() {
    let app = common::spawn_app().await;

    let response = app.login(CAROL_EMAIL, PASSWORD).await;
    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
    assert!(app.registry.list_active().is_empty());
}

#[tokio::test]
async fn login_rejects_malformed_body() {
    let app = common::spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/admin/login", app.address))
        .header("Content-Type", "application/json")
        .body(r#"{"email": "alice@shop.test""#)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(StatusCode::BAD_REQUEST, response.status());

    let response = app.login(ALICE_EMAIL, "").await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status());
}

#[tokio::test]
async fn validate_accepts_bearer_and_cookie() {
    let app = common::spawn_app().await;
    let token = app.login_token(ALICE_EMAIL).await;

    let response = app.get_with_bearer("/admin/validate-token", &token).await;
    assert_eq!(StatusCode::OK, response.status());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["admin"]["email"], ALICE_EMAIL);

    let response = reqwest::Client::new()
        .get(format!("{}/admin/validate-token", app.address))
        .header("Cookie", format!("adminToken={token}"))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(StatusCode::OK, response.status());
}

#[tokio::test]
async fn validate_without_credential_is_session_expired() {
    let app = common::spawn_app().await;

    let response = reqwest::Client::new()
        .get(format!("{}/admin/validate-token", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
    assert_eq!(error_code(response).await.as_deref(), Some("SESSION_EXPIRED"));
}

#[tokio::test]
async fn validate_rejects_garbage_and_foreign_tokens() {
    let app = common::spawn_app().await;

    let response = app.get_with_bearer("/admin/validate-token", "not-a-token").await;
    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
    assert_eq!(error_code(response).await.as_deref(), Some("INVALID_TOKEN"));

    let foreign = gatekeeper::auth::TokenCodec::new(b"someone-else", Duration::days(30))
        .issue(ALICE_ID, ALICE_EMAIL, true, 0)
        .unwrap();
    let response = app.get_with_bearer("/admin/validate-token", &foreign).await;
    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
    assert_eq!(error_code(response).await.as_deref(), Some("INVALID_TOKEN"));
}

#[tokio::test]
async fn validate_rejects_expired_token() {
    let app = common::spawn_app().await;
    let expired = app
        .codec
        .issue_at(ALICE_ID, ALICE_EMAIL, true, 0, Utc::now() - Duration::days(31))
        .unwrap();

    let response = app.get_with_bearer("/admin/validate-token", &expired).await;
    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
    assert_eq!(error_code(response).await.as_deref(), Some("TOKEN_EXPIRED"));
}

#[tokio::test]
async fn validate_rejects_unprivileged_token() {
    let app = common::spawn_app().await;
    let token = app.codec.issue("c3", CAROL_EMAIL, false, 0).unwrap();

    let response = app.get_with_bearer("/admin/validate-token", &token).await;
    assert_eq!(StatusCode::FORBIDDEN, response.status());
    assert_eq!(error_code(response).await.as_deref(), Some("FORBIDDEN"));
}

#[tokio::test]
async fn logout_clears_cookie_and_session() {
    let app = common::spawn_app().await;
    let token = app.login_token(ALICE_EMAIL).await;
    assert!(app.registry.get(ALICE_ID).is_some());

    let response = app.post_with_bearer("/admin/logout", &token).await;
    assert_eq!(StatusCode::OK, response.status());

    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("adminToken=;"));
    assert!(cookie.contains("Max-Age=0"));
    assert!(app.registry.get(ALICE_ID).is_none());
}

#[tokio::test]
async fn logout_requires_credential() {
    let app = common::spawn_app().await;

    let response = reqwest::Client::new()
        .post(format!("{}/admin/logout", app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
}

#[tokio::test]
async fn login_reports_unissuable_credential_as_server_error() {
    let mut settings = common::test_settings();
    settings.auth.token_ttl_days = 1_000_000_000;
    assert!(settings.validate().is_err());
    let app = common::spawn_app_with_settings(settings).await;

    let response = app.login(ALICE_EMAIL, PASSWORD).await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());
    assert!(response.headers().get("set-cookie").is_none());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}
