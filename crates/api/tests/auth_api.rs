//! Login and admin-route protection.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, spawn_app, ADMIN_EMAIL, ADMIN_PASSWORD};
use serde_json::json;

#[tokio::test]
async fn login_issues_a_usable_token() {
    let app = spawn_app();
    let body = json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD });
    let response = post_json(app.router.clone(), "/api/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let token = json["data"]["access_token"].as_str().expect("access_token");
    assert_eq!(json["data"]["expires_in"], 3600);

    let response = get_auth(app.router, "/api/admin/drafts/menu", token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_email_is_case_insensitive() {
    let app = spawn_app();
    let body = json!({ "email": "Mona@Example.com", "password": ADMIN_PASSWORD });
    let response = post_json(app.router, "/api/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_is_unauthorized_with_message() {
    let app = spawn_app();
    let body = json!({ "email": ADMIN_EMAIL, "password": "not-the-password" });
    let response = post_json(app.router, "/api/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["message"], "Invalid email or password");
}

#[tokio::test]
async fn unknown_email_gets_the_same_answer() {
    let app = spawn_app();
    let body = json!({ "email": "someone@example.com", "password": ADMIN_PASSWORD });
    let response = post_json(app.router, "/api/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid email or password");
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    let app = spawn_app();
    let response = get(app.router.clone(), "/api/admin/drafts/menu").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.router, "/api/admin/drafts/menu", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid or expired token");
}

#[tokio::test]
async fn non_admin_role_is_forbidden() {
    let app = spawn_app();
    let config = common::test_config();
    let token =
        kitchen_api::auth::jwt::generate_access_token(ADMIN_EMAIL, "visitor", &config.jwt).unwrap();

    let response = get_auth(app.router, "/api/admin/drafts/menu", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn public_routes_need_no_token() {
    let app = spawn_app();
    let response = get(app.router, "/api/menu").await;
    assert_eq!(response.status(), StatusCode::OK);
}
