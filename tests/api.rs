//! Router-level tests: the access middleware, extractor, and ownership check wired together.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use serde_json::{Value, json};
use tower::ServiceExt;

use simple_sns::{
    app::build_router,
    config::Config,
    repos::{InMemoryPostRepo, InMemoryUserRepo},
    services::auth::JwtCodec,
    state::AppState,
};

const SECRET: &str = "integration-secret";
const TTL: u64 = 3600;

fn config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET_KEY" => Some(SECRET.to_string()),
        "ACCESS_TOKEN_TTL_SECONDS" => Some(TTL.to_string()),
        _ => None,
    })
    .unwrap()
}

fn app() -> Router {
    let state = AppState::new(
        JwtCodec::new(SECRET, TTL),
        Arc::new(InMemoryUserRepo::new()),
        Arc::new(InMemoryPostRepo::new()),
    );
    build_router(state, &config())
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn join_and_login(app: &Router, user_name: &str) -> String {
    let creds = json!({"user_name": user_name, "password": "password"});

    let (status, _) = send(app, "POST", "/api/v1/users/join", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, "POST", "/api/v1/users/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn create_post(app: &Router, token: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/posts",
        Some(token),
        Some(json!({"title": "title", "body": "body"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn anonymous_request_to_protected_route_is_unauthorized() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/v1/users/me", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn valid_bearer_token_attaches_the_user() {
    let app = app();
    let token = join_and_login(&app, "alice").await;

    let (status, body) = send(&app, "GET", "/api/v1/users/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_name"], "alice");
    assert_eq!(body["role"], "USER");
}

#[tokio::test]
async fn expired_or_forged_tokens_leave_the_request_anonymous() {
    let app = app();
    join_and_login(&app, "alice").await;

    let expired = JwtCodec::new(SECRET, TTL)
        .encode_at("alice", Utc::now().timestamp() - TTL as i64 - 1)
        .unwrap();
    let forged = JwtCodec::new("another-secret", TTL).encode("alice").unwrap();

    for token in [expired.as_str(), forged.as_str(), "garbage"] {
        let (status, _) = send(&app, "GET", "/api/v1/users/me", Some(token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "token {token:?}");
    }

    // Public routes still answer even with a bad token attached.
    let (status, _) = send(&app, "GET", "/api/v1/health", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn token_for_a_user_that_does_not_exist_is_anonymous() {
    let app = app();
    let token = JwtCodec::new(SECRET, TTL).encode("ghost").unwrap();

    let (status, _) = send(&app, "GET", "/api/v1/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn anonymous_post_creation_is_rejected() {
    let app = app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/posts",
        None,
        Some(json!({"title": "t", "body": "b"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn only_the_owner_can_modify_or_delete() {
    let app = app();
    let alice = join_and_login(&app, "alice").await;
    let bob = join_and_login(&app, "bob").await;
    let post_id = create_post(&app, &alice).await;
    let uri = format!("/api/v1/posts/{post_id}");
    let edit = json!({"title": "edited", "body": "edited"});

    let (status, body) = send(&app, "PUT", &uri, Some(&bob), Some(edit.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "INVALID_PERMISSION");

    let (status, _) = send(&app, "DELETE", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "PUT", &uri, Some(&alice), Some(edit)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "edited");
    assert_eq!(body["user"]["user_name"], "alice");

    let (status, _) = send(&app, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "POST_NOT_FOUND");
}

#[tokio::test]
async fn modifying_a_missing_post_is_not_found() {
    let app = app();
    let token = join_and_login(&app, "alice").await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/posts/999",
        Some(&token),
        Some(json!({"title": "t", "body": "b"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn feeds_list_newest_first_and_my_feed_is_scoped() {
    let app = app();
    let alice = join_and_login(&app, "alice").await;
    let bob = join_and_login(&app, "bob").await;
    let first = create_post(&app, &alice).await;
    let second = create_post(&app, &bob).await;

    let (status, body) = send(&app, "GET", "/api/v1/posts?size=10", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
    assert_eq!(body["size"], 10);

    let (status, body) = send(&app, "GET", "/api/v1/posts/my", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], first);
}

#[tokio::test]
async fn join_rejects_duplicates_and_login_checks_password() {
    let app = app();
    join_and_login(&app, "alice").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users/join",
        None,
        Some(json!({"user_name": "alice", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "DUPLICATED_USER_NAME");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({"user_name": "alice", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users/join",
        None,
        Some(json!({"user_name": " ", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_USER");
}
