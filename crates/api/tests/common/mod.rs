#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use scylla_api::auth::jwt::JwtConfig;
use scylla_api::auth::password::hash_password;
use scylla_api::config::ServerConfig;
use scylla_api::router::build_app_router;
use scylla_api::state::AppState;
use scylla_db::models::user::{CreateUser, User};
use scylla_db::repositories::UserRepo;
use scylla_db::DbPool;

/// Password given to every user made by [`create_user`].
pub const TEST_PASSWORD: &str = "password123";

const BOUNDARY: &str = "scylla-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        otp_ttl_mins: 5,
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            expiry_mins: 60,
        },
    }
}

/// The application plus direct access to its database.
pub struct TestApp {
    pub app: Router,
    pub pool: DbPool,
}

/// Full router and middleware stack over a migrated test database.
pub async fn build_test_app(pool: DbPool) -> TestApp {
    let config = test_config();
    let state = AppState::new(pool.clone(), config.clone()).expect("state should build");
    let app = build_app_router(state, &config).expect("router should build");
    TestApp { app, pool }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router is infallible")
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PATCH, uri, None, body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PATCH, uri, Some(token), body)).await
}

pub async fn delete_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::DELETE, uri, Some(token), body)).await
}

/// Upload `contents` as the `file` part of a multipart form.
pub async fn post_file_auth(app: Router, uri: &str, token: &str, contents: &str) -> Response {
    post_multipart_auth(app, uri, token, "file", contents).await
}

pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    token: &str,
    field: &str,
    contents: &str,
) -> Response {
    post_upload_auth(app, uri, token, field, "upload.csv", contents.as_bytes()).await
}

/// Upload raw `bytes` (e.g. an `.xlsx` workbook) as the `file` part.
pub async fn post_workbook_auth(app: Router, uri: &str, token: &str, bytes: &[u8]) -> Response {
    post_upload_auth(app, uri, token, "file", "upload.xlsx", bytes).await
}

async fn post_upload_auth(
    app: Router,
    uri: &str,
    token: &str,
    field: &str,
    filename: &str,
    bytes: &[u8],
) -> Response {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .expect("request should build");
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and email `<username>@test.com`.
pub async fn create_user(pool: &DbPool, username: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in through the API and return the access token.
pub async fn login(app: Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["data"]["token"]
        .as_str()
        .expect("login should return a token")
        .to_string()
}

/// Create a user and log them in, returning the user and a Bearer token.
pub async fn create_user_and_login(test: &TestApp, username: &str) -> (User, String) {
    let user = create_user(&test.pool, username).await;
    let token = login(test.app.clone(), &user.email, TEST_PASSWORD).await;
    (user, token)
}
