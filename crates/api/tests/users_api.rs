//! User CRUD, filtering, batch delete, and export over HTTP.

mod common;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use common::{
    body_bytes, body_json, body_text, create_user, create_user_and_login, delete_json_auth,
    get_auth, login, patch_json_auth, post_json_auth,
};
use scylla_core::sheet::read_sheet;
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../db/migrations")]
async fn create_then_fetch_user(pool: SqlitePool) {
    let test = common::build_test_app(pool).await;
    let (_admin, token) = create_user_and_login(&test, "admin").await;

    let body = json!({ "username": "ivan", "email": "ivan@x.com", "password": "longenough" });
    let response = post_json_auth(test.app.clone(), "/api/v1/users", &token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = get_auth(test.app, &format!("/api/v1/users/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "ivan");
    assert!(json["data"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_user_requires_auth(pool: SqlitePool) {
    let test = common::build_test_app(pool).await;
    let body = json!({ "username": "ivan", "email": "ivan@x.com", "password": "longenough" });

    let response = common::post_json(test.app, "/api/v1/users", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn whitespace_username_is_rejected(pool: SqlitePool) {
    let test = common::build_test_app(pool).await;
    let (_admin, token) = create_user_and_login(&test, "admin").await;

    let body = json!({ "username": "   ", "email": "ivan@x.com", "password": "longenough" });
    let response = post_json_auth(test.app, "/api/v1/users", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"]["username"][0], "username is required");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_user_is_404(pool: SqlitePool) {
    let test = common::build_test_app(pool).await;
    let (_admin, token) = create_user_and_login(&test, "admin").await;

    let response = get_auth(test.app, "/api/v1/users/9999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "User with id 9999 not found");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_exact_username(pool: SqlitePool) {
    let test = common::build_test_app(pool).await;
    let (_admin, token) = create_user_and_login(&test, "admin").await;
    create_user(&test.pool, "judy").await;
    create_user(&test.pool, "judith").await;

    let response = get_auth(test.app, "/api/v1/users?username=judy", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let users = json["data"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "judy");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_sorts_by_requested_column(pool: SqlitePool) {
    let test = common::build_test_app(pool).await;
    let (_admin, token) = create_user_and_login(&test, "mallory").await;
    create_user(&test.pool, "zed").await;
    create_user(&test.pool, "bert").await;

    let response = get_auth(test.app, "/api/v1/users?sort=username:asc", &token).await;
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["bert", "mallory", "zed"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_rejects_unknown_sort_column(pool: SqlitePool) {
    let test = common::build_test_app(pool).await;
    let (_admin, token) = create_user_and_login(&test, "admin").await;

    let response = get_auth(test.app, "/api/v1/users?sort=password_hash:asc", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_replaces_fields_and_password(pool: SqlitePool) {
    let test = common::build_test_app(pool).await;
    let (_admin, token) = create_user_and_login(&test, "admin").await;
    let user = create_user(&test.pool, "ken").await;

    let body = json!({ "username": "kenneth", "email": "kenneth@x.com", "password": "another-secret" });
    let response =
        patch_json_auth(test.app.clone(), &format!("/api/v1/users/{}", user.id), &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "kenneth");
    assert_eq!(json["data"]["email"], "kenneth@x.com");

    let token = login(test.app, "kenneth@x.com", "another-secret").await;
    assert!(!token.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_keeping_own_email_is_allowed_but_taking_another_is_not(pool: SqlitePool) {
    let test = common::build_test_app(pool).await;
    let (admin, token) = create_user_and_login(&test, "admin").await;
    let user = create_user(&test.pool, "leo").await;
    let uri = format!("/api/v1/users/{}", user.id);

    let same = json!({ "username": "leo2", "email": "leo@test.com", "password": "longenough" });
    let response = patch_json_auth(test.app.clone(), &uri, &token, same).await;
    assert_eq!(response.status(), StatusCode::OK);

    let taken = json!({ "username": "leo2", "email": admin.email, "password": "longenough" });
    let response = patch_json_auth(test.app, &uri, &token, taken).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"]["email"][0], "email has already been taken");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn batch_delete_removes_users(pool: SqlitePool) {
    let test = common::build_test_app(pool).await;
    let (_admin, token) = create_user_and_login(&test, "admin").await;
    let a = create_user(&test.pool, "nina").await;
    let b = create_user(&test.pool, "olga").await;

    let response = delete_json_auth(
        test.app.clone(),
        "/api/v1/users/batch",
        &token,
        json!({ "id": [a.id, b.id] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["deleted"], 2);

    let response = get_auth(test.app, &format!("/api/v1/users/{}", a.id), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn batch_delete_validates_ids(pool: SqlitePool) {
    let test = common::build_test_app(pool).await;
    let (_admin, token) = create_user_and_login(&test, "admin").await;

    let response =
        delete_json_auth(test.app.clone(), "/api/v1/users/batch", &token, json!({ "id": [] })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        delete_json_auth(test.app.clone(), "/api/v1/users/batch", &token, json!({ "id": [-1] }))
            .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        delete_json_auth(test.app, "/api/v1/users/batch", &token, json!({ "id": [424242] })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn export_as_csv_returns_csv_attachment(pool: SqlitePool) {
    let test = common::build_test_app(pool).await;
    let (admin, token) = create_user_and_login(&test, "admin").await;
    create_user(&test.pool, "peggy").await;

    let response = get_auth(test.app, "/api/v1/users/export?sort=id:asc&format=csv", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE].to_str().unwrap(),
        "text/csv; charset=utf-8"
    );
    let disposition = response.headers()[CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=users_"));
    assert!(disposition.ends_with(".csv"));

    let text = body_text(response).await;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "ID,Username,Email,CreatedAt,UpdatedAt");
    assert_eq!(lines.len(), 3);

    let day = admin.created_at.format("%Y-%m-%d").to_string();
    assert_eq!(
        lines[1],
        format!("{},admin,admin@test.com,{day},{day}", admin.id)
    );
    assert!(lines[2].contains("peggy@test.com"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn export_defaults_to_xlsx_workbook(pool: SqlitePool) {
    let test = common::build_test_app(pool).await;
    let (admin, token) = create_user_and_login(&test, "admin").await;
    create_user(&test.pool, "peggy").await;

    let response = get_auth(test.app, "/api/v1/users/export?sort=id:asc", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE].to_str().unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = response.headers()[CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.ends_with(".xlsx"));

    let sheet = read_sheet(&body_bytes(response).await).unwrap();
    assert_eq!(sheet.header, vec!["ID", "Username", "Email", "CreatedAt", "UpdatedAt"]);
    assert_eq!(sheet.rows.len(), 2);
    assert_eq!(sheet.rows[0].cell(0), admin.id.to_string());
    assert_eq!(sheet.rows[0].cell(2), "admin@test.com");
    assert_eq!(sheet.rows[1].cell(1), "peggy");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn export_rejects_unknown_format(pool: SqlitePool) {
    let test = common::build_test_app(pool).await;
    let (_admin, token) = create_user_and_login(&test, "admin").await;

    let response = get_auth(test.app, "/api/v1/users/export?format=pdf", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
