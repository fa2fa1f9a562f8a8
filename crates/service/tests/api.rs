//! End-to-end tests driving the assembled router over in-memory state:
//! registration and login, the document lifecycle, star semantics, the
//! admin surface, and the auth failure matrix.

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use docvault_service::database::models::User;
use docvault_service::http_server;
use docvault_service::{ServiceConfig, ServiceState};

async fn test_state() -> ServiceState {
    let config = ServiceConfig {
        api_port: 0,
        sqlite_path: None,
        token_secret: "test-signing-secret".to_string(),
        token_ttl: Duration::from_secs(60 * 60),
        log_level: tracing::Level::INFO,
        log_dir: None,
    };
    ServiceState::from_config(&config).await.unwrap()
}

async fn test_app() -> (Router, ServiceState) {
    let state = test_state().await;
    let listen_addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let config = http_server::Config::new(listen_addr, tracing::Level::INFO);
    (http_server::router(&config, state.clone()), state)
}

/// Fire one request at the router and decode the JSON response.
async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

/// Register a user through the API, returning (token, user id).
async fn register(app: &Router, email: &str, password: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    (
        body["token"].as_str().unwrap().to_string(),
        body["id"].as_str().unwrap().to_string(),
    )
}

/// Register an account and flip its admin flag directly in the store, the way
/// operators provision admins.
async fn register_admin(app: &Router, state: &ServiceState, email: &str) -> String {
    let (token, _) = register(app, email, "adminpw123").await;
    assert!(User::set_admin(email, true, state.database()).await.unwrap());
    token
}

fn upload_body(title: &str, size: i64) -> Value {
    json!({
        "title": title,
        "fileType": "text/plain",
        "fileData": "data:text/plain;base64,aGVsbG8=",
        "size": size,
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _state) = test_app().await;

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (app, _state) = test_app().await;

    let (status, body) = send(&app, "GET", "/no/such/route", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "not found");
}

#[tokio::test]
async fn test_register_then_login_same_identity() {
    let (app, _state) = test_app().await;

    let (_, registered_id) = register(&app, "a@x.com", "pw123456").await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "pw123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], registered_id.as_str());
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["username"], "a");
    assert_eq!(body["isAdmin"], false);
    assert!(body["token"].as_str().is_some());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_email_is_case_normalized() {
    let (app, _state) = test_app().await;

    let (_, id) = register(&app, "Mixed@Case.Com", "pw123456").await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "mixed@case.com", "password": "pw123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
}

#[tokio::test]
async fn test_duplicate_email_never_creates_second_user() {
    let (app, state) = test_app().await;

    let (_, first_id) = register(&app, "a@x.com", "pw123456").await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": "a@x.com", "password": "different1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("already exists"));

    assert_eq!(User::count(state.database()).await.unwrap(), 1);

    // The original credentials still resolve to the original account.
    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "pw123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], first_id.as_str());
}

#[tokio::test]
async fn test_register_validation() {
    let (app, _state) = test_app().await;

    for body in [
        json!({ "email": "not-an-email", "password": "pw123456" }),
        json!({ "email": "@x.com", "password": "pw123456" }),
        json!({ "email": "a@x.com", "password": "short" }),
        json!({ "email": "", "password": "pw123456" }),
        // Absent fields get the same 400 as empty ones.
        json!({ "password": "pw123456" }),
        json!({ "email": "a@x.com" }),
        json!({}),
    ] {
        let (status, body) = send(&app, "POST", "/auth/register", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_login_missing_field_is_bad_request() {
    let (app, _state) = test_app().await;
    register(&app, "a@x.com", "pw123456").await;

    for body in [
        json!({ "email": "a@x.com" }),
        json!({ "password": "pw123456" }),
    ] {
        let (status, body) = send(&app, "POST", "/auth/login", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (app, _state) = test_app().await;
    register(&app, "a@x.com", "pw123456").await;

    for body in [
        json!({ "email": "a@x.com", "password": "wrong-password" }),
        json!({ "email": "nobody@x.com", "password": "pw123456" }),
    ] {
        let (status, _) = send(&app, "POST", "/auth/login", None, Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_protected_routes_require_a_credential() {
    let (app, _state) = test_app().await;
    let doc_id = uuid::Uuid::new_v4();

    let routes: Vec<(&str, String)> = vec![
        ("GET", "/documents".to_string()),
        ("GET", "/documents/my".to_string()),
        ("POST", "/documents/upload".to_string()),
        ("PUT", format!("/documents/{}/star", doc_id)),
        ("GET", "/admin/stats".to_string()),
        ("GET", "/admin/users".to_string()),
        ("DELETE", format!("/admin/documents/{}", doc_id)),
        ("DELETE", "/admin/documents".to_string()),
    ];

    for (method, path) in &routes {
        let (status, _) = send(&app, method, path, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, path);

        let (status, _) = send(&app, method, path, Some("garbage-token"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, path);
    }
}

#[tokio::test]
async fn test_admin_routes_forbidden_for_regular_users() {
    let (app, _state) = test_app().await;
    let (token, _) = register(&app, "user@x.com", "pw123456").await;
    let doc_id = uuid::Uuid::new_v4();

    let routes: Vec<(&str, String)> = vec![
        ("GET", "/admin/stats".to_string()),
        ("GET", "/admin/users".to_string()),
        ("DELETE", format!("/admin/documents/{}", doc_id)),
        ("DELETE", "/admin/documents".to_string()),
    ];

    for (method, path) in &routes {
        let (status, body) = send(&app, method, path, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, path);
        assert_eq!(body["message"], "Admin access required");
    }
}

#[tokio::test]
async fn test_upload_then_list_mine() {
    let (app, _state) = test_app().await;
    let (token, id) = register(&app, "a@x.com", "pw123456").await;

    let (status, created) = send(
        &app,
        "POST",
        "/documents/upload",
        Some(&token),
        Some(upload_body("f.txt", 5)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "f.txt");
    assert_eq!(created["fileType"], "text/plain");
    assert_eq!(created["size"], 5);
    assert_eq!(created["uploadedBy"]["id"], id.as_str());
    assert_eq!(created["uploadedBy"]["username"], "a");
    assert_eq!(created["starCount"], 0);
    assert_eq!(created["starred"], false);

    let (status, mine) = send(&app, "GET", "/documents/my", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["id"], created["id"]);
    assert_eq!(mine[0]["starCount"], 0);
    assert_eq!(mine[0]["starred"], false);
}

#[tokio::test]
async fn test_upload_rejects_missing_fields() {
    let (app, _state) = test_app().await;
    let (token, _) = register(&app, "a@x.com", "pw123456").await;

    for body in [
        json!({ "title": "", "fileType": "text/plain", "fileData": "x", "size": 5 }),
        json!({ "title": "f", "fileType": "", "fileData": "x", "size": 5 }),
        json!({ "title": "f", "fileType": "text/plain", "fileData": "", "size": 5 }),
        json!({ "title": "f", "fileType": "text/plain", "fileData": "x", "size": 0 }),
        // Absent fields get the same 400 as empty ones.
        json!({ "fileType": "text/plain", "fileData": "x", "size": 5 }),
        json!({ "title": "f", "fileType": "text/plain", "fileData": "x" }),
    ] {
        let (status, body) = send(&app, "POST", "/documents/upload", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_list_all_spans_users_newest_first() {
    let (app, _state) = test_app().await;
    let (token_a, _) = register(&app, "a@x.com", "pw123456").await;
    let (token_b, _) = register(&app, "b@x.com", "pw123456").await;

    send(
        &app,
        "POST",
        "/documents/upload",
        Some(&token_a),
        Some(upload_body("first", 1)),
    )
    .await;
    send(
        &app,
        "POST",
        "/documents/upload",
        Some(&token_b),
        Some(upload_body("second", 2)),
    )
    .await;

    // Both users see both documents, newest upload first.
    for token in [&token_a, &token_b] {
        let (status, all) = send(&app, "GET", "/documents", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        let all = all.as_array().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0]["title"], "second");
        assert_eq!(all[1]["title"], "first");
    }

    let (_, mine) = send(&app, "GET", "/documents/my", Some(&token_a), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_star_toggle_involution() {
    let (app, _state) = test_app().await;
    let (owner_token, _) = register(&app, "owner@x.com", "pw123456").await;
    let (viewer_token, viewer_id) = register(&app, "viewer@x.com", "pw123456").await;

    let (_, created) = send(
        &app,
        "POST",
        "/documents/upload",
        Some(&owner_token),
        Some(upload_body("doc", 5)),
    )
    .await;
    let star_path = format!("/documents/{}/star", created["id"].as_str().unwrap());

    // Any authenticated user may star, not just the owner.
    let (status, starred) = send(&app, "PUT", &star_path, Some(&viewer_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(starred["starCount"], 1);
    assert_eq!(starred["starred"], true);
    assert_eq!(starred["stars"][0]["id"], viewer_id.as_str());

    // starred is relative to the caller: the owner sees the star but is not
    // themselves starring.
    let (_, all) = send(&app, "GET", "/documents", Some(&owner_token), None).await;
    assert_eq!(all[0]["starCount"], 1);
    assert_eq!(all[0]["starred"], false);

    // Second toggle returns the set to its original state.
    let (status, unstarred) = send(&app, "PUT", &star_path, Some(&viewer_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unstarred["starCount"], 0);
    assert_eq!(unstarred["starred"], false);
}

#[tokio::test]
async fn test_star_unknown_document_is_404() {
    let (app, _state) = test_app().await;
    let (token, _) = register(&app, "a@x.com", "pw123456").await;

    let path = format!("/documents/{}/star", uuid::Uuid::new_v4());
    let (status, body) = send(&app, "PUT", &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Document not found");
}

#[tokio::test]
async fn test_admin_stats_track_uploads_and_deletes() {
    let (app, state) = test_app().await;
    let admin_token = register_admin(&app, &state, "admin@x.com").await;
    let (user_token, _) = register(&app, "user@x.com", "pw123456").await;

    let (_, first) = send(
        &app,
        "POST",
        "/documents/upload",
        Some(&user_token),
        Some(upload_body("one", 5)),
    )
    .await;
    send(
        &app,
        "POST",
        "/documents/upload",
        Some(&user_token),
        Some(upload_body("two", 7)),
    )
    .await;

    let (status, stats) = send(&app, "GET", "/admin/stats", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalUsers"], 2);
    assert_eq!(stats["totalDocuments"], 2);
    assert_eq!(stats["totalStorage"], 12);

    // Admin deletes another user's document: only the admin flag matters.
    let delete_path = format!("/admin/documents/{}", first["id"].as_str().unwrap());
    let (status, deleted) = send(&app, "DELETE", &delete_path, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["documentId"], first["id"]);

    let (_, stats) = send(&app, "GET", "/admin/stats", Some(&admin_token), None).await;
    assert_eq!(stats["totalDocuments"], 1);
    assert_eq!(stats["totalStorage"], 7);

    // Deleting the same document again is a 404.
    let (status, _) = send(&app, "DELETE", &delete_path, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_all_documents_is_idempotent() {
    let (app, state) = test_app().await;
    let admin_token = register_admin(&app, &state, "admin@x.com").await;
    let (user_token, _) = register(&app, "user@x.com", "pw123456").await;

    for (title, size) in [("one", 5), ("two", 7)] {
        send(
            &app,
            "POST",
            "/documents/upload",
            Some(&user_token),
            Some(upload_body(title, size)),
        )
        .await;
    }

    let (status, body) = send(&app, "DELETE", "/admin/documents", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 2);

    let (status, body) = send(&app, "DELETE", "/admin/documents", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 0);

    let (_, stats) = send(&app, "GET", "/admin/stats", Some(&admin_token), None).await;
    assert_eq!(stats["totalDocuments"], 0);
    assert_eq!(stats["totalStorage"], 0);
}

#[tokio::test]
async fn test_admin_users_report_usage_without_passwords() {
    let (app, state) = test_app().await;
    let admin_token = register_admin(&app, &state, "admin@x.com").await;
    let (user_token, user_id) = register(&app, "user@x.com", "pw123456").await;

    send(
        &app,
        "POST",
        "/documents/upload",
        Some(&user_token),
        Some(upload_body("one", 5)),
    )
    .await;
    send(
        &app,
        "POST",
        "/documents/upload",
        Some(&user_token),
        Some(upload_body("two", 7)),
    )
    .await;

    let (status, users) = send(&app, "GET", "/admin/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);

    // Newest registration first: the regular user registered after the admin.
    assert_eq!(users[0]["id"], user_id.as_str());
    assert_eq!(users[0]["documentCount"], 2);
    assert_eq!(users[0]["storage"], 12);
    assert_eq!(users[1]["email"], "admin@x.com");
    assert_eq!(users[1]["documentCount"], 0);

    for user in users {
        assert!(user.get("password").is_none());
        assert!(user.get("passwordHash").is_none());
    }
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let (app, _state) = test_app().await;

    // register → login → upload → list mine → star → unstar
    register(&app, "a@x.com", "pw123456").await;

    let (status, login) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "pw123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = login["token"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/documents/upload",
        Some(&token),
        Some(upload_body("f.txt", 5)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, mine) = send(&app, "GET", "/documents/my", Some(&token), None).await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["title"], "f.txt");
    assert_eq!(mine[0]["size"], 5);

    let star_path = format!("/documents/{}/star", mine[0]["id"].as_str().unwrap());
    let (_, starred) = send(&app, "PUT", &star_path, Some(&token), None).await;
    assert_eq!(starred["starCount"], 1);

    let (_, unstarred) = send(&app, "PUT", &star_path, Some(&token), None).await;
    assert_eq!(unstarred["starCount"], 0);
}
