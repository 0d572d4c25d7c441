//! Full-router tests: every request goes through routing, the session
//! middleware, and the JSON envelope exactly as a browser would see it.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use server::auth::AuthManager;
use server::config::{AppState, ServerConfig};
use server::db;
use server::store::TodoStore;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn app(dir: &TempDir) -> Router {
    let config = ServerConfig {
        data_dir: dir.path().to_path_buf(),
        ..ServerConfig::default()
    };
    let pool = db::init_db(&config.db_path()).await.unwrap();
    let auth = Arc::new(AuthManager::new(pool.clone(), config.session_ttl_days));
    let store = Arc::new(TodoStore::new(pool));

    server::router(AppState {
        config,
        auth,
        store,
    })
}

fn request(
    method: &str,
    path: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// "name=value" pair from the Set-Cookie header, ready for a Cookie header.
fn session_cookie(resp: &Response) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .expect("response should set the session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn register_and_login(app: &Router, username: &str) -> String {
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/register",
            None,
            Some(json!({ "username": username, "password": "pw123456", "confirm": "pw123456" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/login",
            None,
            Some(json!({ "username": username, "password": "pw123456" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    session_cookie(&resp)
}

#[tokio::test]
async fn full_session_scenario() {
    let dir = tempdir().unwrap();
    let app = app(&dir).await;

    let cookie = register_and_login(&app, "alice").await;

    // Session check reports the logged-in user
    let resp = app
        .clone()
        .oneshot(request("GET", "/get-session", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["session"], json!(true));
    assert_eq!(body["user"]["username"], json!("alice"));

    // Add a list, read it back
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/add-list",
            Some(&cookie),
            Some(json!({ "listTitle": "Groceries" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(request("GET", "/get-list", Some(&cookie), None))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["list"].as_array().unwrap().len(), 1);
    assert_eq!(body["list"][0]["title"], json!("Groceries"));
    assert_eq!(body["list"][0]["status"], json!("pending"));
    let list_id = body["list"][0]["id"].as_str().unwrap().to_string();

    // Add an item, read it back
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/add-items",
            Some(&cookie),
            Some(json!({ "list_id": list_id, "description": "Buy milk" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/get-items/{}", list_id),
            Some(&cookie),
            None,
        ))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["description"], json!("Buy milk"));
    assert_eq!(body["items"][0]["status"], json!("pending"));

    // Delete the list; its items page is gone with it
    let resp = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/delete-list/{}", list_id),
            Some(&cookie),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/get-items/{}", list_id),
            Some(&cookie),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let dir = tempdir().unwrap();
    let app = app(&dir).await;

    let resp = app
        .clone()
        .oneshot(request("GET", "/get-list", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));

    let resp = app
        .clone()
        .oneshot(request(
            "GET",
            "/get-list",
            Some("todo_session=not-a-real-token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_failures_are_uniform() {
    let dir = tempdir().unwrap();
    let app = app(&dir).await;

    register_and_login(&app, "alice").await;

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/login",
            None,
            Some(json!({ "username": "alice", "password": "not-her-password" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(resp).await;

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/login",
            None,
            Some(json!({ "username": "nobody", "password": "pw123456" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let unknown_user = body_json(resp).await;

    assert_eq!(wrong_password["message"], unknown_user["message"]);
}

#[tokio::test]
async fn logout_clears_the_session() {
    let dir = tempdir().unwrap();
    let app = app(&dir).await;

    let cookie = register_and_login(&app, "alice").await;

    let resp = app
        .clone()
        .oneshot(request("POST", "/logout", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = resp
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cleared.contains("Max-Age=0"));

    // The old cookie no longer opens anything
    let resp = app
        .clone()
        .oneshot(request("GET", "/get-session", Some(&cookie), None))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["session"], json!(false));

    let resp = app
        .clone()
        .oneshot(request("GET", "/get-list", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Logging out twice is fine
    let resp = app
        .clone()
        .oneshot(request("POST", "/logout", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let dir = tempdir().unwrap();
    let app = app(&dir).await;

    register_and_login(&app, "alice").await;

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/register",
            None,
            Some(json!({ "username": "alice", "password": "pw123456", "confirm": "pw123456" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn validation_failures_are_bad_requests() {
    let dir = tempdir().unwrap();
    let app = app(&dir).await;

    // Password/confirm mismatch
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/register",
            None,
            Some(json!({ "username": "alice", "password": "pw123456", "confirm": "pw654321" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Empty list title
    let cookie = register_and_login(&app, "bob").await;
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/add-list",
            Some(&cookie),
            Some(json!({ "listTitle": "" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ownership_is_scoped_per_account() {
    let dir = tempdir().unwrap();
    let app = app(&dir).await;

    let alice = register_and_login(&app, "alice").await;
    let bob = register_and_login(&app, "bob").await;

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/add-list",
            Some(&alice),
            Some(json!({ "listTitle": "Groceries" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(request("GET", "/get-list", Some(&alice), None))
        .await
        .unwrap();
    let list_id = body_json(resp).await["list"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Bob sees nothing and cannot touch Alice's list
    let resp = app
        .clone()
        .oneshot(request("GET", "/get-list", Some(&bob), None))
        .await
        .unwrap();
    assert!(body_json(resp).await["list"].as_array().unwrap().is_empty());

    let resp = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/edit-list/{}", list_id),
            Some(&bob),
            Some(json!({ "listTitle": "Mine now" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/delete-list/{}", list_id),
            Some(&bob),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_endpoints_round_trip() {
    let dir = tempdir().unwrap();
    let app = app(&dir).await;

    let cookie = register_and_login(&app, "alice").await;

    app.clone()
        .oneshot(request(
            "POST",
            "/add-list",
            Some(&cookie),
            Some(json!({ "listTitle": "Groceries" })),
        ))
        .await
        .unwrap();
    let resp = app
        .clone()
        .oneshot(request("GET", "/get-list", Some(&cookie), None))
        .await
        .unwrap();
    let list_id = body_json(resp).await["list"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let resp = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/edit-list/{}", list_id),
            Some(&cookie),
            Some(json!({ "listTitle": "Errands" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(request("GET", "/get-list", Some(&cookie), None))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["list"][0]["title"], json!("Errands"));
    assert_eq!(body["list"][0]["id"], json!(list_id));

    // Items: add, edit, delete, repeat delete 404s
    app.clone()
        .oneshot(request(
            "POST",
            "/add-items",
            Some(&cookie),
            Some(json!({ "list_id": list_id, "description": "Buy milk" })),
        ))
        .await
        .unwrap();
    let resp = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/get-items/{}", list_id),
            Some(&cookie),
            None,
        ))
        .await
        .unwrap();
    let item_id = body_json(resp).await["items"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let resp = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/edit-item/{}", item_id),
            Some(&cookie),
            Some(json!({ "description": "Buy oat milk" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/delete-item/{}", item_id),
            Some(&cookie),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/delete-item/{}", item_id),
            Some(&cookie),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
