//! Auth handlers

use crate::auth::middleware::{session_token, SESSION_COOKIE};
use crate::config::AppState;
use crate::error::Result;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    // Older client revisions send "name" instead of "username".
    #[serde(default, alias = "name")]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /register - {}", req.username);

    state
        .auth
        .register(&req.username, &req.password, &req.confirm)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /login - {}", req.username);

    let (_, session) = state.auth.login(&req.username, &req.password).await?;

    let max_age = state.config.session_ttl_days * 24 * 60 * 60;

    Ok((
        [(header::SET_COOKIE, session_cookie(&session.token, max_age))],
        Json(json!({ "success": true })),
    ))
}

/// POST /logout
///
/// Best-effort: succeeds whether or not a session was attached.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("POST /logout");

    if let Some(token) = session_token(&headers) {
        if let Err(e) = state.auth.logout(&token).await {
            warn!("Logout cleanup failed: {}", e);
        }
    }

    ([(header::SET_COOKIE, clear_cookie())], Json(json!({ "success": true })))
}

/// GET /get-session
///
/// Always 200; the body says whether the cookie maps to a live session.
pub async fn get_session(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let account = match session_token(&headers) {
        Some(token) => state.auth.validate_session(&token).await.ok(),
        None => None,
    };

    match account {
        Some(user) => Json(json!({ "session": true, "user": user })),
        None => Json(json!({ "session": false })),
    }
}

// The browser and the API sit on different origins, so the cookie needs
// the cross-site attributes; SameSite=None requires Secure.
fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=None; Secure",
        SESSION_COOKIE, token, max_age_secs
    )
}

fn clear_cookie() -> String {
    format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=None; Secure",
        SESSION_COOKIE
    )
}
