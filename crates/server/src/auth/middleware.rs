use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{Error, Result};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Name of the session cookie held by the browser.
pub const SESSION_COOKIE: &str = "todo_session";

pub async fn mw_require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    debug!("MIDDLEWARE: require_auth");

    let token = session_token(req.headers()).ok_or(Error::Unauthorized)?;

    let account = state
        .auth
        .validate_session(&token)
        .await
        .map_err(|_| Error::Unauthorized)?;

    req.extensions_mut()
        .insert(Ctx::new(account.id, account.username));

    Ok(next.run(req).await)
}

/// Extract the session token from the Cookie header, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}
