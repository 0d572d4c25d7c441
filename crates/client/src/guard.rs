//! Startup session guard and navigation gate.
//!
//! One session check at application start decides which views are
//! reachable; nothing re-polls afterwards. A 401 from any later API call
//! is the only thing that reopens the question.

use crate::api::{ApiClient, ApiError};
use crate::models::{SessionCheck, UserInfo};
use tracing::info;

/// Where the shell can navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Lists,
    ListDetail(String),
}

impl View {
    /// Views that require an authenticated session.
    pub fn is_protected(&self) -> bool {
        matches!(self, View::Lists | View::ListDetail(_))
    }
}

/// What the shell should do about a requested view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Session check still in flight: render the neutral loading view
    /// and navigate nowhere.
    Loading,
    /// Requested view is fine.
    Stay,
    RedirectToLogin,
    RedirectToLists,
}

/// Resolved authentication state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Unknown,
    Authenticated(UserInfo),
    Anonymous,
}

#[derive(Debug, Default)]
pub struct SessionGuard {
    state: SessionState,
    last_registered: Option<String>,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// One-shot startup check. An unreachable backend resolves to
    /// Anonymous: it cannot prove a session either way, and the login
    /// view is the only safe landing.
    pub async fn resolve(&mut self, api: &ApiClient) -> &SessionState {
        match api.get_session().await {
            Ok(check) => self.apply(check),
            Err(_) => self.state = SessionState::Anonymous,
        }
        &self.state
    }

    /// Fold a session-check response into the guard.
    pub fn apply(&mut self, check: SessionCheck) {
        self.state = match check.user {
            Some(user) if check.session => {
                info!("Session resolved for {}", user.username);
                SessionState::Authenticated(user)
            }
            _ => SessionState::Anonymous,
        };
    }

    /// Navigation decision for a requested view.
    pub fn gate(&self, view: &View) -> Gate {
        match &self.state {
            SessionState::Unknown => Gate::Loading,
            SessionState::Anonymous if view.is_protected() => Gate::RedirectToLogin,
            SessionState::Authenticated(_) if !view.is_protected() => Gate::RedirectToLists,
            _ => Gate::Stay,
        }
    }

    /// Call when any API call fails mid-session. A 401 forces an
    /// immediate re-check and routes accordingly; anything else is not
    /// the guard's business and returns None.
    pub async fn on_api_error(&mut self, api: &ApiClient, err: &ApiError) -> Option<Gate> {
        if !err.is_unauthorized() {
            return None;
        }

        self.state = SessionState::Unknown;
        self.resolve(api).await;

        match self.state {
            SessionState::Authenticated(_) => Some(Gate::Stay),
            _ => Some(Gate::RedirectToLogin),
        }
    }

    /// Remember a freshly registered username so the login form can
    /// prefill it.
    pub fn remember_registered(&mut self, username: impl Into<String>) {
        self.last_registered = Some(username.into());
    }

    /// Take the prefill exactly once.
    pub fn take_last_registered(&mut self) -> Option<String> {
        self.last_registered.take()
    }
}
