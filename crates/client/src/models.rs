use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Authenticated user as reported by the session check.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// One to-do list row from `/get-list`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListSummary {
    pub id: String,
    pub title: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// One task row from `/get-items/{list_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemView {
    pub id: String,
    pub list_id: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Result of `GET /get-session`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionCheck {
    pub session: bool,
    #[serde(default)]
    pub user: Option<UserInfo>,
}
