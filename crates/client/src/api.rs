//! HTTP client for the to-do API.
//!
//! The reqwest cookie store plays the browser's part: the session cookie
//! set by `/login` rides along on every later call. There is no local
//! credential cache of any kind; the API is the only source of truth.

use crate::models::{ItemView, ListSummary, SessionCheck};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Client-side failure taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with `{success:false, message}`.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Transport-level failure: backend unreachable or a bad payload.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// True when the backend rejected the session; the caller should put
    /// the guard through a re-check.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Api { status: 401, .. })
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    list: Vec<ListSummary>,
}

#[derive(Debug, Deserialize)]
struct ItemsEnvelope {
    #[serde(default)]
    items: Vec<ItemView>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Turn a non-success status into the backend's own message.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp
            .json::<Envelope>()
            .await
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| "something went wrong, try again".to_string());

        debug!("API error {}: {}", status, message);

        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url("/register"))
            .json(&json!({
                "username": username,
                "password": password,
                "confirm": confirm,
            }))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// The register form offers an auto-login choice; chaining here
    /// saves the round trip through the login view.
    pub async fn register_and_login(
        &self,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<(), ApiError> {
        self.register(username, password, confirm).await?;
        self.login(username, password).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url("/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let resp = self.http.post(self.url("/logout")).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    pub async fn get_session(&self) -> Result<SessionCheck, ApiError> {
        let resp = self.http.get(self.url("/get-session")).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    pub async fn get_list(&self) -> Result<Vec<ListSummary>, ApiError> {
        let resp = self.http.get(self.url("/get-list")).send().await?;
        Ok(Self::check(resp).await?.json::<ListEnvelope>().await?.list)
    }

    /// Mutate, then refetch the whole collection; the UI never patches
    /// local state.
    pub async fn add_list(&self, title: &str) -> Result<Vec<ListSummary>, ApiError> {
        let resp = self
            .http
            .post(self.url("/add-list"))
            .json(&json!({ "listTitle": title }))
            .send()
            .await?;
        Self::check(resp).await?;
        self.get_list().await
    }

    pub async fn edit_list(&self, list_id: &str, title: &str) -> Result<Vec<ListSummary>, ApiError> {
        let resp = self
            .http
            .put(self.url(&format!("/edit-list/{}", list_id)))
            .json(&json!({ "listTitle": title }))
            .send()
            .await?;
        Self::check(resp).await?;
        self.get_list().await
    }

    pub async fn delete_list(&self, list_id: &str) -> Result<Vec<ListSummary>, ApiError> {
        let resp = self
            .http
            .delete(self.url(&format!("/delete-list/{}", list_id)))
            .send()
            .await?;
        Self::check(resp).await?;
        self.get_list().await
    }

    pub async fn get_items(&self, list_id: &str) -> Result<Vec<ItemView>, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("/get-items/{}", list_id)))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json::<ItemsEnvelope>().await?.items)
    }

    pub async fn add_item(
        &self,
        list_id: &str,
        description: &str,
    ) -> Result<Vec<ItemView>, ApiError> {
        let resp = self
            .http
            .post(self.url("/add-items"))
            .json(&json!({ "list_id": list_id, "description": description }))
            .send()
            .await?;
        Self::check(resp).await?;
        self.get_items(list_id).await
    }

    pub async fn edit_item(
        &self,
        list_id: &str,
        item_id: &str,
        description: &str,
    ) -> Result<Vec<ItemView>, ApiError> {
        let resp = self
            .http
            .put(self.url(&format!("/edit-item/{}", item_id)))
            .json(&json!({ "description": description }))
            .send()
            .await?;
        Self::check(resp).await?;
        self.get_items(list_id).await
    }

    pub async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<Vec<ItemView>, ApiError> {
        let resp = self
            .http
            .delete(self.url(&format!("/delete-item/{}", item_id)))
            .send()
            .await?;
        Self::check(resp).await?;
        self.get_items(list_id).await
    }
}
