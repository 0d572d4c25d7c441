//! Server configuration

use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::AuthManager;
use crate::store::TodoStore;

/// Configuration for the to-do server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listening port
    pub port: u16,
    /// Directory holding the SQLite database
    pub data_dir: PathBuf,
    /// Browser origin allowed by CORS
    pub cors_origin: String,
    /// Server-side session lifetime; the cookie Max-Age matches
    pub session_ttl_days: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from("todo_data"),
            cors_origin: "http://localhost:5173".to_string(),
            session_ttl_days: 30,
        }
    }
}

impl ServerConfig {
    /// Read overrides from TODO_PORT, TODO_DATA_DIR, TODO_CORS_ORIGIN
    /// and SESSION_TTL_DAYS.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("TODO_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            data_dir: std::env::var("TODO_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            cors_origin: std::env::var("TODO_CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            session_ttl_days: std::env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.session_ttl_days),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("todo.sqlite")
    }

    /// Ensure the data directory exists
    pub async fn ensure_dirs(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        Ok(())
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub auth: Arc<AuthManager>,
    pub store: Arc<TodoStore>,
}
