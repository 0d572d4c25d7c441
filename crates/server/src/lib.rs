//! To-Do List Server Library
//!
//! Session-authenticated REST API over a SQLite store.

pub mod auth;
pub mod config;
pub mod ctx;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use auth::{middleware::mw_require_auth, AuthManager};
use config::{AppState, ServerConfig};
use handlers::{
    add_items, add_list, delete_item, delete_list, edit_item, edit_list, get_items, get_list,
    get_session, login, logout, register,
};
use store::TodoStore;

/// Build the API router. Everything behind `mw_require_auth` needs a
/// valid session cookie; register/login/session-check/health do not.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        // List endpoints
        .route("/get-list", get(get_list))
        .route("/add-list", post(add_list))
        .route("/edit-list/{id}", put(edit_list))
        .route("/delete-list/{id}", delete(delete_list))
        // Item endpoints
        .route("/get-items/{list_id}", get(get_items))
        .route("/add-items", post(add_items))
        .route("/edit-item/{id}", put(edit_item))
        .route("/delete-item/{id}", delete(delete_item))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            mw_require_auth,
        ));

    Router::new()
        // Auth endpoints
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/get-session", get(get_session))
        // Health check
        .route("/health", get(health_check))
        .merge(protected)
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Already set, ignore
    }

    info!("=== To-Do Server ===");

    let config = ServerConfig::from_env();
    config.ensure_dirs().await?;
    info!("Data directory: {:?}", config.data_dir);

    let pool = db::init_db(&config.db_path()).await?;

    let auth = Arc::new(AuthManager::new(pool.clone(), config.session_ttl_days));
    info!("Auth Manager initialized");

    let store = Arc::new(TodoStore::new(pool));
    info!("Todo Store initialized");

    let state = AppState {
        config: config.clone(),
        auth,
        store,
    };

    // The browser and the API live on different origins; the session
    // cookie only flows when the origin is exact and credentials are on.
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let app = router(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK - To-Do Server"
}
