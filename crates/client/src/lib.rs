//! Browser-client core for the to-do app.
//!
//! A typed API client plus the startup session guard; rendering and
//! styling belong to the embedding shell, not to this crate.

pub mod api;
pub mod guard;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use guard::{Gate, SessionGuard, SessionState, View};
pub use models::{ItemView, ListSummary, SessionCheck, UserInfo};
