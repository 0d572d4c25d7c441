//! HTTP handlers

pub mod auth;
pub mod items;
pub mod lists;

pub use auth::{get_session, login, logout, register};
pub use items::{add_items, delete_item, edit_item, get_items};
pub use lists::{add_list, delete_list, edit_list, get_list};
