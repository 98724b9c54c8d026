//! Multi-list todo manager.
//!
//! Lists and their todos live behind the [`store::ListStore`] trait, which has
//! two interchangeable implementations: a SQLite-backed [`db::Database`] shared
//! by every visitor, and an in-memory [`store::SessionStore`] scoped to one
//! browser session. The [`api`] module exposes either one over HTTP.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod db;
pub mod ids;
pub mod models;
pub mod store;
pub mod validation;
