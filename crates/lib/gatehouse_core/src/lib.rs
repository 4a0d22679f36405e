//! # gatehouse_core
//!
//! Client-side core for the Gatehouse visitor-management backend: session
//! guarding, the API gateway, polling synchronization, role dashboards,
//! notification relaying and routing.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod notify;
pub mod poll;
pub mod router;
pub mod storage;
pub mod task;
pub mod views;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
