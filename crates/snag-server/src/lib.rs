//! # snag-server
//!
//! Axum HTTP layer for Snagtrack: router, handlers, session authentication,
//! and the JSON error mapping. The binary in `main.rs` wires this to the
//! config and database crates.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use state::AppState;

/// Build the application router with all routes and shared state.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    routes::router(state)
}
