//! Order API Module
//!
//! Placement, lookup, lifecycle and anonymous tracking. Access control is
//! the fronting layer's concern; `/mine` is the only route that requires
//! identity claims, because it is defined by them.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::place_order))
        .route("/mine", get(handler::list_mine))
        .route("/track", post(handler::track))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::set_status))
        .route("/{id}/pay", put(handler::mark_paid))
}
