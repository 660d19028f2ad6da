//! Product API Module
//!
//! Storefront reads plus minimal catalog management. Stock shown here is
//! informational; the order path reserves through the inventory ledger.

mod handler;

use axum::{
    Router,
    routing::get,
};

use crate::core::ServerState;

/// Product router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
}
