//! API routing module
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`products`] - catalog endpoints
//! - [`orders`] - order placement, lifecycle and tracking

pub mod health;
pub mod orders;
pub mod products;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Combined application router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(products::router())
        .merge(orders::router())
}
