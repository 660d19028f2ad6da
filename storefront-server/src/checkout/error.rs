use crate::db::models::OrderStatus;
use crate::db::repository::RepoError;
use crate::inventory::LedgerError;
use crate::utils::AppError;
use thiserror::Error;

/// Checkout workflow errors
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid quantity {quantity} for {product_id}")]
    InvalidQuantity { product_id: String, quantity: i32 },

    #[error("Guest checkout requires name, email and phone")]
    IncompleteGuestContact,

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        name: String,
        requested: i64,
        available: i64,
    },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order details do not match")]
    VerificationMismatch,

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;

impl From<LedgerError> for CheckoutError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ProductNotFound(id) => CheckoutError::ProductNotFound(id),
            LedgerError::InsufficientStock {
                name,
                requested,
                available,
            } => CheckoutError::InsufficientStock {
                name,
                requested,
                available,
            },
            LedgerError::Storage(e) => CheckoutError::Storage(e.to_string()),
        }
    }
}

impl From<RepoError> for CheckoutError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => CheckoutError::OrderNotFound(msg),
            other => CheckoutError::Storage(other.to_string()),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match &err {
            CheckoutError::EmptyCart
            | CheckoutError::InvalidQuantity { .. }
            | CheckoutError::IncompleteGuestContact => AppError::validation(err.to_string()),

            CheckoutError::ProductNotFound(_) | CheckoutError::OrderNotFound(_) => {
                AppError::not_found(err.to_string())
            }

            CheckoutError::InsufficientStock { .. } | CheckoutError::InvalidTransition { .. } => {
                AppError::business_rule(err.to_string())
            }

            // Mismatch surfaces like a missing order by default; the
            // tracking handler additionally collapses OrderNotFound into
            // the same body
            CheckoutError::VerificationMismatch => AppError::not_found(err.to_string()),

            // Details are logged at the error site, not leaked to callers
            CheckoutError::Storage(msg) => AppError::database(msg.clone()),
        }
    }
}
