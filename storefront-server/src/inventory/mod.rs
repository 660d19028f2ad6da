//! Inventory Ledger
//!
//! The single owner of stock movement on the order path. A per-product
//! async lock serializes reservations for one product, and the decrement
//! itself is a conditional single-statement update, so two concurrent
//! reservations for the last unit can never both succeed and stock can
//! never go negative.

use crate::db::models::Product;
use crate::db::repository::{ProductRepository, RepoError};
use crate::utils::KeyedLocks;
use thiserror::Error;

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        name: String,
        requested: i64,
        available: i64,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Per-product stock accounting over the product repository
pub struct InventoryLedger {
    products: ProductRepository,
    locks: KeyedLocks,
}

impl InventoryLedger {
    pub fn new(products: ProductRepository) -> Self {
        Self {
            products,
            locks: KeyedLocks::new(),
        }
    }

    /// Atomically reserve `quantity` units of a product.
    ///
    /// Returns the product as it was at the point of sale so the caller
    /// can snapshot name/price/image onto the order line. Inactive
    /// products are not sellable and report as not found.
    pub async fn reserve(&self, product_id: &str, quantity: i64) -> LedgerResult<Product> {
        let record_id = ProductRepository::parse_id(product_id)
            .ok_or_else(|| LedgerError::ProductNotFound(product_id.to_string()))?;

        let _guard = self.locks.lock(product_id).await;

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| LedgerError::ProductNotFound(product_id.to_string()))?;

        let updated = self.products.decrement_stock(&record_id, quantity).await?;
        if updated.is_none() {
            return Err(LedgerError::InsufficientStock {
                name: product.name.clone(),
                requested: quantity,
                available: product.stock,
            });
        }

        tracing::debug!(
            product_id = %product_id,
            quantity,
            remaining = product.stock - quantity,
            "Stock reserved"
        );
        Ok(product)
    }

    /// Undo a prior successful reservation
    pub async fn release(&self, product_id: &str, quantity: i64) -> LedgerResult<()> {
        let record_id = ProductRepository::parse_id(product_id)
            .ok_or_else(|| LedgerError::ProductNotFound(product_id.to_string()))?;

        let _guard = self.locks.lock(product_id).await;
        self.products.increment_stock(&record_id, quantity).await?;

        tracing::debug!(product_id = %product_id, quantity, "Stock released");
        Ok(())
    }
}
