//! Order Verifier
//!
//! Anonymous tracking: does the claimed contact information match the
//! order? Read-only; never touches the inventory ledger.

use super::error::{CheckoutError, CheckoutResult};
use crate::db::models::Order;
use crate::db::repository::OrderRepository;

pub struct OrderVerifier {
    orders: OrderRepository,
}

impl OrderVerifier {
    pub fn new(orders: OrderRepository) -> Self {
        Self { orders }
    }

    /// Look up an order and check the claimed contact details.
    ///
    /// The email matches case-insensitively, the phone exactly; either
    /// alone is sufficient. Empty claims never match. Malformed or unknown
    /// ids are `OrderNotFound`, a wrong claim is `VerificationMismatch`;
    /// the HTTP layer presents both identically so existing order ids
    /// cannot be probed.
    pub async fn verify(
        &self,
        order_id: &str,
        claimed_email: &str,
        claimed_phone: &str,
    ) -> CheckoutResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))?;

        let email_matches = !claimed_email.is_empty()
            && order
                .purchaser
                .email()
                .eq_ignore_ascii_case(claimed_email);

        let phone_matches =
            !claimed_phone.is_empty() && order.purchaser.phone() == Some(claimed_phone);

        if email_matches || phone_matches {
            Ok(order)
        } else {
            tracing::debug!(order_id = %order_id, "Order verification mismatch");
            Err(CheckoutError::VerificationMismatch)
        }
    }
}
