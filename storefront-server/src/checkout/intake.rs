//! Order Intake
//!
//! Turns a validated cart into a persisted order. Reservation across the
//! whole cart is all-or-nothing: the first failure releases everything
//! acquired so far, and a persistence failure after full reservation does
//! the same, so stock is never left decremented for an order that does
//! not exist.

use std::sync::Arc;
use std::time::Duration;

use super::error::{CheckoutError, CheckoutResult};
use crate::db::models::{Order, OrderLineItem, OrderStatus, OrderTotals, Purchaser, ShippingAddress};
use crate::db::repository::OrderRepository;
use crate::inventory::InventoryLedger;
use crate::notify::{self, Notification, NotificationIntent, Notifier};
use crate::utils::now_millis;

/// One submitted cart line
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i32,
}

/// Everything needed to place an order; the purchaser identity has
/// already been resolved
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub items: Vec<CartLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub totals: OrderTotals,
    pub purchaser: Purchaser,
}

pub struct OrderIntake {
    ledger: Arc<InventoryLedger>,
    orders: OrderRepository,
    notifier: Arc<dyn Notifier>,
    notify_timeout: Duration,
}

impl OrderIntake {
    pub fn new(
        ledger: Arc<InventoryLedger>,
        orders: OrderRepository,
        notifier: Arc<dyn Notifier>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            orders,
            notifier,
            notify_timeout,
        }
    }

    /// Place an order: reserve stock line by line, persist, notify.
    ///
    /// On any failure every reservation made so far is released before the
    /// error is returned; a notification failure never affects the result.
    pub async fn place_order(&self, request: PlaceOrder) -> CheckoutResult<Order> {
        if request.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        for line in &request.items {
            if line.quantity < 1 {
                return Err(CheckoutError::InvalidQuantity {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                });
            }
        }

        // Reserve in submission order, snapshotting each product at its
        // point of sale
        let mut reserved: Vec<(String, i64)> = Vec::with_capacity(request.items.len());
        let mut line_items: Vec<OrderLineItem> = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let quantity = i64::from(line.quantity);
            match self.ledger.reserve(&line.product_id, quantity).await {
                Ok(product) => {
                    let product_id = product.id.clone().ok_or_else(|| {
                        CheckoutError::Storage("product record is missing its id".to_string())
                    })?;
                    reserved.push((line.product_id.clone(), quantity));
                    line_items.push(OrderLineItem {
                        product: product_id,
                        name: product.name,
                        price: product.price,
                        quantity: line.quantity,
                        image: product.image,
                    });
                }
                Err(e) => {
                    self.release_reserved(&reserved).await;
                    return Err(e.into());
                }
            }
        }

        let now = now_millis();
        let order = Order {
            id: None,
            items: line_items,
            purchaser: request.purchaser,
            shipping_address: request.shipping_address,
            payment_method: request.payment_method,
            totals: request.totals,
            status: OrderStatus::Pending,
            is_paid: false,
            paid_at: None,
            payment_result: None,
            is_delivered: false,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        };

        let created = match self.orders.create(order).await {
            Ok(created) => created,
            Err(e) => {
                // Compensate: the order does not exist, so neither may the
                // decrements
                tracing::error!(error = %e, "Order persistence failed, releasing reservations");
                self.release_reserved(&reserved).await;
                return Err(CheckoutError::Storage(e.to_string()));
            }
        };

        tracing::info!(
            order_id = %created.id_string(),
            items = created.items.len(),
            grand_total = created.totals.grand_total,
            "Order placed"
        );

        notify::send_best_effort(
            self.notifier.as_ref(),
            Notification {
                recipient_email: created.purchaser.email().to_string(),
                recipient_name: created.purchaser.name().to_string(),
                intent: NotificationIntent::OrderPlaced,
                order_id: created.id_string(),
                summary: format!(
                    "Order received, total {}",
                    format_amount(created.totals.grand_total)
                ),
            },
            self.notify_timeout,
        )
        .await;

        Ok(created)
    }

    /// Release every reservation in `reserved`, logging failures.
    ///
    /// Releases run concurrently; the ledger serializes per product.
    async fn release_reserved(&self, reserved: &[(String, i64)]) {
        let releases = reserved.iter().map(|(product_id, quantity)| async move {
            if let Err(e) = self.ledger.release(product_id, *quantity).await {
                tracing::error!(
                    product_id = %product_id,
                    quantity,
                    error = %e,
                    "Failed to release reservation during rollback"
                );
            }
        });
        futures::future::join_all(releases).await;
    }
}

/// Render cents as a decimal amount for notification text
fn format_amount(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}
