//! Order Lifecycle
//!
//! Status transitions and payment confirmation. Both mutate a single
//! order and are serialized per order by a keyed lock; different orders
//! proceed independently. The delivery flag and timestamp are fully
//! determined by the status: entering Delivered sets them, entering any
//! other state clears them.

use std::sync::Arc;
use std::time::Duration;

use super::error::{CheckoutError, CheckoutResult};
use crate::db::models::{Order, OrderStatus, PaymentResult};
use crate::db::repository::OrderRepository;
use crate::notify::{self, Notification, NotificationIntent, Notifier};
use crate::utils::{KeyedLocks, now_millis};

pub struct OrderLifecycle {
    orders: OrderRepository,
    notifier: Arc<dyn Notifier>,
    notify_timeout: Duration,
    locks: KeyedLocks,
}

impl OrderLifecycle {
    pub fn new(
        orders: OrderRepository,
        notifier: Arc<dyn Notifier>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            orders,
            notifier,
            notify_timeout,
            locks: KeyedLocks::new(),
        }
    }

    /// Transition an order to `new_status`.
    ///
    /// Rejects anything outside the transition table. Every successful
    /// change notifies the purchaser best-effort.
    pub async fn set_status(
        &self,
        order_id: &str,
        new_status: OrderStatus,
    ) -> CheckoutResult<Order> {
        let record_id = OrderRepository::parse_id(order_id)
            .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))?;

        let _guard = self.locks.lock(order_id).await;

        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))?;

        if !order.status.can_transition_to(new_status) {
            return Err(CheckoutError::InvalidTransition {
                from: order.status,
                to: new_status,
            });
        }

        let (is_delivered, delivered_at) = match new_status {
            OrderStatus::Delivered => (true, Some(now_millis())),
            _ => (false, None),
        };

        let updated = self
            .orders
            .update_status(&record_id, new_status, is_delivered, delivered_at)
            .await?;

        tracing::info!(
            order_id = %order_id,
            from = %order.status,
            to = %new_status,
            "Order status changed"
        );

        notify::send_best_effort(
            self.notifier.as_ref(),
            Notification {
                recipient_email: updated.purchaser.email().to_string(),
                recipient_name: updated.purchaser.name().to_string(),
                intent: NotificationIntent::StatusChanged { status: new_status },
                order_id: updated.id_string(),
                summary: format!("Order status updated to {}", new_status),
            },
            self.notify_timeout,
        )
        .await;

        Ok(updated)
    }

    /// Record a payment confirmation.
    ///
    /// Independent of status: it never changes the lifecycle state, and a
    /// status change never touches the payment fields.
    pub async fn mark_paid(
        &self,
        order_id: &str,
        payment_result: PaymentResult,
    ) -> CheckoutResult<Order> {
        let record_id = OrderRepository::parse_id(order_id)
            .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))?;

        let _guard = self.locks.lock(order_id).await;

        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))?;

        let updated = self
            .orders
            .update_payment(&record_id, payment_result, now_millis())
            .await?;

        tracing::info!(order_id = %order_id, "Order marked paid");
        Ok(updated)
    }
}
