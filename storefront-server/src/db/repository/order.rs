//! Order Repository
//!
//! Persistence for the order aggregate. Creation writes the whole
//! aggregate at once; later mutations touch only the payment or
//! status/delivery fields and always refresh `updated_at`.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderStatus, PaymentResult};
use crate::utils::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use uuid::Uuid;

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Parse an `order:<key>` id; malformed ids are treated as not found
    pub fn parse_id(id: &str) -> Option<RecordId> {
        let record_id: RecordId = id.parse().ok()?;
        (record_id.table() == ORDER_TABLE).then_some(record_id)
    }

    /// Persist a new order under a freshly generated identifier
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let key = Uuid::new_v4().simple().to_string();
        let created: Option<Order> = self
            .base
            .db()
            .create((ORDER_TABLE, key))
            .content(order)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let Some(record_id) = Self::parse_id(id) else {
            return Ok(None);
        };
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// All orders, newest first (admin listing)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders for a purchaser, newest first.
    ///
    /// Matches the registered-user reference OR the purchaser email
    /// (case-insensitive): a shopper who checked out as guest and later
    /// registered with the same email sees both sets.
    pub async fn find_for_purchaser(
        &self,
        user_id: Option<&str>,
        email: &str,
    ) -> RepoResult<Vec<Order>> {
        // An absent user id must never match; no purchaser has an empty one
        let user_id = user_id.unwrap_or_default().to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order \
                 WHERE purchaser.user_id = $user_id \
                    OR string::lowercase(purchaser.email) = string::lowercase($email) \
                 ORDER BY created_at DESC",
            )
            .bind(("user_id", user_id))
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Write a status transition and its derived delivery fields
    pub async fn update_status(
        &self,
        record_id: &RecordId,
        status: OrderStatus,
        is_delivered: bool,
        delivered_at: Option<i64>,
    ) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $order SET status = $status, is_delivered = $is_delivered, \
                 delivered_at = $delivered_at, updated_at = $now RETURN AFTER",
            )
            .bind(("order", record_id.clone()))
            .bind(("status", status))
            .bind(("is_delivered", is_delivered))
            .bind(("delivered_at", delivered_at))
            .bind(("now", now_millis()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", record_id)))
    }

    /// Record the payment confirmation
    pub async fn update_payment(
        &self,
        record_id: &RecordId,
        payment_result: PaymentResult,
        paid_at: i64,
    ) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $order SET is_paid = true, paid_at = $paid_at, \
                 payment_result = $payment_result, updated_at = $now RETURN AFTER",
            )
            .bind(("order", record_id.clone()))
            .bind(("paid_at", paid_at))
            .bind(("payment_result", payment_result))
            .bind(("now", now_millis()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", record_id)))
    }
}
