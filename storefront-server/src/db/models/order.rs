//! Order Model
//!
//! The order aggregate is immutable after creation except for the payment
//! confirmation fields and the status/delivery fields, which change only
//! through the order lifecycle service.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Legal forward transitions. Cancellation is reachable from every
    /// other state (a delivered order can still be cancelled for returns
    /// bookkeeping); nothing leaves Cancelled.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Delivered)
                | (Pending, Cancelled)
                | (Confirmed, Delivered)
                | (Confirmed, Cancelled)
                | (Delivered, Cancelled)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// Order line item. Name/price/image are snapshots taken at order time,
/// immune to later catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// Product reference
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub name: String,
    /// Unit price in cents
    pub price: i64,
    pub quantity: i32,
    pub image: String,
}

/// Purchaser identity, bound once at order creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Purchaser {
    /// Checkout by an authenticated shopper; name/email come from the
    /// identity claims, phone from the checkout form (claims carry none)
    Registered {
        user_id: String,
        name: String,
        email: String,
        phone: Option<String>,
    },
    /// Anonymous checkout; all three contact fields required
    Guest {
        name: String,
        email: String,
        phone: String,
    },
}

impl Purchaser {
    pub fn name(&self) -> &str {
        match self {
            Purchaser::Registered { name, .. } | Purchaser::Guest { name, .. } => name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Purchaser::Registered { email, .. } | Purchaser::Guest { email, .. } => email,
        }
    }

    pub fn phone(&self) -> Option<&str> {
        match self {
            Purchaser::Registered { phone, .. } => phone.as_deref(),
            Purchaser::Guest { phone, .. } => Some(phone),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Purchaser::Registered { user_id, .. } => Some(user_id),
            Purchaser::Guest { .. } => None,
        }
    }
}

/// Shipping address, free-form strings, not geocoded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Payment result recorded by the payment-confirmation action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    /// External reference id from the payment collaborator
    pub reference: String,
    pub status: String,
    pub time: String,
    pub email: Option<String>,
}

/// Caller-supplied totals in cents, stored verbatim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTotals {
    pub items_subtotal: i64,
    pub tax: i64,
    pub shipping: i64,
    pub grand_total: i64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub items: Vec<OrderLineItem>,
    pub purchaser: Purchaser,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub totals: OrderTotals,
    pub status: OrderStatus,
    pub is_paid: bool,
    pub paid_at: Option<i64>,
    pub payment_result: Option<PaymentResult>,
    pub is_delivered: bool,
    pub delivered_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// String form of the record id ("order:<key>")
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}
