//! Database Models

pub mod order;
pub mod product;
pub mod serde_helpers;

pub use order::{
    Order, OrderLineItem, OrderStatus, OrderTotals, PaymentResult, Purchaser, ShippingAddress,
};
pub use product::{Product, ProductCreate, ProductUpdate};
