//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::{CurrentUser, OptionalUser};
use crate::checkout::{
    CartLine, CheckoutError, GuestContactInput, PlaceOrder, resolve_purchaser,
};
use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus, OrderTotals, PaymentResult, ShippingAddress};
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};

/// Single body for both not-found and mismatch on the tracking route, so
/// probing cannot tell existing order ids from wrong contact details
const TRACK_NOT_FOUND: &str = "Order not found or details do not match";

/// One cart line as submitted
#[derive(Debug, Deserialize, Validate)]
pub struct CartLineRequest {
    #[validate(length(min = 1))]
    pub product_id: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Shipping address input
#[derive(Debug, Deserialize, Validate)]
pub struct ShippingAddressRequest {
    #[validate(length(min = 1))]
    pub street: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub postal_code: String,
    #[validate(length(min = 1))]
    pub country: String,
}

/// Caller-computed totals in cents, stored verbatim
#[derive(Debug, Deserialize, Validate)]
pub struct TotalsRequest {
    #[validate(range(min = 0))]
    pub items_subtotal: i64,
    #[validate(range(min = 0))]
    pub tax: i64,
    #[validate(range(min = 0))]
    pub shipping: i64,
    #[validate(range(min = 0))]
    pub grand_total: i64,
}

/// Contact fields from the checkout form
#[derive(Debug, Default, Deserialize, Validate)]
pub struct GuestContactRequest {
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Place order request
#[derive(Debug, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    #[validate(length(min = 1, message = "cart cannot be empty"), nested)]
    pub items: Vec<CartLineRequest>,
    #[validate(nested)]
    pub shipping_address: ShippingAddressRequest,
    #[validate(length(min = 1))]
    pub payment_method: String,
    #[validate(nested)]
    pub totals: TotalsRequest,
    #[serde(default)]
    #[validate(nested)]
    pub guest: Option<GuestContactRequest>,
}

/// POST /api/orders - place an order
pub async fn place_order(
    State(state): State<ServerState>,
    OptionalUser(user): OptionalUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let guest = payload.guest.unwrap_or_default();
    let purchaser = resolve_purchaser(
        user.as_ref(),
        &GuestContactInput {
            name: guest.name,
            email: guest.email,
            phone: guest.phone,
        },
    )?;

    let request = PlaceOrder {
        items: payload
            .items
            .into_iter()
            .map(|line| CartLine {
                product_id: line.product_id,
                quantity: line.quantity,
            })
            .collect(),
        shipping_address: ShippingAddress {
            street: payload.shipping_address.street,
            city: payload.shipping_address.city,
            postal_code: payload.shipping_address.postal_code,
            country: payload.shipping_address.country,
        },
        payment_method: payload.payment_method,
        totals: OrderTotals {
            items_subtotal: payload.totals.items_subtotal,
            tax: payload.totals.tax,
            shipping: payload.totals.shipping,
            grand_total: payload.totals.grand_total,
        },
        purchaser,
    };

    let order = state.intake.place_order(request).await?;
    Ok(Json(order))
}

/// GET /api/orders - all orders, newest first (admin by caller convention)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo
        .find_all()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(orders))
}

/// GET /api/orders/mine - orders of the authenticated purchaser
///
/// Matches the registered-user reference or the guest email, so orders
/// placed as guest before registering surface here too.
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo
        .find_for_purchaser(Some(&user.id), &user.email)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - unrestricted lookup
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(order))
}

/// Update status request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// PUT /api/orders/{id}/status - operator transition
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = state.lifecycle.set_status(&id, payload.status).await?;
    Ok(Json(order))
}

/// Payment confirmation request
#[derive(Debug, Deserialize, Validate)]
pub struct PaymentConfirmRequest {
    #[validate(length(min = 1))]
    pub reference: String,
    #[validate(length(min = 1))]
    pub status: String,
    #[serde(default)]
    pub time: String,
    pub email: Option<String>,
}

/// PUT /api/orders/{id}/pay - record the payment result
pub async fn mark_paid(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PaymentConfirmRequest>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let payment_result = PaymentResult {
        reference: payload.reference,
        status: payload.status,
        time: payload.time,
        email: payload.email,
    };
    let order = state.lifecycle.mark_paid(&id, payment_result).await?;
    Ok(Json(order))
}

/// Track order request
#[derive(Debug, Deserialize)]
pub struct TrackOrderRequest {
    pub order_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// POST /api/orders/track - anonymous tracking by id plus contact detail
pub async fn track(
    State(state): State<ServerState>,
    Json(payload): Json<TrackOrderRequest>,
) -> AppResult<Json<Order>> {
    if payload.order_id.trim().is_empty() {
        return Err(AppError::validation("order_id is required"));
    }

    let result = state
        .verifier
        .verify(
            &payload.order_id,
            payload.email.as_deref().unwrap_or(""),
            payload.phone.as_deref().unwrap_or(""),
        )
        .await;

    match result {
        Ok(order) => Ok(Json(order)),
        Err(CheckoutError::OrderNotFound(_)) | Err(CheckoutError::VerificationMismatch) => {
            Err(AppError::not_found(TRACK_NOT_FOUND))
        }
        Err(e) => Err(e.into()),
    }
}
