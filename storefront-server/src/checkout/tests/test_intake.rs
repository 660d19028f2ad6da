use super::*;
use crate::db::models::{OrderStatus, ProductUpdate};
use crate::notify::NotificationIntent;

#[tokio::test]
async fn test_place_order_reserves_stock() {
    let ctx = create_test_ctx().await;
    let p1 = ctx.seed_product("headphones", 4999, 2).await;

    let order = ctx
        .intake
        .place_order(place_request(vec![line(&p1, 2)], guest_purchaser()))
        .await
        .unwrap();

    assert_eq!(ctx.stock_of(&p1).await, 0);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(!order.is_paid);
    assert!(!order.is_delivered);
    assert!(order.paid_at.is_none());
    assert!(order.delivered_at.is_none());
    assert!(order.id.is_some());
    assert_eq!(order.created_at, order.updated_at);
}

#[tokio::test]
async fn test_place_order_snapshots_product_fields() {
    let ctx = create_test_ctx().await;
    let p1 = ctx.seed_product("speaker", 12900, 5).await;

    let order = ctx
        .intake
        .place_order(place_request(vec![line(&p1, 1)], guest_purchaser()))
        .await
        .unwrap();

    assert_eq!(order.items[0].name, "speaker");
    assert_eq!(order.items[0].price, 12900);
    assert_eq!(order.items[0].image, "/images/speaker.jpg");

    // Catalog edits after the sale must not alter the stored order
    ctx.products
        .update(
            &p1,
            ProductUpdate {
                name: Some("speaker mk2".into()),
                description: None,
                image: None,
                price: Some(15900),
                stock: None,
                is_active: None,
            },
        )
        .await
        .unwrap();

    let reloaded = ctx
        .orders
        .find_by_id(&order.id_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.items[0].name, "speaker");
    assert_eq!(reloaded.items[0].price, 12900);
}

#[tokio::test]
async fn test_place_order_insufficient_stock() {
    let ctx = create_test_ctx().await;
    let p1 = ctx.seed_product("headphones", 4999, 2).await;

    let result = ctx
        .intake
        .place_order(place_request(vec![line(&p1, 3)], guest_purchaser()))
        .await;

    assert!(matches!(
        result,
        Err(CheckoutError::InsufficientStock {
            requested: 3,
            available: 2,
            ..
        })
    ));
    assert_eq!(ctx.stock_of(&p1).await, 2);
}

#[tokio::test]
async fn test_place_order_rolls_back_prior_reservations() {
    let ctx = create_test_ctx().await;
    let p1 = ctx.seed_product("amp", 19900, 1).await;
    let p2 = ctx.seed_product("cable", 900, 0).await;

    let result = ctx
        .intake
        .place_order(place_request(
            vec![line(&p1, 1), line(&p2, 1)],
            guest_purchaser(),
        ))
        .await;

    assert!(matches!(
        result,
        Err(CheckoutError::InsufficientStock { .. })
    ));
    // The successful reservation of p1 must have been released
    assert_eq!(ctx.stock_of(&p1).await, 1);
    assert_eq!(ctx.stock_of(&p2).await, 0);

    // And no order may exist
    assert!(ctx.orders.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_place_order_empty_cart() {
    let ctx = create_test_ctx().await;
    let result = ctx
        .intake
        .place_order(place_request(vec![], guest_purchaser()))
        .await;
    assert!(matches!(result, Err(CheckoutError::EmptyCart)));
}

#[tokio::test]
async fn test_place_order_rejects_non_positive_quantity() {
    let ctx = create_test_ctx().await;
    let p1 = ctx.seed_product("headphones", 4999, 2).await;

    let result = ctx
        .intake
        .place_order(place_request(vec![line(&p1, 0)], guest_purchaser()))
        .await;
    assert!(matches!(
        result,
        Err(CheckoutError::InvalidQuantity { quantity: 0, .. })
    ));
    assert_eq!(ctx.stock_of(&p1).await, 2);
}

#[tokio::test]
async fn test_place_order_unknown_product() {
    let ctx = create_test_ctx().await;
    let result = ctx
        .intake
        .place_order(place_request(
            vec![line("product:doesnotexist", 1)],
            guest_purchaser(),
        ))
        .await;
    assert!(matches!(result, Err(CheckoutError::ProductNotFound(_))));
}

#[tokio::test]
async fn test_place_order_malformed_product_id() {
    let ctx = create_test_ctx().await;
    let result = ctx
        .intake
        .place_order(place_request(vec![line("???", 1)], guest_purchaser()))
        .await;
    assert!(matches!(result, Err(CheckoutError::ProductNotFound(_))));
}

#[tokio::test]
async fn test_place_order_inactive_product() {
    let ctx = create_test_ctx().await;
    let p1 = ctx.seed_product("discontinued", 999, 10).await;
    ctx.products
        .update(
            &p1,
            ProductUpdate {
                name: None,
                description: None,
                image: None,
                price: None,
                stock: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();

    let result = ctx
        .intake
        .place_order(place_request(vec![line(&p1, 1)], guest_purchaser()))
        .await;
    assert!(matches!(result, Err(CheckoutError::ProductNotFound(_))));
    assert_eq!(ctx.stock_of(&p1).await, 10);
}

#[tokio::test]
async fn test_place_order_duplicate_line_items() {
    let ctx = create_test_ctx().await;
    let p1 = ctx.seed_product("headphones", 4999, 3).await;

    let order = ctx
        .intake
        .place_order(place_request(
            vec![line(&p1, 1), line(&p1, 2)],
            guest_purchaser(),
        ))
        .await
        .unwrap();

    assert_eq!(order.items.len(), 2);
    assert_eq!(ctx.stock_of(&p1).await, 0);
}

#[tokio::test]
async fn test_place_order_stores_totals_verbatim() {
    let ctx = create_test_ctx().await;
    let p1 = ctx.seed_product("headphones", 4999, 2).await;

    let mut request = place_request(vec![line(&p1, 1)], guest_purchaser());
    // Deliberately unrelated to the line prices; totals are the caller's
    request.totals = OrderTotals {
        items_subtotal: 111,
        tax: 22,
        shipping: 33,
        grand_total: 166,
    };

    let order = ctx.intake.place_order(request).await.unwrap();
    assert_eq!(order.totals.items_subtotal, 111);
    assert_eq!(order.totals.tax, 22);
    assert_eq!(order.totals.shipping, 33);
    assert_eq!(order.totals.grand_total, 166);
}

#[tokio::test]
async fn test_place_order_sends_notification() {
    let ctx = create_test_ctx().await;
    let p1 = ctx.seed_product("headphones", 4999, 2).await;

    let order = ctx
        .intake
        .place_order(place_request(vec![line(&p1, 1)], guest_purchaser()))
        .await
        .unwrap();

    let sent = ctx.recorder.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].intent, NotificationIntent::OrderPlaced);
    assert_eq!(sent[0].recipient_email, "Jane@Example.com");
    assert_eq!(sent[0].order_id, order.id_string());
}

#[tokio::test]
async fn test_notifier_failure_does_not_fail_order() {
    let ctx = create_failing_notifier_ctx().await;
    let p1 = ctx.seed_product("headphones", 4999, 2).await;

    let order = ctx
        .intake
        .place_order(place_request(vec![line(&p1, 1)], guest_purchaser()))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(ctx.stock_of(&p1).await, 1);
}
