use super::*;

async fn place_order_with(ctx: &TestCtx, purchaser: Purchaser) -> String {
    let p1 = ctx.seed_product("headphones", 4999, 10).await;
    let order = ctx
        .intake
        .place_order(place_request(vec![line(&p1, 1)], purchaser))
        .await
        .unwrap();
    order.id_string()
}

#[tokio::test]
async fn test_verify_email_is_case_insensitive() {
    let ctx = create_test_ctx().await;
    // Guest email stored as "Jane@Example.com"
    let order_id = place_order_with(&ctx, guest_purchaser()).await;

    let order = ctx
        .verifier
        .verify(&order_id, "jane@example.com", "")
        .await
        .unwrap();
    assert_eq!(order.id_string(), order_id);

    let order = ctx
        .verifier
        .verify(&order_id, "JANE@EXAMPLE.COM", "")
        .await
        .unwrap();
    assert_eq!(order.id_string(), order_id);
}

#[tokio::test]
async fn test_verify_wrong_email_is_mismatch() {
    let ctx = create_test_ctx().await;
    let order_id = place_order_with(&ctx, guest_purchaser()).await;

    let result = ctx.verifier.verify(&order_id, "wrong@x.com", "").await;
    assert!(matches!(result, Err(CheckoutError::VerificationMismatch)));
}

#[tokio::test]
async fn test_verify_phone_is_exact() {
    let ctx = create_test_ctx().await;
    let order_id = place_order_with(&ctx, guest_purchaser()).await;

    // Wrong email but right phone: inclusive-or, either is enough
    let order = ctx
        .verifier
        .verify(&order_id, "wrong@x.com", "555-0100")
        .await
        .unwrap();
    assert_eq!(order.id_string(), order_id);

    // Phone comparison has no normalization
    let result = ctx.verifier.verify(&order_id, "", "5550100").await;
    assert!(matches!(result, Err(CheckoutError::VerificationMismatch)));
}

#[tokio::test]
async fn test_verify_empty_claims_never_match() {
    let ctx = create_test_ctx().await;
    let order_id = place_order_with(&ctx, guest_purchaser()).await;

    let result = ctx.verifier.verify(&order_id, "", "").await;
    assert!(matches!(result, Err(CheckoutError::VerificationMismatch)));
}

#[tokio::test]
async fn test_verify_unknown_and_malformed_ids() {
    let ctx = create_test_ctx().await;

    let result = ctx
        .verifier
        .verify("order:doesnotexist", "jane@example.com", "")
        .await;
    assert!(matches!(result, Err(CheckoutError::OrderNotFound(_))));

    let result = ctx.verifier.verify("!!!", "jane@example.com", "").await;
    assert!(matches!(result, Err(CheckoutError::OrderNotFound(_))));
}

#[tokio::test]
async fn test_verify_registered_order() {
    let ctx = create_test_ctx().await;
    let order_id =
        place_order_with(&ctx, registered_purchaser("user-9", "bob@example.com")).await;

    // Registered snapshot email works
    let order = ctx
        .verifier
        .verify(&order_id, "BOB@example.com", "")
        .await
        .unwrap();
    assert_eq!(order.id_string(), order_id);

    // Phone captured on the checkout form works too
    let order = ctx
        .verifier
        .verify(&order_id, "", "555-0200")
        .await
        .unwrap();
    assert_eq!(order.id_string(), order_id);
}

#[tokio::test]
async fn test_find_for_purchaser_dual_match() {
    let ctx = create_test_ctx().await;
    let p1 = ctx.seed_product("headphones", 4999, 10).await;

    // Checked out as guest first...
    let guest = Purchaser::Guest {
        name: "Bob Smith".into(),
        email: "Bob@Example.com".into(),
        phone: "555-0200".into(),
    };
    let first = ctx
        .intake
        .place_order(place_request(vec![line(&p1, 1)], guest))
        .await
        .unwrap();

    // created_at is the sort key; keep the two orders apart
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    // ...then registered with the same email
    let second = ctx
        .intake
        .place_order(place_request(
            vec![line(&p1, 1)],
            registered_purchaser("user-9", "bob@example.com"),
        ))
        .await
        .unwrap();

    let orders = ctx
        .orders
        .find_for_purchaser(Some("user-9"), "bob@example.com")
        .await
        .unwrap();

    // Both surface, newest first
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id_string(), second.id_string());
    assert_eq!(orders[1].id_string(), first.id_string());
}

#[tokio::test]
async fn test_find_for_purchaser_does_not_leak_other_guests() {
    let ctx = create_test_ctx().await;
    let p1 = ctx.seed_product("headphones", 4999, 10).await;

    ctx.intake
        .place_order(place_request(vec![line(&p1, 1)], guest_purchaser()))
        .await
        .unwrap();

    let orders = ctx
        .orders
        .find_for_purchaser(Some("user-9"), "bob@example.com")
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_find_all_newest_first() {
    let ctx = create_test_ctx().await;
    let p1 = ctx.seed_product("headphones", 4999, 10).await;

    let first = ctx
        .intake
        .place_order(place_request(vec![line(&p1, 1)], guest_purchaser()))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let second = ctx
        .intake
        .place_order(place_request(vec![line(&p1, 1)], guest_purchaser()))
        .await
        .unwrap();

    let orders = ctx.orders.find_all().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id_string(), second.id_string());
    assert_eq!(orders[1].id_string(), first.id_string());
}
