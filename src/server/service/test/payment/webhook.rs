use super::*;

fn signed(body: &serde_json::Value) -> (Vec<u8>, String) {
    let body = serde_json::to_vec(body).unwrap();
    let signature = signature::sign("webhook_secret", &body);
    (body, signature)
}

fn captured(gateway_order_id: &str, payment_id: &str) -> serde_json::Value {
    json!({
        "event": "payment.captured",
        "payload": {
            "payment": {
                "entity": { "id": payment_id, "order_id": gateway_order_id }
            }
        }
    })
}

fn failed(gateway_order_id: &str) -> serde_json::Value {
    json!({
        "event": "payment.failed",
        "payload": {
            "payment": {
                "entity": { "id": "pay_failed", "order_id": gateway_order_id }
            }
        }
    })
}

/// Tests that a captured payment webhook completes the order.
///
/// Expected: Processed, order completed and credits granted
#[tokio::test]
async fn completes_order_on_capture() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::plan::PlanFactory::new(db).credits(15).build().await?;
    let order = factory::create_order(db, user.id, &plan).await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let (body, sig) = signed(&captured(&order.gateway_order_id, "pay_hook"));
    let outcome = PaymentService::new(db, &gateway, &config)
        .webhook(&body, Some(&sig))
        .await?;

    assert_eq!(outcome, WebhookOutcome::Processed);
    let stored = OrderRepository::new(db).find_by_id(order.id).await?.unwrap();
    assert_eq!(stored.status, OrderStatus::Completed);
    let user = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(user.balance, CreditBalance::new(0, 15));

    Ok(())
}

/// Tests that the webhook and the client verify together grant once.
///
/// Expected: verify after the webhook reports AlreadyCompleted, credits granted once
#[tokio::test]
async fn webhook_then_verify_grants_once() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::plan::PlanFactory::new(db).credits(15).build().await?;
    let order = factory::create_order(db, user.id, &plan).await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let service = PaymentService::new(db, &gateway, &config);
    let (body, sig) = signed(&captured(&order.gateway_order_id, "pay_1"));
    service.webhook(&body, Some(&sig)).await?;

    let outcome = service
        .verify(signed_verification(user.id, &order.gateway_order_id, "pay_1"))
        .await?;

    assert!(matches!(outcome, CompletionOutcome::AlreadyCompleted(_)));
    let user = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(user.balance, CreditBalance::new(0, 15));

    Ok(())
}

/// Tests that a failed payment marks the order failed and a later capture still completes it.
///
/// Expected: Processed twice, order Completed with credits granted
#[tokio::test]
async fn completes_order_after_failed_attempt() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::plan::PlanFactory::new(db).credits(5).build().await?;
    let order = factory::create_order(db, user.id, &plan).await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let service = PaymentService::new(db, &gateway, &config);

    let (body, sig) = signed(&failed(&order.gateway_order_id));
    assert_eq!(
        service.webhook(&body, Some(&sig)).await?,
        WebhookOutcome::Processed
    );
    let stored = OrderRepository::new(db).find_by_id(order.id).await?.unwrap();
    assert_eq!(stored.status, OrderStatus::Failed);

    let (body, sig) = signed(&captured(&order.gateway_order_id, "pay_retry"));
    assert_eq!(
        service.webhook(&body, Some(&sig)).await?,
        WebhookOutcome::Processed
    );
    let stored = OrderRepository::new(db).find_by_id(order.id).await?.unwrap();
    assert_eq!(stored.status, OrderStatus::Completed);

    Ok(())
}

/// Tests that unrelated events and unknown orders are acknowledged without changes.
///
/// Expected: Ignored for both deliveries
#[tokio::test]
async fn ignores_unknown_events_and_orders() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let service = PaymentService::new(db, &gateway, &config);

    let (body, sig) = signed(&json!({ "event": "refund.created", "payload": {} }));
    assert_eq!(
        service.webhook(&body, Some(&sig)).await?,
        WebhookOutcome::Ignored
    );

    let (body, sig) = signed(&captured("order_elsewhere", "pay_elsewhere"));
    assert_eq!(
        service.webhook(&body, Some(&sig)).await?,
        WebhookOutcome::Ignored
    );

    Ok(())
}

/// Tests that deliveries with a missing or wrong signature are rejected.
///
/// Expected: Err(PaymentError::InvalidWebhookSignature) and the order stays pending
#[tokio::test]
async fn rejects_bad_signature() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let order = factory::create_order(db, user.id, &plan).await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let service = PaymentService::new(db, &gateway, &config);
    let (body, _) = signed(&captured(&order.gateway_order_id, "pay_1"));
    let forged = signature::sign("not_the_secret", &body);

    let result = service.webhook(&body, Some(&forged)).await;
    assert!(matches!(
        result,
        Err(AppError::PaymentErr(PaymentError::InvalidWebhookSignature))
    ));

    let result = service.webhook(&body, None).await;
    assert!(matches!(
        result,
        Err(AppError::PaymentErr(PaymentError::InvalidWebhookSignature))
    ));

    let stored = OrderRepository::new(db).find_by_id(order.id).await?.unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);

    Ok(())
}

/// Tests that a signed body that is not an event is rejected.
///
/// Expected: Err(PaymentError::MalformedWebhook)
#[tokio::test]
async fn rejects_malformed_body() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let body = b"not json".to_vec();
    let sig = signature::sign("webhook_secret", &body);
    let result = PaymentService::new(db, &gateway, &config)
        .webhook(&body, Some(&sig))
        .await;

    assert!(matches!(
        result,
        Err(AppError::PaymentErr(PaymentError::MalformedWebhook(_)))
    ));

    Ok(())
}

/// Tests that a failed payment gives back the coupon and a later capture takes it again.
///
/// Expected: redemption count drops to zero on failure and is back at one once paid
#[tokio::test]
async fn releases_coupon_on_failed_payment() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let coupon = factory::coupon::CouponFactory::new(db)
        .max_redemptions(1)
        .redemption_count(1)
        .build()
        .await?;
    let order = factory::order::OrderFactory::new(db, user.id, &plan)
        .coupon_id(coupon.id)
        .build()
        .await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let service = PaymentService::new(db, &gateway, &config);
    let coupons = CouponRepository::new(db);

    let (body, sig) = signed(&failed(&order.gateway_order_id));
    service.webhook(&body, Some(&sig)).await?;
    assert_eq!(coupons.find_by_id(coupon.id).await?.unwrap().redemption_count, 0);

    let (body, sig) = signed(&captured(&order.gateway_order_id, "pay_retry"));
    service.webhook(&body, Some(&sig)).await?;
    assert_eq!(coupons.find_by_id(coupon.id).await?.unwrap().redemption_count, 1);

    let stored = OrderRepository::new(db).find_by_id(order.id).await?.unwrap();
    assert_eq!(stored.status, OrderStatus::Completed);

    Ok(())
}
