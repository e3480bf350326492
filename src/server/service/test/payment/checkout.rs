use super::*;

/// Tests starting a paid checkout.
///
/// Expected: pending order for the full price, gateway order opened, key id returned
#[tokio::test]
async fn opens_gateway_order() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let result = PaymentService::new(db, &gateway, &config)
        .checkout(checkout_param(user.id, &plan.slug, None))
        .await?;

    assert_eq!(result.key_id, "rzp_test_key");
    assert_eq!(result.order.status, OrderStatus::Pending);
    assert_eq!(result.order.amount_cents, plan.price_cents);
    assert_eq!(result.order.discount_cents, 0);
    assert_eq!(result.order.gateway_order_id, "order_stub1");
    assert_eq!(gateway.orders_created(), 1);

    Ok(())
}

/// Tests that a coupon lowers the charged amount and reserves a redemption.
///
/// Expected: order amount discounted by 10%, coupon redemption count at one
#[tokio::test]
async fn applies_coupon_discount() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::plan::PlanFactory::new(db)
        .price_cents(10000)
        .build()
        .await?;
    let coupon = factory::create_coupon(db).await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let result = PaymentService::new(db, &gateway, &config)
        .checkout(checkout_param(user.id, &plan.slug, Some(&coupon.code)))
        .await?;

    assert_eq!(result.order.amount_cents, 9000);
    assert_eq!(result.order.discount_cents, 1000);
    assert_eq!(result.order.coupon_id, Some(coupon.id));

    let stored = CouponRepository::new(db).find_by_id(coupon.id).await?.unwrap();
    assert_eq!(stored.redemption_count, 1);

    Ok(())
}

/// Tests that a fully discounted checkout completes without the gateway.
///
/// Expected: order completed, credits granted, coupon redeemed, no gateway order
#[tokio::test]
async fn completes_free_checkout_immediately() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::plan::PlanFactory::new(db)
        .price_cents(5000)
        .credits(25)
        .build()
        .await?;
    let coupon = factory::coupon::CouponFactory::new(db)
        .percent(100)
        .build()
        .await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let result = PaymentService::new(db, &gateway, &config)
        .checkout(checkout_param(user.id, &plan.slug, Some(&coupon.code)))
        .await?;

    assert_eq!(result.order.status, OrderStatus::Completed);
    assert_eq!(result.order.amount_cents, 0);
    assert_eq!(gateway.orders_created(), 0);

    let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(stored.balance, CreditBalance::new(0, 25));
    let coupon = CouponRepository::new(db).find_by_id(coupon.id).await?.unwrap();
    assert_eq!(coupon.redemption_count, 1);

    Ok(())
}

/// Tests checkout of an unknown plan.
///
/// Expected: Err(AppError::NotFound) and no gateway order
#[tokio::test]
async fn fails_for_unknown_plan() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let result = PaymentService::new(db, &gateway, &config)
        .checkout(checkout_param(user.id, "missing", None))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(gateway.orders_created(), 0);

    Ok(())
}

/// Tests that a gateway failure leaves no order behind.
///
/// Expected: Err(AppError::Upstream) and no stored order
#[tokio::test]
async fn stores_nothing_when_gateway_fails() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let gateway = StubGateway::failing();
    let config = razorpay_config();

    let result = PaymentService::new(db, &gateway, &config)
        .checkout(checkout_param(user.id, &plan.slug, None))
        .await;

    assert!(matches!(result, Err(AppError::Upstream { .. })));
    assert!(OrderRepository::new(db).get_by_user(user.id).await?.is_empty());

    Ok(())
}

/// Tests two checkouts competing for the last redemption of a coupon.
///
/// Expected: one order created, the other Err(AppError::BadRequest), count stays at one
#[tokio::test]
async fn refuses_checkout_past_coupon_limit() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let first = factory::create_user(db).await?;
    let second = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let coupon = factory::coupon::CouponFactory::new(db)
        .max_redemptions(1)
        .build()
        .await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let service = PaymentService::new(db, &gateway, &config);
    let (a, b) = tokio::join!(
        service.checkout(checkout_param(first.id, &plan.slug, Some(&coupon.code))),
        service.checkout(checkout_param(second.id, &plan.slug, Some(&coupon.code)))
    );

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(AppError::BadRequest(_)))));

    let stored = CouponRepository::new(db).find_by_id(coupon.id).await?.unwrap();
    assert_eq!(stored.redemption_count, 1);

    Ok(())
}

/// Tests that a gateway failure gives the coupon redemption back.
///
/// Expected: Err(AppError::Upstream) and coupon redemption count back at zero
#[tokio::test]
async fn releases_coupon_when_gateway_fails() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let coupon = factory::coupon::CouponFactory::new(db)
        .max_redemptions(1)
        .build()
        .await?;
    let gateway = StubGateway::failing();
    let config = razorpay_config();

    let result = PaymentService::new(db, &gateway, &config)
        .checkout(checkout_param(user.id, &plan.slug, Some(&coupon.code)))
        .await;

    assert!(matches!(result, Err(AppError::Upstream { .. })));
    let stored = CouponRepository::new(db).find_by_id(coupon.id).await?.unwrap();
    assert_eq!(stored.redemption_count, 0);

    Ok(())
}
