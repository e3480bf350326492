use super::*;

/// Tests that buying a subscription starts it with a monthly grant.
///
/// Expected: active subscription, plan attached, monthly bucket filled, reset scheduled
#[tokio::test]
async fn starts_subscription() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user_with_credits(db, 4).await?;
    let plan = factory::plan::PlanFactory::new(db)
        .subscription()
        .credits(60)
        .build()
        .await?;
    let order = factory::create_order(db, user.id, &plan).await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    PaymentService::new(db, &gateway, &config)
        .complete_order(&order.gateway_order_id, "pay_sub")
        .await?;

    let now = Utc::now();
    let subscription = SubscriptionRepository::new(db)
        .find_active_for_user(user.id, now)
        .await?
        .unwrap();
    assert_eq!(subscription.plan_id, plan.id);

    let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(stored.balance, CreditBalance::new(60, 4));
    assert_eq!(stored.plan_id, Some(plan.id));
    assert_eq!(
        stored.monthly_credits_reset_at,
        Some(subscription.current_period_end)
    );

    Ok(())
}

/// Tests that renewing the same plan extends the period without a new grant.
///
/// Expected: period end pushed out, monthly bucket unchanged
#[tokio::test]
async fn renewal_extends_period() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (plan, user, subscription) = factory::helpers::create_subscriber(db, 30).await?;
    let order = factory::create_order(db, user.id, &plan).await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    PaymentService::new(db, &gateway, &config)
        .complete_order(&order.gateway_order_id, "pay_renew")
        .await?;

    let renewed = SubscriptionRepository::new(db)
        .find_active_for_user(user.id, Utc::now())
        .await?
        .unwrap();
    assert_eq!(renewed.id, subscription.id);
    assert!(renewed.current_period_end > subscription.current_period_end);

    let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(stored.balance, CreditBalance::new(30, 0));

    Ok(())
}

/// Tests that an order for an unknown gateway id cannot be completed.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn fails_for_unknown_order() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let result = PaymentService::new(db, &gateway, &config)
        .complete_order("order_unknown", "pay_1")
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
