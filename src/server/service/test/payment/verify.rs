use super::*;

/// Tests confirming a top-up purchase with a valid signature.
///
/// Expected: order completed and the plan's credits added to the top-up bucket
#[tokio::test]
async fn grants_top_up_credits() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user_with_credits(db, 3).await?;
    let plan = factory::plan::PlanFactory::new(db).credits(50).build().await?;
    let order = factory::create_order(db, user.id, &plan).await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let outcome = PaymentService::new(db, &gateway, &config)
        .verify(signed_verification(user.id, &order.gateway_order_id, "pay_1"))
        .await?;

    assert!(matches!(outcome, CompletionOutcome::Completed(_)));
    assert_eq!(outcome.order().status, OrderStatus::Completed);

    let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(stored.balance, CreditBalance::new(0, 53));

    Ok(())
}

/// Tests that a forged signature is rejected.
///
/// Expected: Err(PaymentError::InvalidSignature) and the order stays pending
#[tokio::test]
async fn rejects_invalid_signature() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let order = factory::create_order(db, user.id, &plan).await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let mut param = signed_verification(user.id, &order.gateway_order_id, "pay_1");
    param.gateway_payment_id = "pay_forged".to_string();
    let result = PaymentService::new(db, &gateway, &config).verify(param).await;

    assert!(matches!(
        result,
        Err(AppError::PaymentErr(PaymentError::InvalidSignature(_)))
    ));
    let stored = OrderRepository::new(db).find_by_id(order.id).await?.unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);

    Ok(())
}

/// Tests that verifying the same payment twice grants once.
///
/// Expected: second call reports AlreadyCompleted and the balance is unchanged
#[tokio::test]
async fn grants_once_when_verified_twice() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::plan::PlanFactory::new(db).credits(20).build().await?;
    let order = factory::create_order(db, user.id, &plan).await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let service = PaymentService::new(db, &gateway, &config);
    service
        .verify(signed_verification(user.id, &order.gateway_order_id, "pay_1"))
        .await?;
    let outcome = service
        .verify(signed_verification(user.id, &order.gateway_order_id, "pay_1"))
        .await?;

    assert!(matches!(outcome, CompletionOutcome::AlreadyCompleted(_)));
    let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(stored.balance, CreditBalance::new(0, 20));
    assert_eq!(service.list_payments(user.id).await?.len(), 1);

    Ok(())
}

/// Tests that a user cannot complete someone else's order.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn rejects_other_users_order() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let owner = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let order = factory::create_order(db, owner.id, &plan).await?;
    let gateway = StubGateway::new();
    let config = razorpay_config();

    let result = PaymentService::new(db, &gateway, &config)
        .verify(signed_verification(other.id, &order.gateway_order_id, "pay_1"))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
