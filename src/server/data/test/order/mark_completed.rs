use super::*;

/// Tests that only the first completion wins.
///
/// Simulates the verify call and the webhook both completing the same order.
///
/// Expected: first call Ok(true), second call Ok(false), status completed
#[tokio::test]
async fn completes_pending_order_once() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let order = factory::create_order(db, user.id, &plan).await?;

    let repo = OrderRepository::new(db);

    assert!(repo.mark_completed(order.id, Utc::now()).await?);
    assert!(!repo.mark_completed(order.id, Utc::now()).await?);

    let order = repo.find_by_id(order.id).await?.unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert!(order.completed_at.is_some());

    Ok(())
}

/// Tests that a completed order cannot be marked failed afterwards.
///
/// Expected: Ok(false) and status still completed
#[tokio::test]
async fn does_not_fail_completed_order() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let order = factory::order::OrderFactory::new(db, user.id, &plan)
        .status("completed")
        .build()
        .await?;

    let repo = OrderRepository::new(db);

    assert!(!repo.mark_failed(order.id).await?);
    assert_eq!(
        repo.find_by_id(order.id).await?.unwrap().status,
        OrderStatus::Completed
    );

    Ok(())
}

/// Tests that an order can only have one payment recorded.
///
/// Expected: second payment insert for the same order fails
#[tokio::test]
async fn records_single_payment_per_order() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let order = factory::create_order(db, user.id, &plan).await?;
    let order = OrderRepository::new(db).find_by_id(order.id).await?.unwrap();

    let payments = PaymentRepository::new(db);
    let payment = payments.create(&order, "pay_1").await?;

    assert_eq!(payment.amount_cents, order.amount_cents);
    assert!(payments.create(&order, "pay_2").await.is_err());
    assert_eq!(payments.get_by_user(user.id).await?.len(), 1);

    Ok(())
}

/// Tests that a later successful payment completes an order a failed attempt marked failed.
///
/// Expected: Ok(true) and status completed
#[tokio::test]
async fn completes_previously_failed_order() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let order = factory::create_order(db, user.id, &plan).await?;

    let repo = OrderRepository::new(db);

    assert!(repo.mark_failed(order.id).await?);
    assert!(repo.mark_completed(order.id, Utc::now()).await?);
    assert_eq!(
        repo.find_by_id(order.id).await?.unwrap().status,
        OrderStatus::Completed
    );

    Ok(())
}
