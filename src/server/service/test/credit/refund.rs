use super::*;

/// Tests that a refund returns credits to the buckets they came from.
///
/// Deducts two credits split across both buckets and refunds each deduction.
///
/// Expected: balance restored to (1, 1) and refund rows reference the deductions
#[tokio::test]
async fn restores_original_buckets() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::UserFactory::new(db)
        .monthly_credits(1)
        .top_up_credits(1)
        .monthly_credits_reset_at(Utc::now() + Duration::days(10))
        .build()
        .await?;

    let service = CreditService::new(db);
    let from_monthly = service.deduct(post_deduction(user.id, None)).await?;
    let from_top_up = service.deduct(post_deduction(user.id, None)).await?;

    let refund = service.refund(from_top_up.transaction.id).await?;
    assert_eq!(refund.action, CreditAction::Refund);
    assert_eq!(refund.reverses_id, Some(from_top_up.transaction.id));
    assert_eq!(refund.balance_after, CreditBalance::new(0, 1));

    let refund = service.refund(from_monthly.transaction.id).await?;
    assert_eq!(refund.balance_after, CreditBalance::new(1, 1));

    Ok(())
}

/// Tests that a deduction can only be refunded once.
///
/// Expected: second refund fails with AlreadyRefunded and the balance is unchanged
#[tokio::test]
async fn refunds_at_most_once() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user_with_credits(db, 3).await?;

    let service = CreditService::new(db);
    let deduction = service.deduct(post_deduction(user.id, None)).await?;

    service.refund(deduction.transaction.id).await?;
    let result = service.refund(deduction.transaction.id).await;

    assert!(matches!(
        result,
        Err(AppError::CreditErr(CreditError::AlreadyRefunded(id))) if id == deduction.transaction.id
    ));
    let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(stored.balance, CreditBalance::new(0, 3));

    Ok(())
}

/// Tests that grants cannot be refunded.
///
/// Expected: Err(NotRefundable)
#[tokio::test]
async fn rejects_refund_of_grant() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;

    let service = CreditService::new(db);
    let grant = service
        .grant_top_up(GrantCreditsParam {
            user_id: user.id,
            amount: 5,
            action: CreditAction::AdminGrant,
        })
        .await?;

    let result = service.refund(grant.id).await;

    assert!(matches!(
        result,
        Err(AppError::CreditErr(CreditError::NotRefundable(_)))
    ));

    Ok(())
}

/// Tests refunding a transaction that does not exist.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn fails_for_unknown_transaction() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let result = CreditService::new(db).refund(999).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests refunding a monthly deduction after the monthly bucket expired.
///
/// Expected: the monthly credit comes back as top-up and the monthly bucket stays empty
#[tokio::test]
async fn refunds_expired_monthly_credits_to_top_up() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::UserFactory::new(db)
        .monthly_credits(2)
        .monthly_credits_reset_at(Utc::now() + Duration::days(1))
        .build()
        .await?;

    let service = CreditService::new(db);
    let deduction = service.deduct(post_deduction(user.id, None)).await?;
    assert_eq!(deduction.transaction.balance_after, CreditBalance::new(1, 0));

    let expired = service
        .refresh_monthly(user.id, Utc::now() + Duration::days(2))
        .await?;
    assert_eq!(expired.balance, CreditBalance::new(0, 0));
    assert!(expired.monthly_credits_reset_at.is_none());

    let refund = service.refund(deduction.transaction.id).await?;
    assert_eq!(refund.balance_after, CreditBalance::new(0, 1));

    let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(stored.balance, CreditBalance::new(0, 1));

    Ok(())
}
