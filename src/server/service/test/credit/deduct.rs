use super::*;

/// Tests that monthly credits are spent before top-up credits.
///
/// Deducts twice from a user holding one monthly and three top-up credits.
///
/// Expected: first deduction from monthly, second from top-up, balance (0, 2)
#[tokio::test]
async fn spends_monthly_before_top_up() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::UserFactory::new(db)
        .monthly_credits(1)
        .top_up_credits(3)
        .build()
        .await?;

    let service = CreditService::new(db);

    let first = service.deduct(post_deduction(user.id, None)).await?;
    assert_eq!(first.transaction.monthly_delta, -1);
    assert_eq!(first.transaction.top_up_delta, 0);
    assert!(!first.replayed);

    let second = service.deduct(post_deduction(user.id, None)).await?;
    assert_eq!(second.transaction.monthly_delta, 0);
    assert_eq!(second.transaction.top_up_delta, -1);
    assert_eq!(second.transaction.balance_after, CreditBalance::new(0, 2));

    let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(stored.balance, CreditBalance::new(0, 2));

    Ok(())
}

/// Tests that a deduction never takes the balance negative.
///
/// Expected: Err(InsufficientCredits { required: 1, available: 0 }) and no ledger row
#[tokio::test]
async fn rejects_deduction_without_credits() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;

    let result = CreditService::new(db)
        .deduct(post_deduction(user.id, None))
        .await;

    assert!(matches!(
        result,
        Err(AppError::CreditErr(CreditError::InsufficientCredits {
            required: 1,
            available: 0
        }))
    ));
    let (rows, total) = CreditTransactionRepository::new(db)
        .get_paginated_by_user(user.id, 0, 10)
        .await?;
    assert!(rows.is_empty());
    assert_eq!(total, 0);

    Ok(())
}

/// Tests that an expired trial without subscription or top-up credits blocks spending.
///
/// Expected: Err(TrialExpired)
#[tokio::test]
async fn rejects_deduction_after_trial_expired() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::UserFactory::new(db)
        .monthly_credits(5)
        .trial_expired()
        .build()
        .await?;

    let result = CreditService::new(db)
        .deduct(post_deduction(user.id, None))
        .await;

    assert!(matches!(
        result,
        Err(AppError::CreditErr(CreditError::TrialExpired))
    ));

    Ok(())
}

/// Tests that purchased top-up credits stay spendable after the trial.
///
/// Expected: Ok with the credit taken from the top-up bucket
#[tokio::test]
async fn allows_top_up_spending_after_trial() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::UserFactory::new(db)
        .top_up_credits(2)
        .trial_expired()
        .build()
        .await?;

    let deduction = CreditService::new(db)
        .deduct(post_deduction(user.id, None))
        .await?;

    assert_eq!(deduction.transaction.balance_after, CreditBalance::new(0, 1));

    Ok(())
}

/// Tests that an active subscription keeps monthly credits spendable after the trial.
///
/// Expected: Ok with the credit taken from the monthly bucket
#[tokio::test]
async fn allows_subscriber_spending_after_trial() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let plan = factory::plan::PlanFactory::new(db)
        .subscription()
        .credits(30)
        .build()
        .await?;
    let user = factory::user::UserFactory::new(db)
        .plan_id(plan.id)
        .monthly_credits(30)
        .monthly_credits_reset_at(Utc::now() + Duration::days(20))
        .trial_expired()
        .build()
        .await?;
    factory::create_subscription(db, user.id, plan.id).await?;

    let deduction = CreditService::new(db)
        .deduct(post_deduction(user.id, None))
        .await?;

    assert_eq!(deduction.transaction.balance_after, CreditBalance::new(29, 0));

    Ok(())
}

/// Tests that a repeated idempotency key returns the original deduction.
///
/// Expected: same transaction id, replayed flag set, one credit taken, usage counted once
#[tokio::test]
async fn replays_deduction_with_same_key() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user_with_credits(db, 5).await?;

    let service = CreditService::new(db);
    let first = service
        .deduct(post_deduction(user.id, Some("post-1")))
        .await?;
    let second = service
        .deduct(post_deduction(user.id, Some("post-1")))
        .await?;

    assert_eq!(first.transaction.id, second.transaction.id);
    assert!(second.replayed);

    let balance = service.balance(user.id).await?;
    assert_eq!(balance.balance, CreditBalance::new(0, 4));

    let usage = service.usage(user.id, None).await?;
    assert_eq!(usage.counters, vec![("linkedin_post".to_string(), 1)]);

    Ok(())
}

/// Tests that two users can use the same idempotency key independently.
///
/// Expected: both deductions charge their own user and neither is a replay
#[tokio::test]
async fn keys_are_scoped_to_each_user() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let first_user = factory::create_user_with_credits(db, 2).await?;
    let second_user = factory::create_user_with_credits(db, 2).await?;

    let service = CreditService::new(db);
    let first = service
        .deduct(post_deduction(first_user.id, Some("post-1")))
        .await?;
    let second = service
        .deduct(post_deduction(second_user.id, Some("post-1")))
        .await?;

    assert!(!first.replayed);
    assert!(!second.replayed);
    assert_ne!(first.transaction.id, second.transaction.id);
    assert_eq!(second.transaction.user_id, second_user.id);

    let first_balance = service.balance(first_user.id).await?;
    let second_balance = service.balance(second_user.id).await?;
    assert_eq!(first_balance.balance, CreditBalance::new(0, 1));
    assert_eq!(second_balance.balance, CreditBalance::new(0, 1));

    Ok(())
}

/// Tests that concurrent deductions cannot spend the same credit twice.
///
/// Runs two deductions at once against a single credit.
///
/// Expected: exactly one succeeds and the balance ends at zero
#[tokio::test]
async fn concurrent_deductions_do_not_double_spend() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user_with_credits(db, 1).await?;

    let service = CreditService::new(db);
    let (a, b) = tokio::join!(
        service.deduct(post_deduction(user.id, None)),
        service.deduct(post_deduction(user.id, None))
    );

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(stored.balance.available(), 0);

    Ok(())
}

/// Tests that grants cannot be charged through the deduction path.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn rejects_non_chargeable_action() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user_with_credits(db, 5).await?;

    let result = CreditService::new(db)
        .deduct(DeductCreditsParam {
            user_id: user.id,
            action: CreditAction::AdminGrant,
            idempotency_key: None,
        })
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}
