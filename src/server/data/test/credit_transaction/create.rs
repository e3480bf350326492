use super::*;

/// Tests appending a ledger row.
///
/// Verifies that the total delta and balance snapshot are derived from the
/// bucket deltas.
///
/// Expected: Ok with delta -1 and balance_after 6
#[tokio::test]
async fn derives_delta_and_snapshot() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;

    let repo = CreditTransactionRepository::new(db);
    let tx = repo.create(deduction(user.id, None)).await?;

    assert_eq!(tx.delta, -1);
    assert_eq!(tx.balance_after, CreditBalance::new(4, 2));
    assert_eq!(tx.action, CreditAction::LinkedInPost);
    assert!(tx.is_deduction());

    let stored = repo.find_by_id(tx.id).await?.unwrap();
    assert_eq!(stored, tx);

    Ok(())
}

/// Tests that an idempotency key can only be used once.
///
/// Expected: second insert fails with a unique violation
#[tokio::test]
async fn rejects_reused_idempotency_key() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;

    let repo = CreditTransactionRepository::new(db);
    repo.create(deduction(user.id, Some("post-1"))).await?;

    let result = repo.create(deduction(user.id, Some("post-1"))).await;

    assert!(matches!(result, Err(AppError::DbErr(ref e)) if is_unique_violation(e)));

    Ok(())
}

/// Tests that a deduction can be reversed only once.
///
/// Expected: second refund row for the same deduction fails with a unique violation
#[tokio::test]
async fn rejects_second_reversal() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;

    let repo = CreditTransactionRepository::new(db);
    let original = repo.create(deduction(user.id, None)).await?;

    let refund = NewCreditTransaction {
        user_id: user.id,
        action: CreditAction::Refund,
        monthly_delta: 1,
        top_up_delta: 0,
        balance_after: CreditBalance::new(5, 2),
        idempotency_key: None,
        reverses_id: Some(original.id),
    };
    let first = repo.create(refund.clone()).await?;
    let second = repo.create(refund).await;

    assert!(!first.is_deduction());
    assert!(matches!(second, Err(AppError::DbErr(ref e)) if is_unique_violation(e)));
    assert_eq!(
        repo.find_reversal_of(original.id).await?.map(|t| t.id),
        Some(first.id)
    );

    Ok(())
}

/// Tests that idempotency keys are unique per user, not globally.
///
/// Expected: both users store the key and read it back unprefixed
#[tokio::test]
async fn allows_same_key_for_different_users() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let first_user = factory::create_user(db).await?;
    let second_user = factory::create_user(db).await?;

    let repo = CreditTransactionRepository::new(db);
    let first = repo.create(deduction(first_user.id, Some("post-1"))).await?;
    let second = repo.create(deduction(second_user.id, Some("post-1"))).await?;

    assert_ne!(first.id, second.id);
    assert_eq!(first.idempotency_key.as_deref(), Some("post-1"));
    assert_eq!(second.idempotency_key.as_deref(), Some("post-1"));

    let found = repo
        .find_by_idempotency_key(second_user.id, "post-1")
        .await?
        .unwrap();
    assert_eq!(found, second);

    Ok(())
}
