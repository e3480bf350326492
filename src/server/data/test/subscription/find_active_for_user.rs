use super::*;

/// Tests finding the subscription that covers now.
///
/// Expected: Ok(Some) while the period runs, Ok(None) after it ends
#[tokio::test]
async fn respects_period_end() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_plan, user, subscription) = factory::helpers::create_subscriber(db, 30).await?;

    let repo = SubscriptionRepository::new(db);
    let now = Utc::now();

    let active = repo.find_active_for_user(user.id, now).await?;
    assert_eq!(active.map(|s| s.id), Some(subscription.id));

    let later = now + Duration::days(30);
    assert!(repo.find_active_for_user(user.id, later).await?.is_none());

    Ok(())
}

/// Tests that cancelled subscriptions are ignored.
///
/// Expected: Ok(None) after the status is set to cancelled
#[tokio::test]
async fn ignores_cancelled_subscription() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_plan, user, subscription) = factory::helpers::create_subscriber(db, 30).await?;

    let repo = SubscriptionRepository::new(db);
    repo.set_status(subscription.id, SubscriptionStatus::Cancelled)
        .await?;

    assert!(repo.find_active_for_user(user.id, Utc::now()).await?.is_none());

    Ok(())
}
