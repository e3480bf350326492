use super::*;

/// Tests publishing a due post.
///
/// Expected: post marked posted with the LinkedIn id and ledger row, one credit taken
#[tokio::test]
async fn publishes_due_post() -> Result<(), AppError> {
    let test = TestBuilder::new().with_posting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::UserFactory::new(db)
        .top_up_credits(3)
        .with_linkedin()
        .build()
        .await?;
    let post = factory::create_due_post(db, user.id).await?;
    let publisher = StubPublisher::new();

    let report = ScheduledPostService::new(db, &publisher)
        .process_due(Utc::now(), 50)
        .await?;

    assert_eq!(report.processed, 1);
    assert_eq!(report.posted, 1);
    assert_eq!(report.failed, 0);

    let stored = ScheduledPostRepository::new(db)
        .find_by_id(post.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, PostStatus::Posted);
    assert_eq!(stored.linkedin_post_id.as_deref(), Some("urn:li:share:1"));
    assert!(stored.credit_transaction_id.is_some());

    let user = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(user.balance, CreditBalance::new(0, 2));

    Ok(())
}

/// Tests that posts not yet due are left alone.
///
/// Expected: nothing processed and the post stays pending
#[tokio::test]
async fn skips_future_posts() -> Result<(), AppError> {
    let test = TestBuilder::new().with_posting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::UserFactory::new(db)
        .top_up_credits(3)
        .with_linkedin()
        .build()
        .await?;
    let post = factory::scheduled_post::ScheduledPostFactory::new(db, user.id)
        .scheduled_for(Utc::now() + Duration::hours(1))
        .build()
        .await?;
    let publisher = StubPublisher::new();

    let report = ScheduledPostService::new(db, &publisher)
        .process_due(Utc::now(), 50)
        .await?;

    assert_eq!(report.processed, 0);
    let stored = ScheduledPostRepository::new(db)
        .find_by_id(post.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, PostStatus::Pending);

    Ok(())
}

/// Tests that a post whose owner cannot pay fails without publishing.
///
/// Expected: post failed with a reason, nothing published
#[tokio::test]
async fn fails_post_without_credits() -> Result<(), AppError> {
    let test = TestBuilder::new().with_posting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::UserFactory::new(db)
        .with_linkedin()
        .build()
        .await?;
    let post = factory::create_due_post(db, user.id).await?;
    let publisher = StubPublisher::new();

    let report = ScheduledPostService::new(db, &publisher)
        .process_due(Utc::now(), 50)
        .await?;

    assert_eq!(report.failed, 1);
    assert!(publisher.published().is_empty());

    let stored = ScheduledPostRepository::new(db)
        .find_by_id(post.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, PostStatus::Failed);
    assert!(stored.last_error.is_some());
    assert_eq!(stored.credit_transaction_id, None);

    Ok(())
}

/// Tests that a post whose owner disconnected LinkedIn fails.
///
/// Expected: post failed and no credit taken
#[tokio::test]
async fn fails_post_without_linkedin() -> Result<(), AppError> {
    let test = TestBuilder::new().with_posting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user_with_credits(db, 3).await?;
    let post = factory::create_due_post(db, user.id).await?;
    let publisher = StubPublisher::new();

    let report = ScheduledPostService::new(db, &publisher)
        .process_due(Utc::now(), 50)
        .await?;

    assert_eq!(report.failed, 1);
    let stored = ScheduledPostRepository::new(db)
        .find_by_id(post.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, PostStatus::Failed);

    let user = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(user.balance.available(), 3);

    Ok(())
}

/// Tests that a LinkedIn failure refunds the scheduled post's credit.
///
/// Expected: post failed referencing the deduction, balance restored
#[tokio::test]
async fn refunds_when_publish_fails() -> Result<(), AppError> {
    let test = TestBuilder::new().with_posting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::UserFactory::new(db)
        .top_up_credits(1)
        .with_linkedin()
        .build()
        .await?;
    let post = factory::create_due_post(db, user.id).await?;
    let publisher = StubPublisher::failing();

    let report = ScheduledPostService::new(db, &publisher)
        .process_due(Utc::now(), 50)
        .await?;

    assert_eq!(report.failed, 1);
    let stored = ScheduledPostRepository::new(db)
        .find_by_id(post.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, PostStatus::Failed);
    assert!(stored.credit_transaction_id.is_some());

    let user = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(user.balance, CreditBalance::new(0, 1));

    Ok(())
}

/// Tests that the batch respects its limit.
///
/// Expected: two of three due posts processed, the third still pending
#[tokio::test]
async fn respects_limit() -> Result<(), AppError> {
    let test = TestBuilder::new().with_posting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::UserFactory::new(db)
        .top_up_credits(5)
        .with_linkedin()
        .build()
        .await?;
    for _ in 0..3 {
        factory::create_due_post(db, user.id).await?;
    }
    let publisher = StubPublisher::new();

    let service = ScheduledPostService::new(db, &publisher);
    let report = service.process_due(Utc::now(), 2).await?;
    assert_eq!(report.posted, 2);

    let report = service.process_due(Utc::now(), 2).await?;
    assert_eq!(report.posted, 1);

    Ok(())
}

/// Tests that a claim left in processing is put back in the queue.
///
/// Expected: post recovered and published in the same pass, charged once
#[tokio::test]
async fn requeues_stale_claim() -> Result<(), AppError> {
    let test = TestBuilder::new().with_posting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::UserFactory::new(db)
        .top_up_credits(3)
        .with_linkedin()
        .build()
        .await?;
    let post = factory::scheduled_post::ScheduledPostFactory::new(db, user.id)
        .scheduled_for(Utc::now() - Duration::hours(1))
        .status("processing")
        .attempts(1)
        .updated_at(Utc::now() - Duration::minutes(30))
        .build()
        .await?;
    let publisher = StubPublisher::new();

    let report = ScheduledPostService::new(db, &publisher)
        .process_due(Utc::now(), 50)
        .await?;

    assert_eq!(report.recovered, 1);
    assert_eq!(report.posted, 1);

    let stored = ScheduledPostRepository::new(db)
        .find_by_id(post.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, PostStatus::Posted);

    let user = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(user.balance, CreditBalance::new(0, 2));

    Ok(())
}

/// Tests that a claim out of attempts is failed and its charge returned.
///
/// Expected: post failed, nothing published, credit refunded
#[tokio::test]
async fn fails_and_refunds_exhausted_claim() -> Result<(), AppError> {
    let test = TestBuilder::new().with_posting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::UserFactory::new(db)
        .top_up_credits(3)
        .with_linkedin()
        .build()
        .await?;
    let post = factory::scheduled_post::ScheduledPostFactory::new(db, user.id)
        .scheduled_for(Utc::now() - Duration::hours(1))
        .status("processing")
        .attempts(3)
        .updated_at(Utc::now() - Duration::minutes(30))
        .build()
        .await?;
    let charge = CreditService::new(db)
        .deduct(DeductCreditsParam {
            user_id: user.id,
            action: CreditAction::LinkedInPost,
            idempotency_key: Some(format!("scheduled-post:{}", post.id)),
        })
        .await?;
    let publisher = StubPublisher::new();

    let report = ScheduledPostService::new(db, &publisher)
        .process_due(Utc::now(), 50)
        .await?;

    assert_eq!(report.recovered, 1);
    assert_eq!(report.posted, 0);
    assert!(publisher.published().is_empty());

    let stored = ScheduledPostRepository::new(db)
        .find_by_id(post.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, PostStatus::Failed);
    assert!(stored.last_error.is_some());
    assert_eq!(stored.credit_transaction_id, Some(charge.transaction.id));

    let user = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(user.balance, CreditBalance::new(0, 3));

    Ok(())
}

/// Tests that a claim still within its window is left to its worker.
///
/// Expected: nothing recovered and the post stays processing
#[tokio::test]
async fn leaves_recent_claim() -> Result<(), AppError> {
    let test = TestBuilder::new().with_posting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::UserFactory::new(db)
        .top_up_credits(3)
        .with_linkedin()
        .build()
        .await?;
    let post = factory::scheduled_post::ScheduledPostFactory::new(db, user.id)
        .scheduled_for(Utc::now() - Duration::hours(1))
        .status("processing")
        .attempts(1)
        .updated_at(Utc::now() - Duration::minutes(2))
        .build()
        .await?;
    let publisher = StubPublisher::new();

    let report = ScheduledPostService::new(db, &publisher)
        .process_due(Utc::now(), 50)
        .await?;

    assert_eq!(report.recovered, 0);
    assert_eq!(report.processed, 0);

    let stored = ScheduledPostRepository::new(db)
        .find_by_id(post.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, PostStatus::Processing);

    Ok(())
}
