use super::*;

/// Tests cancelling a pending post.
///
/// Expected: post returned with status Cancelled
#[tokio::test]
async fn cancels_pending_post() -> Result<(), AppError> {
    let test = TestBuilder::new().with_posting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let post = factory::scheduled_post::ScheduledPostFactory::new(db, user.id)
        .scheduled_for(Utc::now() + Duration::hours(1))
        .build()
        .await?;
    let publisher = StubPublisher::new();

    let cancelled = ScheduledPostService::new(db, &publisher)
        .cancel(user.id, post.id)
        .await?;

    assert_eq!(cancelled.status, PostStatus::Cancelled);

    Ok(())
}

/// Tests that a post already published cannot be cancelled.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn rejects_posted_post() -> Result<(), AppError> {
    let test = TestBuilder::new().with_posting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let post = factory::scheduled_post::ScheduledPostFactory::new(db, user.id)
        .status("posted")
        .build()
        .await?;
    let publisher = StubPublisher::new();

    let result = ScheduledPostService::new(db, &publisher)
        .cancel(user.id, post.id)
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests that another user's post is reported as missing.
///
/// Expected: Err(AppError::NotFound) and the post stays pending
#[tokio::test]
async fn hides_other_users_post() -> Result<(), AppError> {
    let test = TestBuilder::new().with_posting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let owner = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    let post = factory::create_due_post(db, owner.id).await?;
    let publisher = StubPublisher::new();

    let result = ScheduledPostService::new(db, &publisher)
        .cancel(other.id, post.id)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    let stored = ScheduledPostRepository::new(db)
        .find_by_id(post.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, PostStatus::Pending);

    Ok(())
}
