use super::*;

/// Tests selecting due posts.
///
/// Creates posts in the past, in the future, and a past post that was already
/// posted.
///
/// Expected: Ok with only the pending past posts, oldest first
#[tokio::test]
async fn returns_pending_past_posts_oldest_first() -> Result<(), AppError> {
    let test = TestBuilder::new().with_posting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    let now = Utc::now();

    let newer = factory::scheduled_post::ScheduledPostFactory::new(db, user.id)
        .scheduled_for(now - Duration::minutes(1))
        .build()
        .await?;
    let older = factory::scheduled_post::ScheduledPostFactory::new(db, user.id)
        .scheduled_for(now - Duration::hours(1))
        .build()
        .await?;
    factory::scheduled_post::ScheduledPostFactory::new(db, user.id)
        .scheduled_for(now + Duration::hours(1))
        .build()
        .await?;
    factory::scheduled_post::ScheduledPostFactory::new(db, user.id)
        .scheduled_for(now - Duration::hours(2))
        .status("posted")
        .build()
        .await?;

    let repo = ScheduledPostRepository::new(db);
    let due = repo.get_due(now, 10).await?;

    assert_eq!(
        due.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![older.id, newer.id]
    );

    let limited = repo.get_due(now, 1).await?;
    assert_eq!(limited.len(), 1);

    Ok(())
}
