use super::*;

/// Tests that repeated increments accumulate in one counter row.
///
/// Expected: Ok with count 3 for linkedin_post and 1 for scheduled_post
#[tokio::test]
async fn accumulates_per_action() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;

    let repo = UsageCounterRepository::new(db);
    for _ in 0..3 {
        repo.increment(user.id, "2026-10", "linkedin_post").await?;
    }
    repo.increment(user.id, "2026-10", "scheduled_post").await?;

    let counters = repo.get_by_user_month(user.id, "2026-10").await?;

    assert_eq!(
        counters,
        vec![
            ("linkedin_post".to_string(), 3),
            ("scheduled_post".to_string(), 1)
        ]
    );

    Ok(())
}

/// Tests that counters are kept separately per month.
///
/// Expected: Ok with empty counters for a month with no activity
#[tokio::test]
async fn separates_months() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;

    let repo = UsageCounterRepository::new(db);
    repo.increment(user.id, "2026-09", "linkedin_post").await?;

    assert!(repo.get_by_user_month(user.id, "2026-10").await?.is_empty());
    assert_eq!(repo.get_by_user_month(user.id, "2026-09").await?.len(), 1);

    Ok(())
}
