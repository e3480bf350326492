use super::*;

/// Tests updating a draft owned by the user.
///
/// Expected: Ok(Some) with new title and content
#[tokio::test]
async fn updates_own_draft() -> Result<(), DbErr> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;

    let repo = DraftRepository::new(db);
    let created = repo.create(draft(user.id, "First")).await?;

    let updated = repo
        .update(
            created.id,
            SaveDraftParam {
                user_id: user.id,
                title: "Second".to_string(),
                content: "Rewritten".to_string(),
            },
        )
        .await?
        .unwrap();

    assert_eq!(updated.title, "Second");
    assert_eq!(updated.content, "Rewritten");
    assert!(updated.updated_at >= created.updated_at);

    Ok(())
}

/// Tests that another user's draft is invisible.
///
/// Expected: update Ok(None), delete Ok(false), draft untouched
#[tokio::test]
async fn hides_other_users_drafts() -> Result<(), DbErr> {
    let test = setup().await;
    let db = test.db.as_ref().unwrap();
    let owner = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;

    let repo = DraftRepository::new(db);
    let created = repo.create(draft(owner.id, "Mine")).await?;

    assert!(repo.update(created.id, draft(other.id, "Stolen")).await?.is_none());
    assert!(!repo.delete(created.id, other.id).await?);

    let (drafts, total) = repo.get_paginated_by_user(owner.id, 0, 10).await?;
    assert_eq!(total, 1);
    assert_eq!(drafts[0].title, "Mine");

    assert!(repo.delete(created.id, owner.id).await?);
    assert_eq!(repo.get_paginated_by_user(owner.id, 0, 10).await?.1, 0);

    Ok(())
}
