use super::*;

/// Tests pagination with multiple pages.
///
/// Verifies that the repository returns the requested slice and the total number
/// of users, not the number of pages.
///
/// Expected: Ok with 2 users per page and total of 5
#[tokio::test]
async fn returns_correct_page_of_users() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    for _ in 0..5 {
        factory::create_user(db).await?;
    }

    let repo = UserRepository::new(db);
    let (users, total) = repo.get_all_paginated(0, 2).await?;
    assert_eq!(users.len(), 2);
    assert_eq!(total, 5);

    let (users, _) = repo.get_all_paginated(2, 2).await?;
    assert_eq!(users.len(), 1);

    Ok(())
}

/// Tests pagination with empty database.
///
/// Expected: Ok with empty vector and zero total
#[tokio::test]
async fn returns_empty_for_no_users() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let (users, total) = repo.get_all_paginated(0, 10).await?;

    assert!(users.is_empty());
    assert_eq!(total, 0);

    Ok(())
}
