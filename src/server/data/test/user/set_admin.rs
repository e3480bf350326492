use super::*;

/// Tests granting admin status to a user.
///
/// Expected: Ok(true) with user admin status set to true
#[tokio::test]
async fn grants_admin_status() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;

    let repo = UserRepository::new(db);
    let updated = repo.set_admin(user.id, true).await?;

    assert!(updated);
    assert!(repo.find_by_id(user.id).await?.unwrap().admin);

    Ok(())
}

/// Tests revoking admin status from a user.
///
/// Expected: Ok(true) with user admin status set to false
#[tokio::test]
async fn revokes_admin_status() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::UserFactory::new(db).admin(true).build().await?;

    let repo = UserRepository::new(db);
    repo.set_admin(user.id, false).await?;

    assert!(!repo.find_by_id(user.id).await?.unwrap().admin);

    Ok(())
}

/// Tests setting admin for a user that does not exist.
///
/// Expected: Ok(false)
#[tokio::test]
async fn reports_missing_user() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);

    assert!(!repo.set_admin(999, true).await?);

    Ok(())
}
