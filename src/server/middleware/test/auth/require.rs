use super::*;

/// Tests admin user successfully passes admin permission check.
///
/// Expected: Ok(User) with admin=true
#[tokio::test]
async fn grants_access_to_admin_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_credit_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::user::UserFactory::new(db)
        .name("AdminUser")
        .admin(true)
        .build()
        .await?;

    AuthSession::new(session).set_user_id(user.id).await?;

    let result = AuthGuard::new(db, session)
        .require(&[Permission::Admin])
        .await;

    assert!(result.is_ok());
    let returned_user = result.unwrap();
    assert_eq!(returned_user.id, user.id);
    assert_eq!(returned_user.name, "AdminUser");
    assert!(returned_user.admin);

    Ok(())
}

/// Tests non-admin user is denied admin permission.
///
/// Expected: Err(AuthError::AccessDenied)
#[tokio::test]
async fn denies_access_to_non_admin_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_credit_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_user(db).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let result = AuthGuard::new(db, session)
        .require(&[Permission::Admin])
        .await;

    match result {
        Err(AppError::AuthErr(AuthError::AccessDenied(user_id, message))) => {
            assert_eq!(user_id, user.id);
            assert!(message.contains("admin"));
        }
        other => panic!("Expected AccessDenied error, got: {:?}", other),
    }

    Ok(())
}

/// Tests empty permission list grants access to any signed-in user.
///
/// Expected: Ok(User)
#[tokio::test]
async fn empty_permission_list_grants_access() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_credit_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_user(db).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let returned_user = AuthGuard::new(db, session).require(&[]).await?;

    assert_eq!(returned_user.id, user.id);
    assert_eq!(returned_user.email, user.email);

    Ok(())
}

/// Tests unauthenticated request is denied.
///
/// Expected: Err(AuthError::UserNotInSession)
#[tokio::test]
async fn denies_access_when_not_authenticated() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_credit_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let result = AuthGuard::new(db, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInSession))
    ));

    Ok(())
}

/// Tests user in session but not in database is denied.
///
/// Expected: Err(AuthError::UserNotInDatabase)
#[tokio::test]
async fn denies_access_when_user_not_in_database() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_credit_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    AuthSession::new(session).set_user_id(4242).await?;

    let result = AuthGuard::new(db, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInDatabase(4242)))
    ));

    Ok(())
}

/// Tests that clearing the session signs the user out.
///
/// Expected: Err(AuthError::UserNotInSession) after clear
#[tokio::test]
async fn clear_signs_user_out() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_credit_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_user(db).await?;
    let auth_session = AuthSession::new(session);
    auth_session.set_user_id(user.id).await?;
    assert_eq!(auth_session.get_user_id().await?, Some(user.id));

    auth_session.clear().await;

    let result = AuthGuard::new(db, session).require(&[]).await;
    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInSession))
    ));

    Ok(())
}
