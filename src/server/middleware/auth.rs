//! Request authorization for user sessions and service-to-service callers.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use sea_orm::DatabaseConnection;
use subtle::ConstantTimeEq;
use tower_sessions::Session;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    middleware::session::AuthSession,
    model::user::User,
};

pub enum Permission {
    Admin,
}

pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    session: &'a Session,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, session: &'a Session) -> Self {
        Self { db, session }
    }

    /// Resolves the signed-in user and checks every permission in `permissions`.
    ///
    /// # Returns
    /// - `Ok(User)` - Signed-in user holding all permissions
    /// - `Err(AuthError::UserNotInSession)` - Not signed in
    /// - `Err(AuthError::UserNotInDatabase)` - Session references a deleted user
    /// - `Err(AuthError::AccessDenied)` - A permission is missing
    pub async fn require(&self, permissions: &[Permission]) -> Result<User, AppError> {
        let Some(user_id) = AuthSession::new(self.session).get_user_id().await? else {
            return Err(AuthError::UserNotInSession.into());
        };

        let Some(user) = UserRepository::new(self.db).find_by_id(user_id).await? else {
            return Err(AuthError::UserNotInDatabase(user_id).into());
        };

        for permission in permissions {
            match permission {
                Permission::Admin => {
                    if !user.admin {
                        return Err(AuthError::AccessDenied(
                            user_id,
                            "User attempted an admin action without admin permissions"
                                .to_string(),
                        )
                        .into());
                    }
                }
            }
        }

        Ok(user)
    }
}

/// Checks the `Authorization: Bearer <secret>` header of a service-to-service call.
///
/// # Arguments
/// - `headers` - Request headers
/// - `secret` - Expected shared secret
/// - `caller` - Caller name used in the error, e.g. `cron`
///
/// # Returns
/// - `Ok(())` - Header carries the expected secret
/// - `Err(AuthError::InvalidServiceSecret)` - Header missing or wrong
pub fn require_service_secret(
    headers: &HeaderMap,
    secret: &str,
    caller: &'static str,
) -> Result<(), AppError> {
    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    match provided {
        Some(token) if !secret.is_empty() && constant_time_eq(token.as_bytes(), secret.as_bytes()) => {
            Ok(())
        }
        _ => Err(AuthError::InvalidServiceSecret(caller).into()),
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
