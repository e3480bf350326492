//! Type-safe session management wrapper.
//!
//! `AuthSession` is the only code that reads or writes the session's user id. Keeping
//! the key and its type in one place prevents typos and keeps the stored value an
//! `i32` everywhere.

use tower_sessions::Session;

use crate::server::error::AppError;

const SESSION_AUTH_USER_ID: &str = "auth:user";

/// Authentication session management.
///
/// Handles the signed-in user's id and the session lifecycle.
pub struct AuthSession<'a> {
    session: &'a Session,
}

impl<'a> AuthSession<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Stores the signed-in user's id.
    ///
    /// Cycles the session id before storing.
    ///
    /// # Returns
    /// - `Ok(())` - User id stored
    /// - `Err(AppError::SessionErr(_))` - Failed to store in session
    pub async fn set_user_id(&self, user_id: i32) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        self.session.insert(SESSION_AUTH_USER_ID, user_id).await?;
        Ok(())
    }

    /// Retrieves the signed-in user's id.
    ///
    /// # Returns
    /// - `Ok(Some(user_id))` - User is signed in
    /// - `Ok(None)` - No user in session
    /// - `Err(AppError::SessionErr(_))` - Failed to read the session
    pub async fn get_user_id(&self) -> Result<Option<i32>, AppError> {
        let user_id = self.session.get::<i32>(SESSION_AUTH_USER_ID).await?;
        Ok(user_id)
    }

    /// Clears all session data, signing the user out.
    pub async fn clear(&self) {
        self.session.clear().await;
    }
}
