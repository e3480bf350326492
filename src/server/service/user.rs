//! User service for business logic.
//!
//! This module provides the `UserService` for managing user-related business logic.
//! It creates accounts on first sign-in with their trial credits, serves profiles and
//! handles admin management while working with domain models rather than DTOs.

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::server::{
    config::TrialConfig,
    data::{is_unique_violation, user::UserRepository},
    error::AppError,
    model::{
        credit::{CreditAction, CreditTransaction, GrantCreditsParam},
        user::{
            CreateUserParam, GetAllUsersParam, LinkedInAccount, PaginatedUsers, SetAdminParam,
            User,
        },
    },
    service::credit::{ledger::Ledger, CreditService},
};

/// Service providing business logic for user management.
///
/// This struct holds a reference to the database connection and provides methods
/// for account creation, user queries, admin management and admin credit grants.
pub struct UserService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `UserService` - New service instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the user signing in by email, creating the account on first sign-in.
    ///
    /// New accounts start a trial window of `trial.days` and receive `trial.credits`
    /// top-up credits recorded as a `TrialGrant` in the ledger. Existing accounts are
    /// returned unchanged.
    ///
    /// # Arguments
    /// - `email` - Verified email from the auth provider, matched case-insensitively
    /// - `name` - Display name used for new accounts
    /// - `trial` - Trial length and credits for new accounts
    ///
    /// # Returns
    /// - `Ok(User)` - The existing or newly created user
    /// - `Err(AppError::BadRequest)` - Email is not plausible
    /// - `Err(AppError::DbErr)` - Database error during lookup or creation
    pub async fn get_or_create(
        &self,
        email: &str,
        name: &str,
        trial: TrialConfig,
    ) -> Result<User, AppError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::BadRequest(format!("Invalid email address '{}'", email)));
        }

        if let Some(user) = UserRepository::new(self.db).find_by_email(email).await? {
            return Ok(user);
        }

        let txn = self.db.begin().await?;
        let user_repo = UserRepository::new(&txn);

        let param = CreateUserParam {
            email: email.to_string(),
            name: name.trim().to_string(),
            trial_days: trial.days,
        };
        let created = match user_repo.create(param).await {
            Ok(user) => user,
            Err(ref e) if is_unique_violation(e) => {
                // Signed in concurrently; the other request created the account.
                txn.rollback().await?;
                return UserRepository::new(self.db)
                    .find_by_email(email)
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError(format!("User {} vanished after insert", email))
                    });
            }
            Err(e) => return Err(e.into()),
        };

        if trial.credits > 0 {
            Ledger::new(&txn)
                .add_top_up(created.id, trial.credits, CreditAction::TrialGrant)
                .await?;
        }

        let user = user_repo
            .find_by_id(created.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", created.id)))?;

        txn.commit().await?;

        tracing::info!(
            user_id = user.id,
            trial_days = trial.days,
            trial_credits = trial.credits,
            "Created user"
        );

        Ok(user)
    }

    /// Retrieves a user by id.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - User found
    /// - `Ok(None)` - No user with that id
    /// - `Err(AppError::DbErr)` - Database error during query
    pub async fn get_user(&self, user_id: i32) -> Result<Option<User>, AppError> {
        let user_repo = UserRepository::new(self.db);
        let user = user_repo.find_by_id(user_id).await?;
        Ok(user)
    }

    /// Profile of the signed-in user with any due monthly refresh applied.
    pub async fn me(&self, user_id: i32) -> Result<User, AppError> {
        CreditService::new(self.db)
            .refresh_monthly(user_id, chrono::Utc::now())
            .await
    }

    /// Retrieves all users with pagination.
    ///
    /// Returns a paginated collection of users ordered by id. Calculates total pages
    /// based on the per_page parameter and total user count.
    ///
    /// # Arguments
    /// - `param` - Parameters specifying page number and users per page
    ///
    /// # Returns
    /// - `Ok(PaginatedUsers)` - Users for the requested page with pagination metadata
    /// - `Err(AppError::DbErr)` - Database error during pagination query
    pub async fn get_all_users(&self, param: GetAllUsersParam) -> Result<PaginatedUsers, AppError> {
        let user_repo = UserRepository::new(self.db);

        let (users, total_items) = user_repo
            .get_all_paginated(param.page, param.per_page)
            .await?;

        let total_pages = (total_items as f64 / param.per_page as f64).ceil() as u64;

        Ok(PaginatedUsers {
            users,
            total: total_items,
            page: param.page,
            per_page: param.per_page,
            total_pages,
        })
    }

    /// Grants or revokes admin privileges.
    ///
    /// # Returns
    /// - `Ok(())` - Admin status updated
    /// - `Err(AppError::NotFound)` - User with specified id does not exist
    /// - `Err(AppError::DbErr)` - Database error during update
    pub async fn set_admin(&self, param: SetAdminParam) -> Result<(), AppError> {
        let user_repo = UserRepository::new(self.db);

        if !user_repo.set_admin(param.user_id, param.is_admin).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!(user_id = param.user_id, admin = param.is_admin, "Updated admin status");

        Ok(())
    }

    /// Links the LinkedIn member the auth backend signed the user in with.
    ///
    /// Passing `None` disconnects the account.
    ///
    /// # Returns
    /// - `Ok(User)` - The user with the new LinkedIn link
    /// - `Err(AppError::BadRequest)` - Member URN or access token is empty
    /// - `Err(AppError::NotFound)` - User does not exist
    pub async fn link_linkedin(
        &self,
        user_id: i32,
        account: Option<LinkedInAccount>,
    ) -> Result<User, AppError> {
        if let Some(account) = &account {
            if account.urn.trim().is_empty() || account.access_token.trim().is_empty() {
                return Err(AppError::BadRequest(
                    "LinkedIn member URN and access token are required".to_string(),
                ));
            }
        }

        let user_repo = UserRepository::new(self.db);
        if !user_repo.set_linkedin_account(user_id, account).await? {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    /// Adds top-up credits to a user on behalf of an admin.
    ///
    /// # Returns
    /// - `Ok(CreditTransaction)` - The `AdminGrant` ledger row
    /// - `Err(AppError::BadRequest)` - Amount is not positive
    /// - `Err(AppError::NotFound)` - User does not exist
    pub async fn grant_credits(&self, user_id: i32, amount: i64) -> Result<CreditTransaction, AppError> {
        let transaction = CreditService::new(self.db)
            .grant_top_up(GrantCreditsParam {
                user_id,
                amount,
                action: CreditAction::AdminGrant,
            })
            .await?;

        tracing::info!(user_id, amount, "Granted credits");

        Ok(transaction)
    }
}
