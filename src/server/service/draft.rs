//! Draft service for the user's unpublished posts.

use sea_orm::DatabaseConnection;

use crate::server::{
    data::draft::DraftRepository,
    error::AppError,
    model::draft::{Draft, PaginatedDrafts, SaveDraftParam},
};

pub struct DraftService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DraftService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: SaveDraftParam) -> Result<Draft, AppError> {
        param.validate()?;
        let draft = DraftRepository::new(self.db).create(param).await?;
        Ok(draft)
    }

    /// The user's drafts, most recently edited first.
    pub async fn list(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<PaginatedDrafts, AppError> {
        let (drafts, total) = DraftRepository::new(self.db)
            .get_paginated_by_user(user_id, page, per_page)
            .await?;

        let total_pages = (total as f64 / per_page as f64).ceil() as u64;

        Ok(PaginatedDrafts {
            drafts,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    /// Replaces a draft's title and content.
    ///
    /// # Returns
    /// - `Ok(Draft)` - The updated draft
    /// - `Err(AppError::NotFound)` - No draft with that id belongs to the user
    pub async fn update(&self, id: i32, param: SaveDraftParam) -> Result<Draft, AppError> {
        param.validate()?;
        DraftRepository::new(self.db)
            .update(id, param)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Draft {} not found", id)))
    }

    pub async fn delete(&self, user_id: i32, id: i32) -> Result<(), AppError> {
        if !DraftRepository::new(self.db).delete(id, user_id).await? {
            return Err(AppError::NotFound(format!("Draft {} not found", id)));
        }
        Ok(())
    }
}
