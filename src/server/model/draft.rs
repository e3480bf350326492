use chrono::{DateTime, Utc};

use crate::{
    model::draft::{DraftDto, PaginatedDraftsDto},
    server::error::AppError,
};

const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    pub fn into_dto(self) -> DraftDto {
        DraftDto {
            id: self.id,
            title: self.title,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn from_entity(entity: entity::draft::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            title: entity.title,
            content: entity.content,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Title and body for creating or replacing a draft.
#[derive(Debug, Clone)]
pub struct SaveDraftParam {
    pub user_id: i32,
    pub title: String,
    pub content: String,
}

impl SaveDraftParam {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.chars().count() > MAX_TITLE_CHARS {
            return Err(AppError::BadRequest(format!(
                "Draft title cannot exceed {} characters",
                MAX_TITLE_CHARS
            )));
        }
        if self.title.trim().is_empty() && self.content.trim().is_empty() {
            return Err(AppError::BadRequest("Draft cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedDrafts {
    pub drafts: Vec<Draft>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl PaginatedDrafts {
    pub fn into_dto(self) -> PaginatedDraftsDto {
        PaginatedDraftsDto {
            drafts: self.drafts.into_iter().map(|d| d.into_dto()).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}
