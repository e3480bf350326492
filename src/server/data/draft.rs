use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::draft::{Draft, SaveDraftParam};

pub struct DraftRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DraftRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: SaveDraftParam) -> Result<Draft, DbErr> {
        let now = Utc::now();

        let entity = entity::draft::ActiveModel {
            user_id: ActiveValue::Set(param.user_id),
            title: ActiveValue::Set(param.title),
            content: ActiveValue::Set(param.content),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Draft::from_entity(entity))
    }

    /// Recently edited drafts first.
    pub async fn get_paginated_by_user(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Draft>, u64), DbErr> {
        let paginator = entity::prelude::Draft::find()
            .filter(entity::draft::Column::UserId.eq(user_id))
            .order_by_desc(entity::draft::Column::UpdatedAt)
            .order_by_desc(entity::draft::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let drafts = paginator
            .fetch_page(page)
            .await?
            .into_iter()
            .map(Draft::from_entity)
            .collect();

        Ok((drafts, total))
    }

    /// Replaces title and content of a draft owned by `param.user_id`.
    ///
    /// # Returns
    /// - `Ok(Some(Draft))` - Updated draft
    /// - `Ok(None)` - No draft with that id belongs to the user
    pub async fn update(&self, id: i32, param: SaveDraftParam) -> Result<Option<Draft>, DbErr> {
        let Some(existing) = entity::prelude::Draft::find_by_id(id)
            .filter(entity::draft::Column::UserId.eq(param.user_id))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: entity::draft::ActiveModel = existing.into();
        active.title = ActiveValue::Set(param.title);
        active.content = ActiveValue::Set(param.content);
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Ok(Some(Draft::from_entity(entity)))
    }

    /// Deletes a draft owned by `user_id`, returning whether one was removed.
    pub async fn delete(&self, id: i32, user_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Draft::delete_many()
            .filter(entity::draft::Column::Id.eq(id))
            .filter(entity::draft::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
