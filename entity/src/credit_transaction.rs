use sea_orm::entity::prelude::*;

/// Append-only ledger row. Written in the same transaction as the balance change.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "credit_transaction")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub action: String,
    pub delta: i64,
    pub monthly_delta: i64,
    pub top_up_delta: i64,
    pub monthly_after: i64,
    pub top_up_after: i64,
    pub balance_after: i64,
    /// Stored as `{user_id}:{key}`, so the same key can be reused by different users.
    #[sea_orm(unique)]
    pub idempotency_key: Option<String>,
    /// Set on refunds; unique so a deduction can only be reversed once.
    #[sea_orm(unique)]
    pub reverses_id: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
