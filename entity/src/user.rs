use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub admin: bool,
    pub top_up_credits: i64,
    pub monthly_credits: i64,
    pub monthly_credits_reset_at: Option<DateTimeUtc>,
    pub trial_started_at: DateTimeUtc,
    pub trial_days: i32,
    pub plan_id: Option<i32>,
    pub linkedin_urn: Option<String>,
    pub linkedin_access_token: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan::Entity",
        from = "Column::PlanId",
        to = "super::plan::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Plan,
    #[sea_orm(has_many = "super::credit_transaction::Entity")]
    CreditTransaction,
    #[sea_orm(has_many = "super::scheduled_post::Entity")]
    ScheduledPost,
    #[sea_orm(has_many = "super::draft::Entity")]
    Draft,
}

impl Related<super::plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl Related<super::credit_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditTransaction.def()
    }
}

impl Related<super::scheduled_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduledPost.def()
    }
}

impl Related<super::draft::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Draft.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
