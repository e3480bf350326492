use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::server::model::order::{Order, Payment};

pub struct PaymentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PaymentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Records the captured payment for a completed order.
    pub async fn create(&self, order: &Order, gateway_payment_id: &str) -> Result<Payment, DbErr> {
        let entity = entity::payment::ActiveModel {
            order_id: ActiveValue::Set(order.id),
            user_id: ActiveValue::Set(order.user_id),
            gateway_payment_id: ActiveValue::Set(gateway_payment_id.to_string()),
            amount_cents: ActiveValue::Set(order.amount_cents),
            currency: ActiveValue::Set(order.currency.clone()),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Payment::from_entity(entity))
    }

    /// A user's payments, newest first.
    pub async fn get_by_user(&self, user_id: i32) -> Result<Vec<Payment>, DbErr> {
        let payments = entity::prelude::Payment::find()
            .filter(entity::payment::Column::UserId.eq(user_id))
            .order_by_desc(entity::payment::Column::CreatedAt)
            .order_by_desc(entity::payment::Column::Id)
            .all(self.db)
            .await?;

        Ok(payments.into_iter().map(Payment::from_entity).collect())
    }
}
