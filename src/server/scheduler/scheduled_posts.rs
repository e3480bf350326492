use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::Job;

use crate::server::{
    error::AppError,
    service::{linkedin::SocialPublisher, scheduled_post::ScheduledPostService},
};

/// Due posts handled per run.
const BATCH_SIZE: u64 = 50;

/// Job publishing due scheduled posts at the start of every minute.
pub fn job(db: DatabaseConnection, publisher: Arc<dyn SocialPublisher>) -> Result<Job, AppError> {
    let job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let db = db.clone();
        let publisher = publisher.clone();

        Box::pin(async move {
            if let Err(e) = process_scheduled_posts(&db, publisher.as_ref()).await {
                tracing::error!("Error processing scheduled posts: {}", e);
            }
        })
    })?;

    Ok(job)
}

async fn process_scheduled_posts(
    db: &DatabaseConnection,
    publisher: &dyn SocialPublisher,
) -> Result<(), AppError> {
    ScheduledPostService::new(db, publisher)
        .process_due(Utc::now(), BATCH_SIZE)
        .await?;

    Ok(())
}
