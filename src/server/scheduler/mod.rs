//! Background jobs run in-process with `tokio-cron-scheduler`.
//!
//! - `scheduled_posts` publishes due posts every minute
//! - `monthly_credits` refreshes due monthly buckets every hour
//!
//! Both jobs can be disabled with `SCHEDULER_ENABLED=false` when an external timer
//! calls the cron endpoint instead.

pub mod monthly_credits;
pub mod scheduled_posts;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::JobScheduler;

use crate::server::{error::AppError, service::linkedin::SocialPublisher};

/// Registers every job and starts the scheduler.
///
/// # Arguments
/// - `db` - Database connection
/// - `publisher` - LinkedIn publisher for scheduled posts
pub async fn start_scheduler(
    db: DatabaseConnection,
    publisher: Arc<dyn SocialPublisher>,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    scheduler
        .add(scheduled_posts::job(db.clone(), publisher)?)
        .await?;
    scheduler.add(monthly_credits::job(db)?).await?;
    scheduler.start().await?;

    tracing::info!("Scheduler started");

    Ok(())
}
