use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::Job;

use crate::server::{error::AppError, service::credit::CreditService};

/// Job refreshing every due monthly bucket at the top of each hour.
///
/// Balances are also refreshed lazily when read or spent, so this only keeps idle
/// accounts current.
pub fn job(db: DatabaseConnection) -> Result<Job, AppError> {
    let job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let db = db.clone();

        Box::pin(async move {
            match CreditService::new(&db).refresh_all_due(Utc::now()).await {
                Ok(0) => {}
                Ok(refreshed) => tracing::info!(refreshed, "Refreshed monthly credits"),
                Err(e) => tracing::error!("Error refreshing monthly credits: {}", e),
            }
        })
    })?;

    Ok(job)
}
