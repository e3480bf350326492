mod model;
mod server;

use std::sync::Arc;

use tower_http::trace::TraceLayer;

use crate::server::{
    config::Config,
    error::AppError,
    scheduler,
    service::{gateway::RazorpayGateway, linkedin::LinkedInClient},
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Arc::new(Config::from_env()?);

    let db = startup::connect_to_database(&config).await?;
    let session = startup::connect_to_session(&db, &config).await?;
    let http_client = startup::setup_reqwest_client()?;
    let cors = startup::setup_cors(&config);

    let gateway = Arc::new(RazorpayGateway::new(
        http_client.clone(),
        config.razorpay.clone(),
    ));
    let publisher = Arc::new(LinkedInClient::new(
        http_client,
        config.linkedin_api_base.clone(),
    ));

    if config.scheduler_enabled {
        scheduler::start_scheduler(db.clone(), publisher.clone()).await?;
    } else {
        tracing::info!("Scheduler disabled, waiting for external cron triggers");
    }

    let app = server::router::router()
        .with_state(AppState::new(db, gateway, publisher, config.clone()))
        .layer(session)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
