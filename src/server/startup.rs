use std::time::Duration;

use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_sessions::{cookie::SameSite, session_store::ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::EnvFilter;

use crate::server::{config::Config, error::AppError};

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);
const EXPIRED_SESSION_SWEEP: Duration = Duration::from_secs(60 * 60);

/// Installs the global tracing subscriber.
///
/// Filters come from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the database
/// schema is up-to-date. This function must complete successfully before the application can
/// access the database.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(Error)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Creates the session layer backed by the application database.
///
/// Sessions expire after seven days of inactivity. Cookies are marked secure when the
/// application is served over https. Expired sessions are swept hourly in the background.
///
/// # Returns
/// - `Ok(SessionManagerLayer)` - Layer ready to wrap the router
/// - `Err(AppError::SqlxErr)` - Failed to create the session table
pub async fn connect_to_session(
    db: &DatabaseConnection,
    config: &Config,
) -> Result<SessionManagerLayer<SqliteStore>, AppError> {
    let pool = db.get_sqlite_connection_pool();
    let session_store = SqliteStore::new(pool.clone());
    session_store.migrate().await?;

    let sweeper = session_store.clone();
    tokio::spawn(async move {
        if let Err(e) = sweeper
            .continuously_delete_expired(EXPIRED_SESSION_SWEEP)
            .await
        {
            tracing::error!("Expired session cleanup stopped: {}", e);
        }
    });

    let session = SessionManagerLayer::new(session_store)
        .with_secure(config.app_url.starts_with("https://"))
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(7)));

    Ok(session)
}

/// Builds the HTTP client used for the payment gateway and LinkedIn.
///
/// Redirects are disabled and every request is bounded by a timeout.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(HTTP_TIMEOUT)
        .build()?;

    Ok(client)
}

/// Builds the CORS layer for the web front end.
///
/// Allows credentialed requests from `ALLOWED_ORIGINS`, or from `APP_URL` when no
/// origins are configured. Origins that are not valid header values are skipped
/// with a warning.
pub fn setup_cors(config: &Config) -> CorsLayer {
    let configured = if config.allowed_origins.is_empty() {
        std::slice::from_ref(&config.app_url)
    } else {
        config.allowed_origins.as_slice()
    };

    let origins: Vec<HeaderValue> = configured
        .iter()
        .filter_map(|origin| match origin.trim_end_matches('/').parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, "Skipping invalid CORS origin: {}", e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60))
}
