//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction.
//!
//! The state includes:
//! - Database connection pool for data persistence
//! - Payment gateway used to open orders
//! - LinkedIn publisher used by immediate and scheduled posts
//! - Application configuration with secrets and trial settings

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::{
    config::Config,
    service::{gateway::PaymentGateway, linkedin::SocialPublisher},
};

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone: `DatabaseConnection` is a pool handle and the rest
/// are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing persistent storage.
    pub db: DatabaseConnection,

    /// Payment gateway client.
    pub gateway: Arc<dyn PaymentGateway>,

    /// Publishes posts to LinkedIn on the user's behalf.
    pub publisher: Arc<dyn SocialPublisher>,

    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `gateway` - Payment gateway client
    /// - `publisher` - LinkedIn publisher
    /// - `config` - Application configuration
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(
        db: DatabaseConnection,
        gateway: Arc<dyn PaymentGateway>,
        publisher: Arc<dyn SocialPublisher>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            db,
            gateway,
            publisher,
            config,
        }
    }
}
