//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AuthService, ProjectService, ServiceContainer, Services, TokenService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Project service
    pub project_service: Arc<dyn ProjectService>,
    /// Token verification for the auth middleware
    pub token_service: Arc<dyn TokenService>,
    /// Database connection
    pub database: Arc<Database>,
    /// Upper bound on request handling time
    pub request_timeout: Duration,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: container.auth(),
            project_service: container.projects(),
            token_service: container.tokens(),
            database,
            request_timeout: Duration::from_secs(config.request_timeout_seconds),
        }
    }
}
