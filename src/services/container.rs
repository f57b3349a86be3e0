//! Service Container - Centralized service access.
//!
//! SOLID (DIP): Depends on service traits, not implementations.

use std::sync::Arc;

use super::{AuthService, ProjectService, TokenService};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get project service
    fn projects(&self) -> Arc<dyn ProjectService>;

    /// Get token service (used by the auth middleware)
    fn tokens(&self) -> Arc<dyn TokenService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    project_service: Arc<dyn ProjectService>,
    token_service: Arc<dyn TokenService>,
}

impl Services {
    /// Create a service container from already built services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        project_service: Arc<dyn ProjectService>,
        token_service: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            auth_service,
            project_service,
            token_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        use super::{Authenticator, JwtTokenService, ProjectManager};

        let uow = Arc::new(Persistence::new(db));
        let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), token_service.clone()));
        let project_service = Arc::new(ProjectManager::new(uow));

        Self::new(auth_service, project_service, token_service)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn projects(&self) -> Arc<dyn ProjectService> {
        self.project_service.clone()
    }

    fn tokens(&self) -> Arc<dyn TokenService> {
        self.token_service.clone()
    }
}
