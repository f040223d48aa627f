//! Service Container - Centralized service access.
//!
//! Wires the Unit of Work and token issuer into every service once, so the
//! API layer only ever sees service traits.

use std::sync::Arc;

use super::{AuthService, EmployeeService, TokenIssuer};
use crate::config::JwtConfig;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get employee service
    fn employees(&self) -> Arc<dyn EmployeeService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    employee_service: Arc<dyn EmployeeService>,
}

impl Services {
    /// Create a service container from already-built services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        employee_service: Arc<dyn EmployeeService>,
    ) -> Self {
        Self {
            auth_service,
            employee_service,
        }
    }

    /// Create service container from database connection and JWT settings
    pub fn from_connection(db: sea_orm::DatabaseConnection, jwt: JwtConfig) -> Self {
        use super::{Authenticator, EmployeeManager};

        let uow = Arc::new(Persistence::new(db));
        let tokens = Arc::new(TokenIssuer::new(jwt));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), tokens)),
            employee_service: Arc::new(EmployeeManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn employees(&self) -> Arc<dyn EmployeeService> {
        self.employee_service.clone()
    }
}
