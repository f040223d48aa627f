//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::JwtConfig;
use crate::infra::Database;
use crate::services::{AuthService, EmployeeService, ServiceContainer, Services};

/// Application state shared by every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Employee service
    pub employee_service: Arc<dyn EmployeeService>,
    /// Database handle, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Build state with services wired through the service container.
    pub fn from_config(database: Arc<Database>, jwt: JwtConfig) -> Self {
        let container = Services::from_connection(database.get_connection(), jwt);

        Self {
            auth_service: container.auth(),
            employee_service: container.employees(),
            database,
        }
    }

    /// Create state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        employee_service: Arc<dyn EmployeeService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            employee_service,
            database,
        }
    }
}
