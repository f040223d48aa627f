//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and reach the database only through the
//! Unit of Work.

mod auth_service;
pub mod container;
mod employee_service;
mod token_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, TokenResponse};
pub use employee_service::{EmployeeManager, EmployeeRegistration, EmployeeService};
pub use token_service::{Claims, TokenIssuer};
