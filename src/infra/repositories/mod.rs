//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod employee_repository;
pub(crate) mod entities;
mod identity_repository;

pub use employee_repository::{EmployeeRepository, EmployeeStore};
pub use identity_repository::{IdentityRepository, IdentityStore};

pub(crate) use employee_repository::query as employee_query;
pub(crate) use identity_repository::query as identity_query;

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use employee_repository::MockEmployeeRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use identity_repository::MockIdentityRepository;
