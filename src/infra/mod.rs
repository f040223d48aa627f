//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and startup seeding
//! - SeaORM repositories
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod seed;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{EmployeeRepository, EmployeeStore, IdentityRepository, IdentityStore};
pub use seed::seed_admin;
pub use unit_of_work::{
    Persistence, TransactionContext, TxEmployeeRepository, TxFuture, TxIdentityRepository,
    UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockEmployeeRepository, MockIdentityRepository};
