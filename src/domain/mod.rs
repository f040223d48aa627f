//! Domain layer - Core business entities and logic
//!
//! Identities (login credentials and roles), employee profiles and the
//! password value object. Nothing here touches HTTP or the database.

pub mod employee;
pub mod identity;
pub mod password;

pub use employee::{Employee, EmployeeDetails, EmployeeResponse};
pub use identity::{Identity, NewIdentity, Role};
pub use password::Password;
