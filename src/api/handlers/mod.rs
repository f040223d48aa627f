//! HTTP request handlers.

pub mod auth_handler;
pub mod employee_handler;

pub use auth_handler::auth_routes;
pub use employee_handler::{employee_registration_routes, employee_routes};
