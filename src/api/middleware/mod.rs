//! API middleware.

mod auth;
mod role_gate;

pub use auth::{auth_middleware, CurrentUser};
pub use role_gate::{role_gate, RoleGate};
