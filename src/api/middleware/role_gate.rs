//! Declarative role requirements.
//!
//! Each gated handler carries a [`RoleGate`] listing the roles it accepts;
//! the single [`role_gate`] middleware evaluates it after authentication.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::CurrentUser;
use crate::domain::Role;
use crate::errors::AppError;

/// Set of roles permitted to run an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoleGate {
    allowed: &'static [Role],
}

impl RoleGate {
    /// Administrators only
    pub const ADMIN: RoleGate = RoleGate::new(&[Role::Admin]);

    pub const fn new(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    /// Unknown roles are never permitted.
    pub fn permits(&self, role: Option<Role>) -> bool {
        role.is_some_and(|r| self.allowed.contains(&r))
    }

    /// Check an authenticated caller against this gate.
    pub fn check(&self, user: &CurrentUser) -> Result<(), AppError> {
        if self.permits(user.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

/// Role gate middleware.
///
/// Must run inside [`super::auth_middleware`]; a request without a
/// `CurrentUser` is treated as unauthenticated.
pub async fn role_gate(
    State(gate): State<RoleGate>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;

    if let Err(e) = gate.check(user) {
        tracing::warn!(
            user_id = user.id,
            role = ?user.role,
            path = %request.uri().path(),
            "Role gate rejected request"
        );
        return Err(e);
    }

    Ok(next.run(request).await)
}
