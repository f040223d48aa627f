//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Authentication & Security
// =============================================================================

/// Token lifetime in hours. Fixed, tokens are never refreshed or revoked.
pub const TOKEN_TTL_HOURS: i64 = 1;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Uniform failure message for every rejected login
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Message returned for username/email collisions
pub const DUPLICATE_IDENTITY_MESSAGE: &str = "Username or email already exists";

/// Message returned when an employee profile email is taken
pub const DUPLICATE_EMPLOYEE_EMAIL_MESSAGE: &str = "Employee email already exists";

// =============================================================================
// Roles
// =============================================================================

/// Default role assigned to new identities
pub const ROLE_USER: &str = "User";

/// Administrator role with write access to employee records
pub const ROLE_ADMIN: &str = "Admin";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_ADMIN];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

// =============================================================================
// Seeding
// =============================================================================

/// Username of the administrator created at startup
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Email of the administrator created at startup
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
