//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, employee_handler};
use crate::domain::EmployeeResponse;
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the Employee Management API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Management API",
        version = "0.1.0",
        description = "Employee records with JWT authentication and role-based access",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // Employee endpoints
        employee_handler::list_employees,
        employee_handler::get_employee,
        employee_handler::create_employee,
        employee_handler::update_employee,
        employee_handler::delete_employee,
        employee_handler::register_employee,
    ),
    components(
        schemas(
            EmployeeResponse,
            MessageResponse,
            TokenResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            employee_handler::EmployeeRequest,
            employee_handler::RegisterEmployeeRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Employees", description = "Employee records")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
