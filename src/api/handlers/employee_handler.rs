//! Employee handlers.
//!
//! Reads need any valid token; mutations additionally pass the admin
//! [`RoleGate`]. Employee self-registration is public.

use axum::{
    extract::{Path, State},
    handler::Handler,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{role_gate, RoleGate};
use crate::api::AppState;
use crate::domain::{EmployeeDetails, EmployeeResponse};
use crate::errors::AppResult;
use crate::services::EmployeeRegistration;
use crate::types::{Created, NoContent};

/// Employee create/update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    #[validate(length(min = 1, max = 50, message = "First name is required (max 50 characters)"))]
    #[schema(example = "Ada")]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name is required (max 50 characters)"))]
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    #[schema(example = "+44 20 7946 0000")]
    pub phone: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "Department must be at most 50 characters"))]
    #[schema(example = "Engineering")]
    pub department: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "Position must be at most 50 characters"))]
    #[schema(example = "Analyst")]
    pub position: String,
    #[validate(custom(function = "validate_salary"))]
    #[schema(value_type = f64, example = 85000.0)]
    pub salary: Decimal,
    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub hire_date: NaiveDate,
}

impl From<EmployeeRequest> for EmployeeDetails {
    fn from(req: EmployeeRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            department: req.department,
            position: req.position,
            salary: req.salary,
            hire_date: req.hire_date,
        }
    }
}

/// Public employee registration: login credentials plus profile
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEmployeeRequest {
    #[validate(length(min = 1, max = 50, message = "Username is required (max 50 characters)"))]
    #[schema(example = "ada")]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub employee: EmployeeRequest,
}

fn validate_salary(salary: &Decimal) -> Result<(), ValidationError> {
    if salary.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("Salary must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Role-gated routes; mount behind `auth_middleware`
pub fn employee_routes() -> Router<AppState> {
    let admin = || middleware::from_fn_with_state(RoleGate::ADMIN, role_gate);

    Router::new()
        .route(
            "/employees",
            get(list_employees).post(create_employee.layer(admin())),
        )
        .route(
            "/employees/:id",
            get(get_employee)
                .put(update_employee.layer(admin()))
                .delete(delete_employee.layer(admin())),
        )
}

/// Public employee self-registration route
pub fn employee_registration_routes() -> Router<AppState> {
    Router::new().route("/employees/register", post(register_employee))
}

/// List active employees
#[utoipa::path(
    get,
    path = "/employees",
    tag = "Employees",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active employees", body = Vec<EmployeeResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_employees(State(state): State<AppState>) -> AppResult<Json<Vec<EmployeeResponse>>> {
    let employees = state.employee_service.list_employees().await?;
    Ok(Json(employees.into_iter().map(EmployeeResponse::from).collect()))
}

/// Get an active employee by ID
#[utoipa::path(
    get,
    path = "/employees/{id}",
    tag = "Employees",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<EmployeeResponse>> {
    let employee = state.employee_service.get_employee(id).await?;
    Ok(Json(EmployeeResponse::from(employee)))
}

/// Create an employee profile (admin only)
#[utoipa::path(
    post,
    path = "/employees",
    tag = "Employees",
    security(("bearer_auth" = [])),
    request_body = EmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Validation error or duplicate email"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_employee(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<EmployeeRequest>,
) -> AppResult<Created<EmployeeResponse>> {
    let employee = state.employee_service.create_employee(payload.into()).await?;
    Ok(Created(EmployeeResponse::from(employee)))
}

/// Update an employee profile (admin only)
#[utoipa::path(
    put,
    path = "/employees/{id}",
    tag = "Employees",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Employee ID")),
    request_body = EmployeeRequest,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 400, description = "Validation error or duplicate email"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<EmployeeRequest>,
) -> AppResult<Json<EmployeeResponse>> {
    let employee = state
        .employee_service
        .update_employee(id, payload.into())
        .await?;
    Ok(Json(EmployeeResponse::from(employee)))
}

/// Soft delete an employee (admin only)
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    tag = "Employees",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deactivated"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.employee_service.delete_employee(id).await?;
    Ok(NoContent)
}

/// Register an employee together with a login
#[utoipa::path(
    post,
    path = "/employees/register",
    tag = "Employees",
    request_body = RegisterEmployeeRequest,
    responses(
        (status = 201, description = "Employee registered", body = EmployeeResponse),
        (status = 400, description = "Validation error, or username/email already exists")
    )
)]
pub async fn register_employee(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterEmployeeRequest>,
) -> AppResult<Created<EmployeeResponse>> {
    let employee = state
        .employee_service
        .register_employee(EmployeeRegistration {
            username: payload.username,
            password: payload.password,
            details: payload.employee.into(),
        })
        .await?;

    Ok(Created(EmployeeResponse::from(employee)))
}
