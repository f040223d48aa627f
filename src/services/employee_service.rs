//! Employee service - profile CRUD and combined employee registration.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{DUPLICATE_EMPLOYEE_EMAIL_MESSAGE, DUPLICATE_IDENTITY_MESSAGE};
use crate::domain::{Employee, EmployeeDetails, NewIdentity, Password, Role};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Identity credentials plus the profile created with them.
///
/// The profile email doubles as the identity email.
#[derive(Debug, Clone)]
pub struct EmployeeRegistration {
    pub username: String,
    pub password: String,
    pub details: EmployeeDetails,
}

/// Employee service trait for dependency injection.
///
/// Reads only return active profiles.
#[async_trait]
pub trait EmployeeService: Send + Sync {
    /// List active employees
    async fn list_employees(&self) -> AppResult<Vec<Employee>>;

    /// Get an active employee by ID
    async fn get_employee(&self, id: i32) -> AppResult<Employee>;

    /// Create a profile without a login
    async fn create_employee(&self, details: EmployeeDetails) -> AppResult<Employee>;

    /// Replace the writable fields of an active profile
    async fn update_employee(&self, id: i32, details: EmployeeDetails) -> AppResult<Employee>;

    /// Soft delete a profile and deactivate its linked identity
    async fn delete_employee(&self, id: i32) -> AppResult<()>;

    /// Create identity and profile atomically
    async fn register_employee(&self, registration: EmployeeRegistration) -> AppResult<Employee>;
}

/// Concrete implementation of EmployeeService using Unit of Work.
pub struct EmployeeManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> EmployeeManager<U> {
    /// Create new employee service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> EmployeeService for EmployeeManager<U> {
    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        self.uow.employees().list_active().await
    }

    async fn get_employee(&self, id: i32) -> AppResult<Employee> {
        self.uow
            .employees()
            .find_active_by_id(id)
            .await?
            .ok_or_not_found()
    }

    async fn create_employee(&self, details: EmployeeDetails) -> AppResult<Employee> {
        let employees = self.uow.employees();
        if employees.email_taken(&details.email, None).await? {
            return Err(AppError::conflict(DUPLICATE_EMPLOYEE_EMAIL_MESSAGE));
        }

        let employee = employees.create(details, None).await?;
        tracing::info!(id = employee.id, "Employee created");
        Ok(employee)
    }

    async fn update_employee(&self, id: i32, details: EmployeeDetails) -> AppResult<Employee> {
        let employees = self.uow.employees();
        employees.find_active_by_id(id).await?.ok_or_not_found()?;

        if employees.email_taken(&details.email, Some(id)).await? {
            return Err(AppError::conflict(DUPLICATE_EMPLOYEE_EMAIL_MESSAGE));
        }

        employees.update(id, details).await
    }

    async fn delete_employee(&self, id: i32) -> AppResult<()> {
        with_transaction!(self.uow, |ctx| {
            let employee = ctx.employees().deactivate(id).await?;
            if let Some(user_id) = employee.user_id {
                ctx.identities().deactivate(user_id).await?;
            }
            tracing::info!(id, user_id = ?employee.user_id, "Employee deactivated");
            Ok(())
        })
    }

    async fn register_employee(&self, registration: EmployeeRegistration) -> AppResult<Employee> {
        let EmployeeRegistration {
            username,
            password,
            details,
        } = registration;

        // Hash outside the transaction so no connection is held during argon2
        let password = Password::hash_blocking(password).await?;

        let employee = with_transaction!(self.uow, |ctx| {
            let identities = ctx.identities();
            let employees = ctx.employees();

            if identities
                .exists_by_username_or_email(&username, &details.email)
                .await?
            {
                return Err(AppError::conflict(DUPLICATE_IDENTITY_MESSAGE));
            }
            if employees.email_taken(&details.email, None).await? {
                return Err(AppError::conflict(DUPLICATE_EMPLOYEE_EMAIL_MESSAGE));
            }

            let identity = identities
                .create(NewIdentity {
                    username,
                    email: details.email.clone(),
                    password_hash: password.into_string(),
                    role: Role::User,
                })
                .await?;

            employees.create(details, Some(identity.id)).await
        })?;

        tracing::info!(id = employee.id, user_id = ?employee.user_id, "Employee registered");
        Ok(employee)
    }
}
