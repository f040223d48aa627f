//! Employee profile entity and response types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Employee profile record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i32,
    /// Identity created alongside this profile, if any
    pub user_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub position: String,
    pub salary: Decimal,
    pub hire_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable profile fields, shared by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub position: String,
    pub salary: Decimal,
    pub hire_date: NaiveDate,
}

/// Employee representation returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "+44 20 7946 0000")]
    pub phone: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "Analyst")]
    pub position: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 85000.0)]
    pub salary: Decimal,
    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub hire_date: NaiveDate,
    pub is_active: bool,
}

impl From<Employee> for EmployeeResponse {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            phone: e.phone,
            department: e.department,
            position: e.position,
            salary: e.salary,
            hire_date: e.hire_date,
            is_active: e.is_active,
        }
    }
}
