//! Shared fixtures for tests that run against an in-memory SQLite database.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use employee_management::config::JwtConfig;
use employee_management::domain::EmployeeDetails;
use employee_management::infra::{Migrator, Persistence};
use employee_management::services::{Authenticator, EmployeeManager, TokenIssuer};

/// Migrated in-memory database; a single pooled connection keeps one schema
pub async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = sea_orm::Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn tokens() -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(
        JwtConfig::new(
            "integration-secret-key-with-32-characters",
            "employee-api",
            "employee-clients",
        )
        .unwrap(),
    ))
}

pub struct Services {
    pub uow: Arc<Persistence>,
    pub auth: Authenticator<Persistence>,
    pub employees: EmployeeManager<Persistence>,
    pub tokens: Arc<TokenIssuer>,
}

pub async fn services() -> Services {
    let uow = Arc::new(Persistence::new(connect().await));
    let tokens = tokens();

    Services {
        auth: Authenticator::new(uow.clone(), tokens.clone()),
        employees: EmployeeManager::new(uow.clone()),
        uow,
        tokens,
    }
}

pub fn details(first_name: &str, email: &str) -> EmployeeDetails {
    EmployeeDetails {
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        email: email.to_string(),
        phone: "555-0100".to_string(),
        department: "Engineering".to_string(),
        position: "Developer".to_string(),
        salary: Decimal::new(7250000, 2),
        hire_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    }
}
