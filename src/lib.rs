//! Employee Management API
//!
//! CRUD service for employee records with JWT bearer authentication and
//! role-gated mutations.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Identities, employee profiles and password hashing
//! - **services**: Authentication, token issuing and employee use cases
//! - **infra**: Database, repositories, Unit of Work and seeding
//! - **api**: HTTP handlers, middleware and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Employee, Identity, Password, Role};
pub use errors::{AppError, AppResult};
