//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{cors_layer, create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{seed_admin, Database, IdentityStore};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Database::connect(&config).await?;
    let db = Arc::new(db);

    match &config.admin_seed {
        Some(seed) => {
            let identities = IdentityStore::new(db.get_connection());
            seed_admin(&identities, seed).await?;
        }
        None => tracing::info!("ADMIN_PASSWORD not set, skipping admin seeding"),
    }

    let cors = cors_layer(config.cors_allowed_origin.as_deref());
    let app_state = AppState::from_config(db, config.jwt.clone());
    let app = create_router(app_state, cors);

    let addr = format!(
        "{}:{}",
        args.host.unwrap_or_else(|| config.server_host.clone()),
        args.port.unwrap_or(config.server_port)
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
