//! Startup seeding of the administrator identity.

use crate::config::AdminSeed;
use crate::domain::{NewIdentity, Password, Role};
use crate::errors::AppResult;

use super::repositories::IdentityRepository;

/// Create the administrator identity unless one with the seed username exists.
///
/// Returns `true` when a new identity was inserted.
pub async fn seed_admin(identities: &dyn IdentityRepository, seed: &AdminSeed) -> AppResult<bool> {
    if identities.find_by_username(&seed.username).await?.is_some() {
        tracing::debug!(username = %seed.username, "Admin identity already present");
        return Ok(false);
    }

    let password = Password::hash_blocking(seed.password().to_owned()).await?;
    let admin = identities
        .create(NewIdentity {
            username: seed.username.clone(),
            email: seed.email.clone(),
            password_hash: password.into_string(),
            role: Role::Admin,
        })
        .await?;

    tracing::info!(id = admin.id, username = %admin.username, "Seeded admin identity");
    Ok(true)
}
