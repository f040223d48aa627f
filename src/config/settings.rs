//! Application settings loaded from environment variables.

use std::env;

use thiserror::Error;

use super::constants::{
    DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_USERNAME, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MIN_JWT_SECRET_LENGTH,
};

/// Fatal configuration problems detected at startup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("JWT_SECRET must be at least {0} characters long")]
    SecretTooShort(usize),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Token signing settings, built once and shared read-only.
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    pub issuer: String,
    pub audience: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

impl JwtConfig {
    /// Build a validated JWT configuration.
    ///
    /// Empty values and secrets shorter than the minimum length are rejected.
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let secret = secret.into();
        let issuer = issuer.into();
        let audience = audience.into();

        if secret.trim().is_empty() {
            return Err(ConfigError::Empty("JWT_SECRET"));
        }
        if secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort(MIN_JWT_SECRET_LENGTH));
        }
        if issuer.trim().is_empty() {
            return Err(ConfigError::Empty("JWT_ISSUER"));
        }
        if audience.trim().is_empty() {
            return Err(ConfigError::Empty("JWT_AUDIENCE"));
        }

        Ok(Self {
            secret,
            issuer,
            audience,
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

/// Credentials for the administrator seeded at startup.
#[derive(Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl AdminSeed {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    database_url: String,
    pub jwt: JwtConfig,
    pub server_host: String,
    pub server_port: u16,
    pub cors_allowed_origin: Option<String>,
    pub admin_seed: Option<AdminSeed>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt", &self.jwt)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("admin_seed", &self.admin_seed)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing or empty `DATABASE_URL`, `JWT_SECRET`, `JWT_ISSUER` or
    /// `JWT_AUDIENCE` is an error; the caller is expected to abort startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            let value = lookup(name).ok_or(ConfigError::Missing(name))?;
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(name));
            }
            Ok(value)
        };

        let database_url = required("DATABASE_URL")?;
        let jwt = JwtConfig::new(
            required("JWT_SECRET")?,
            required("JWT_ISSUER")?,
            required("JWT_AUDIENCE")?,
        )?;

        let server_port = match lookup("SERVER_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "SERVER_PORT",
                value,
            })?,
            None => DEFAULT_SERVER_PORT,
        };

        let admin_seed = lookup("ADMIN_PASSWORD")
            .filter(|p| !p.is_empty())
            .map(|password| {
                AdminSeed::new(
                    lookup("ADMIN_USERNAME").unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
                    lookup("ADMIN_EMAIL").unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
                    password,
                )
            });

        Ok(Self {
            database_url,
            jwt,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port,
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN").filter(|o| !o.is_empty()),
            admin_seed,
        })
    }

    /// Database connection string.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}
