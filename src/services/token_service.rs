//! Bearer token issuing and validation (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{JwtConfig, TOKEN_TTL_HOURS};
use crate::domain::Identity;
use crate::errors::{AppError, AppResult};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity ID, stringified
    pub sub: String,
    /// Username
    pub name: String,
    /// Stored role of the identity at issue time
    pub role: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

/// Signs and validates bearer tokens with one immutable [`JwtConfig`].
pub struct TokenIssuer {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        // Time window is checked against an explicit clock in `validate_at`
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Issue a token for the identity, valid for one hour from now.
    pub fn issue(&self, identity: &Identity) -> AppResult<String> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> AppResult<String> {
        let expires_at = now + Duration::hours(TOKEN_TTL_HOURS);

        let claims = Claims {
            sub: identity.id.to_string(),
            name: identity.username.clone(),
            role: identity.role.clone(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token against the current time.
    pub fn validate(&self, token: &str) -> AppResult<Claims> {
        self.validate_at(token, Utc::now())
    }

    /// Validate signature, issuer and audience, then require `iat <= now <= exp`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> AppResult<Claims> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        let now = now.timestamp();
        if now < claims.iat || now > claims.exp {
            tracing::debug!(sub = %claims.sub, "Token outside its validity window");
            return Err(AppError::Unauthorized);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-long-enough-for-hs256";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(JwtConfig::new(SECRET, "employee-api", "employee-clients").unwrap())
    }

    fn identity(role: &str) -> Identity {
        Identity {
            id: 42,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
            role: role.to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_then_validate() {
        let issuer = issuer();
        let token = issuer.issue(&identity("User")).unwrap();

        let claims = issuer.validate(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.name, "alice");
        assert_eq!(claims.role, "User");
        assert_eq!(claims.iss, "employee-api");
        assert_eq!(claims.aud, "employee-clients");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_carries_stored_role() {
        let issuer = issuer();
        let token = issuer.issue(&identity("Admin")).unwrap();
        assert_eq!(issuer.validate(&token).unwrap().role, "Admin");
    }

    #[test]
    fn test_token_expires_after_one_hour() {
        let issuer = issuer();
        let issued = Utc::now();
        let token = issuer.issue_at(&identity("User"), issued).unwrap();

        assert!(issuer.validate_at(&token, issued + Duration::minutes(59)).is_ok());
        assert!(issuer.validate_at(&token, issued + Duration::hours(1)).is_ok());
        assert!(matches!(
            issuer.validate_at(&token, issued + Duration::hours(1) + Duration::seconds(1)),
            Err(AppError::Unauthorized)
        ));
        assert!(issuer
            .validate_at(&token, issued + Duration::hours(2))
            .is_err());
    }

    #[test]
    fn test_token_not_valid_before_issue() {
        let issuer = issuer();
        let issued = Utc::now();
        let token = issuer.issue_at(&identity("User"), issued).unwrap();

        assert!(issuer
            .validate_at(&token, issued - Duration::minutes(5))
            .is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issuer().issue(&identity("User")).unwrap();
        let other = TokenIssuer::new(
            JwtConfig::new(
                "another-secret-key-that-is-long-enough-too",
                "employee-api",
                "employee-clients",
            )
            .unwrap(),
        );

        assert!(matches!(other.validate(&token), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_wrong_issuer_or_audience_rejected() {
        let token = issuer().issue(&identity("User")).unwrap();

        let other_iss =
            TokenIssuer::new(JwtConfig::new(SECRET, "someone-else", "employee-clients").unwrap());
        let other_aud =
            TokenIssuer::new(JwtConfig::new(SECRET, "employee-api", "someone-else").unwrap());

        assert!(other_iss.validate(&token).is_err());
        assert!(other_aud.validate(&token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let issuer = issuer();
        let token = issuer.issue(&identity("User")).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let forged = issuer.issue(&identity("Admin")).unwrap();
        parts[1] = forged.split('.').nth(1).unwrap().to_string();

        assert!(issuer.validate(&parts.join(".")).is_err());
        assert!(issuer.validate("not-a-token").is_err());
    }
}
