//! Authentication service - login and registration.
//!
//! Password hashing lives in the domain `Password` value object, token
//! handling in [`TokenIssuer`]. Repository access goes through the Unit of Work.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::token_service::{Claims, TokenIssuer};
use crate::config::DUPLICATE_IDENTITY_MESSAGE;
use crate::domain::{Identity, NewIdentity, Password, Role};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Token returned after a successful login
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token, valid for one hour
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new identity with the non-privileged role
    async fn register(
        &self,
        username: String,
        email: String,
        password: String,
        role: Option<Role>,
    ) -> AppResult<Identity>;

    /// Verify credentials and issue a token
    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse>;

    /// Verify a bearer token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: Arc<TokenIssuer>,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, tokens: Arc<TokenIssuer>) -> Self {
        Self { uow, tokens }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        username: String,
        email: String,
        password: String,
        role: Option<Role>,
    ) -> AppResult<Identity> {
        // Administrators are only created by startup seeding
        if role.is_some_and(|r| r != Role::User) {
            return Err(AppError::validation("Only the User role can be requested"));
        }

        // Inactive identities still reserve their username and email
        if self
            .uow
            .identities()
            .exists_by_username_or_email(&username, &email)
            .await?
        {
            return Err(AppError::conflict(DUPLICATE_IDENTITY_MESSAGE));
        }

        let password = Password::hash_blocking(password).await?;
        let identity = self
            .uow
            .identities()
            .create(NewIdentity {
                username,
                email,
                password_hash: password.into_string(),
                role: Role::User,
            })
            .await?;

        tracing::info!(id = identity.id, username = %identity.username, "Identity registered");
        Ok(identity)
    }

    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse> {
        let identity = self.uow.identities().find_by_username(&username).await?;

        // Unknown usernames still pay for a verification so timing does
        // not reveal which usernames exist.
        let stored = match &identity {
            Some(identity) => Password::from_hash(identity.password_hash.clone()),
            None => Password::dummy(),
        };
        let password_valid = stored.verify_blocking(password).await?;

        match identity {
            Some(identity) if password_valid && identity.can_authenticate() => {
                let token = self.tokens.issue(&identity)?;
                tracing::info!(id = identity.id, "Login succeeded");
                Ok(TokenResponse { token })
            }
            _ => {
                tracing::info!(username = %username, "Login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.validate(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JwtConfig, INVALID_CREDENTIALS_MESSAGE};
    use crate::infra::{
        EmployeeRepository, IdentityRepository, MockEmployeeRepository, MockIdentityRepository,
        TransactionContext, TxFuture,
    };
    use chrono::Utc;

    /// Unit of Work over mocked repositories; transactions are not supported
    struct TestUnitOfWork {
        identity_repo: Arc<MockIdentityRepository>,
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn identities(&self) -> Arc<dyn IdentityRepository> {
            self.identity_repo.clone()
        }

        fn employees(&self) -> Arc<dyn EmployeeRepository> {
            Arc::new(MockEmployeeRepository::new())
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
            T: Send,
        {
            Err(AppError::internal("Transactions not supported in test mock"))
        }
    }

    fn tokens() -> Arc<TokenIssuer> {
        Arc::new(TokenIssuer::new(
            JwtConfig::new("unit-test-secret-that-is-long-enough!!", "employee-api", "employee-clients")
                .unwrap(),
        ))
    }

    fn service(repo: MockIdentityRepository) -> Authenticator<TestUnitOfWork> {
        let uow = TestUnitOfWork {
            identity_repo: Arc::new(repo),
        };
        Authenticator::new(Arc::new(uow), tokens())
    }

    fn identity(password: &str, role: &str, is_active: bool) -> Identity {
        Identity {
            id: 7,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            role: role.to_string(),
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_token_with_stored_role() {
        let stored = identity("CorrectHorse1", "User", true);
        let mut repo = MockIdentityRepository::new();
        repo.expect_find_by_username()
            .withf(|username| username == "alice")
            .returning(move |_| Ok(Some(stored.clone())));

        let service = service(repo);
        let response = service
            .login("alice".to_string(), "CorrectHorse1".to_string())
            .await
            .unwrap();

        let claims = service.verify_token(&response.token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.name, "alice");
        assert_eq!(claims.role, "User");
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_fail_identically() {
        let stored = identity("CorrectHorse1", "User", true);
        let mut repo = MockIdentityRepository::new();
        repo.expect_find_by_username()
            .returning(move |username| {
                Ok((username == "alice").then(|| stored.clone()))
            });
        let service = service(repo);

        let wrong_password = service
            .login("alice".to_string(), "WrongHorse1".to_string())
            .await
            .unwrap_err();
        let unknown_user = service
            .login("mallory".to_string(), "CorrectHorse1".to_string())
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_user, AppError::InvalidCredentials));
        assert_eq!(wrong_password.user_message(), INVALID_CREDENTIALS_MESSAGE);
        assert_eq!(wrong_password.user_message(), unknown_user.user_message());
        assert_eq!(wrong_password.status(), unknown_user.status());
    }

    #[tokio::test]
    async fn test_inactive_identity_cannot_login() {
        let stored = identity("CorrectHorse1", "Admin", false);
        let mut repo = MockIdentityRepository::new();
        repo.expect_find_by_username()
            .returning(move |_| Ok(Some(stored.clone())));

        let result = service(repo)
            .login("alice".to_string(), "CorrectHorse1".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_register_duplicate_creates_nothing() {
        let mut repo = MockIdentityRepository::new();
        repo.expect_exists_by_username_or_email()
            .withf(|username, email| username == "alice" && email == "b@y.com")
            .returning(|_, _| Ok(true));
        repo.expect_create().never();

        let result = service(repo)
            .register(
                "alice".to_string(),
                "b@y.com".to_string(),
                "pw2".to_string(),
                None,
            )
            .await;

        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, DUPLICATE_IDENTITY_MESSAGE),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_admin_role() {
        let mut repo = MockIdentityRepository::new();
        repo.expect_exists_by_username_or_email().never();
        repo.expect_create().never();

        let result = service(repo)
            .register(
                "eve".to_string(),
                "eve@x.com".to_string(),
                "SecurePass123".to_string(),
                Some(Role::Admin),
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_hashes_and_defaults_to_user() {
        let mut repo = MockIdentityRepository::new();
        repo.expect_exists_by_username_or_email()
            .returning(|_, _| Ok(false));
        repo.expect_create()
            .withf(|new| {
                new.role == Role::User
                    && new.password_hash != "pw"
                    && Password::from_hash(new.password_hash.clone()).verify("pw")
            })
            .times(1)
            .returning(|new| {
                Ok(Identity {
                    id: 1,
                    username: new.username,
                    email: new.email,
                    password_hash: new.password_hash,
                    role: new.role.to_string(),
                    is_active: true,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let identity = service(repo)
            .register(
                "alice".to_string(),
                "a@x.com".to_string(),
                "pw".to_string(),
                Some(Role::User),
            )
            .await
            .unwrap();

        assert_eq!(identity.role, "User");
        assert!(identity.is_active);
    }
}
