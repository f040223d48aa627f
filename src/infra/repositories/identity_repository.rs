//! Identity repository.
//!
//! Identities are never hard-deleted. Lookups used for login and uniqueness
//! see inactive rows as well; callers decide what inactivity means.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::domain::{Identity, NewIdentity};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Identity repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find identity by ID, active or not
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Identity>>;

    /// Find identity by exact (case-sensitive) username, active or not
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Identity>>;

    /// True if any identity, active or not, holds the username or the email
    async fn exists_by_username_or_email(&self, username: &str, email: &str) -> AppResult<bool>;

    /// Insert a new active identity
    async fn create(&self, identity: NewIdentity) -> AppResult<Identity>;

    /// Soft delete: clear the active flag
    async fn deactivate(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of IdentityRepository
pub struct IdentityStore {
    db: DatabaseConnection,
}

impl IdentityStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityRepository for IdentityStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Identity>> {
        query::find_by_id(&self.db, id).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Identity>> {
        query::find_by_username(&self.db, username).await
    }

    async fn exists_by_username_or_email(&self, username: &str, email: &str) -> AppResult<bool> {
        query::exists_by_username_or_email(&self.db, username, email).await
    }

    async fn create(&self, identity: NewIdentity) -> AppResult<Identity> {
        query::create(&self.db, identity).await
    }

    async fn deactivate(&self, id: i32) -> AppResult<()> {
        query::deactivate(&self.db, id).await
    }
}

/// Queries shared by the pooled store and the transaction-scoped repository.
pub(crate) mod query {
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
        QueryFilter, Set,
    };

    use super::super::entities::user::{self, ActiveModel, Entity as UserEntity};
    use crate::domain::{Identity, NewIdentity};
    use crate::errors::{AppError, AppResult};

    pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<Option<Identity>> {
        let result = UserEntity::find_by_id(id).one(conn).await?;
        Ok(result.map(Identity::from))
    }

    pub async fn find_by_username<C: ConnectionTrait>(
        conn: &C,
        username: &str,
    ) -> AppResult<Option<Identity>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await?;

        Ok(result.map(Identity::from))
    }

    pub async fn exists_by_username_or_email<C: ConnectionTrait>(
        conn: &C,
        username: &str,
        email: &str,
    ) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(username))
                    .add(user::Column::Email.eq(email)),
            )
            .count(conn)
            .await?;

        Ok(count > 0)
    }

    pub async fn create<C: ConnectionTrait>(conn: &C, identity: NewIdentity) -> AppResult<Identity> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            username: Set(identity.username),
            email: Set(identity.email),
            password_hash: Set(identity.password_hash),
            role: Set(identity.role.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(conn).await?;
        Ok(Identity::from(model))
    }

    pub async fn deactivate<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<()> {
        let identity = UserEntity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = identity.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now());

        active.update(conn).await?;
        Ok(())
    }
}
