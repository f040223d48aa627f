//! Unit of Work pattern implementation.
//!
//! Centralizes access to the identity and employee repositories and runs
//! multi-step workflows (identity + profile creation, profile + identity
//! deactivation) inside a single database transaction.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::{
    employee_query, identity_query, EmployeeRepository, EmployeeStore, IdentityRepository,
    IdentityStore,
};
use crate::domain::{Employee, EmployeeDetails, Identity, NewIdentity};
use crate::errors::AppResult;

/// Boxed future returned by a transaction closure.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic `transaction` method.
/// Mock the repositories instead, or test against an in-memory database.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get identity repository
    fn identities(&self) -> Arc<dyn IdentityRepository>;

    /// Get employee repository
    fn employees(&self) -> Arc<dyn EmployeeRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Committed when the closure returns `Ok`, rolled back on `Err`.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// Everything done through this context belongs to the same transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Identity repository bound to this transaction
    pub fn identities(&self) -> TxIdentityRepository<'_> {
        TxIdentityRepository { txn: self.txn }
    }

    /// Employee repository bound to this transaction
    pub fn employees(&self) -> TxEmployeeRepository<'_> {
        TxEmployeeRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    identity_repo: Arc<IdentityStore>,
    employee_repo: Arc<EmployeeStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let identity_repo = Arc::new(IdentityStore::new(db.clone()));
        let employee_repo = Arc::new(EmployeeStore::new(db.clone()));
        Self {
            db,
            identity_repo,
            employee_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn identities(&self) -> Arc<dyn IdentityRepository> {
        self.identity_repo.clone()
    }

    fn employees(&self) -> Arc<dyn EmployeeRepository> {
        self.employee_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self.db.begin().await?;

        // Context borrows the transaction; it is dropped before commit/rollback
        let result = f(TransactionContext::new(&txn)).await;

        match result {
            Ok(value) => {
                txn.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-scoped identity repository.
pub struct TxIdentityRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxIdentityRepository<'_> {
    pub async fn exists_by_username_or_email(&self, username: &str, email: &str) -> AppResult<bool> {
        identity_query::exists_by_username_or_email(self.txn, username, email).await
    }

    pub async fn create(&self, identity: NewIdentity) -> AppResult<Identity> {
        identity_query::create(self.txn, identity).await
    }

    pub async fn deactivate(&self, id: i32) -> AppResult<()> {
        identity_query::deactivate(self.txn, id).await
    }
}

/// Transaction-scoped employee repository.
pub struct TxEmployeeRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxEmployeeRepository<'_> {
    pub async fn email_taken(&self, email: &str, except_id: Option<i32>) -> AppResult<bool> {
        employee_query::email_taken(self.txn, email, except_id).await
    }

    pub async fn create(&self, details: EmployeeDetails, user_id: Option<i32>) -> AppResult<Employee> {
        employee_query::create(self.txn, details, user_id).await
    }

    pub async fn deactivate(&self, id: i32) -> AppResult<Employee> {
        employee_query::deactivate(self.txn, id).await
    }
}

/// Shorthand for `uow.transaction(|ctx| Box::pin(async move { ... })).await`.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
