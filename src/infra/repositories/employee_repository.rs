//! Employee profile repository with soft delete support.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::domain::{Employee, EmployeeDetails};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Employee repository trait for dependency injection.
///
/// Reads and mutations only see active profiles, except where the method
/// name says otherwise.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// List active profiles ordered by ID
    async fn list_active(&self) -> AppResult<Vec<Employee>>;

    /// Find active profile by ID
    async fn find_active_by_id(&self, id: i32) -> AppResult<Option<Employee>>;

    /// Find profile by ID including deactivated ones
    async fn find_by_id_with_inactive(&self, id: i32) -> AppResult<Option<Employee>>;

    /// True if another profile (active or not) already uses the email
    async fn email_taken(&self, email: &str, except_id: Option<i32>) -> AppResult<bool>;

    /// Insert a new active profile, optionally linked to an identity
    async fn create(&self, details: EmployeeDetails, user_id: Option<i32>) -> AppResult<Employee>;

    /// Overwrite the writable fields of an active profile
    async fn update(&self, id: i32, details: EmployeeDetails) -> AppResult<Employee>;

    /// Soft delete an active profile and return it
    async fn deactivate(&self, id: i32) -> AppResult<Employee>;
}

/// Concrete implementation of EmployeeRepository
pub struct EmployeeStore {
    db: DatabaseConnection,
}

impl EmployeeStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployeeRepository for EmployeeStore {
    async fn list_active(&self) -> AppResult<Vec<Employee>> {
        query::list_active(&self.db).await
    }

    async fn find_active_by_id(&self, id: i32) -> AppResult<Option<Employee>> {
        query::find_active_by_id(&self.db, id).await
    }

    async fn find_by_id_with_inactive(&self, id: i32) -> AppResult<Option<Employee>> {
        query::find_by_id_with_inactive(&self.db, id).await
    }

    async fn email_taken(&self, email: &str, except_id: Option<i32>) -> AppResult<bool> {
        query::email_taken(&self.db, email, except_id).await
    }

    async fn create(&self, details: EmployeeDetails, user_id: Option<i32>) -> AppResult<Employee> {
        query::create(&self.db, details, user_id).await
    }

    async fn update(&self, id: i32, details: EmployeeDetails) -> AppResult<Employee> {
        query::update(&self.db, id, details).await
    }

    async fn deactivate(&self, id: i32) -> AppResult<Employee> {
        query::deactivate(&self.db, id).await
    }
}

/// Queries shared by the pooled store and the transaction-scoped repository.
pub(crate) mod query {
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
        QueryOrder, Set,
    };

    use super::super::entities::employee::{self, ActiveModel, Entity as EmployeeEntity, Model};
    use crate::domain::{Employee, EmployeeDetails};
    use crate::errors::{AppError, AppResult};

    async fn active_model<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<Model> {
        EmployeeEntity::find_by_id(id)
            .filter(employee::Column::IsActive.eq(true))
            .one(conn)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list_active<C: ConnectionTrait>(conn: &C) -> AppResult<Vec<Employee>> {
        let models = EmployeeEntity::find()
            .filter(employee::Column::IsActive.eq(true))
            .order_by_asc(employee::Column::Id)
            .all(conn)
            .await?;

        Ok(models.into_iter().map(Employee::from).collect())
    }

    pub async fn find_active_by_id<C: ConnectionTrait>(
        conn: &C,
        id: i32,
    ) -> AppResult<Option<Employee>> {
        let result = EmployeeEntity::find_by_id(id)
            .filter(employee::Column::IsActive.eq(true))
            .one(conn)
            .await?;

        Ok(result.map(Employee::from))
    }

    pub async fn find_by_id_with_inactive<C: ConnectionTrait>(
        conn: &C,
        id: i32,
    ) -> AppResult<Option<Employee>> {
        let result = EmployeeEntity::find_by_id(id).one(conn).await?;
        Ok(result.map(Employee::from))
    }

    pub async fn email_taken<C: ConnectionTrait>(
        conn: &C,
        email: &str,
        except_id: Option<i32>,
    ) -> AppResult<bool> {
        let mut select = EmployeeEntity::find().filter(employee::Column::Email.eq(email));
        if let Some(id) = except_id {
            select = select.filter(employee::Column::Id.ne(id));
        }

        Ok(select.count(conn).await? > 0)
    }

    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        details: EmployeeDetails,
        user_id: Option<i32>,
    ) -> AppResult<Employee> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            user_id: Set(user_id),
            first_name: Set(details.first_name),
            last_name: Set(details.last_name),
            email: Set(details.email),
            phone: Set(details.phone),
            department: Set(details.department),
            position: Set(details.position),
            salary: Set(details.salary),
            hire_date: Set(details.hire_date),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(conn).await?;
        Ok(Employee::from(model))
    }

    pub async fn update<C: ConnectionTrait>(
        conn: &C,
        id: i32,
        details: EmployeeDetails,
    ) -> AppResult<Employee> {
        let mut active: ActiveModel = active_model(conn, id).await?.into();

        active.first_name = Set(details.first_name);
        active.last_name = Set(details.last_name);
        active.email = Set(details.email);
        active.phone = Set(details.phone);
        active.department = Set(details.department);
        active.position = Set(details.position);
        active.salary = Set(details.salary);
        active.hire_date = Set(details.hire_date);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(conn).await?;
        Ok(Employee::from(model))
    }

    pub async fn deactivate<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<Employee> {
        let mut active: ActiveModel = active_model(conn, id).await?.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(conn).await?;
        Ok(Employee::from(model))
    }
}
