//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and runs multi-table writes
//! (project creation, project deletion) atomically.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction,
    IsolationLevel, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::project_repository;
use super::repositories::{ProjectRepository, ProjectStore, UserRepository, UserStore};
use crate::domain::{MemberRole, NewProject, Project};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to generic methods.
/// Tests implement it by hand around mocked repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get project repository
    fn projects(&self) -> Arc<dyn ProjectRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success and rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get project repository for this transaction
    pub fn projects(&self) -> TxProjectRepository<'_> {
        TxProjectRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    project_repo: Arc<ProjectStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let project_repo = Arc::new(ProjectStore::new(db.clone()));
        Self {
            db,
            user_repo,
            project_repo,
        }
    }

    async fn begin(&self) -> AppResult<DatabaseTransaction> {
        let txn = match self.db.get_database_backend() {
            // SQLite has no per-transaction isolation levels
            DatabaseBackend::Sqlite => self.db.begin().await?,
            _ => {
                self.db
                    .begin_with_config(
                        Some(IsolationLevel::ReadCommitted),
                        Some(AccessMode::ReadWrite),
                    )
                    .await?
            }
        };
        Ok(txn)
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn projects(&self) -> Arc<dyn ProjectRepository> {
        self.project_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self.begin().await?;
        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
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

/// Transaction-aware project repository.
///
/// Borrows the transaction, so every call joins the caller's unit of work.
pub struct TxProjectRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProjectRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Find a project with its members
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Project>> {
        project_repository::find_project(self.txn, id).await
    }

    /// Insert a project row owned by `owner_id`, returning its id
    pub async fn insert(&self, new_project: NewProject, owner_id: Uuid) -> AppResult<Uuid> {
        project_repository::insert_project(self.txn, new_project, owner_id).await
    }

    /// Append a member unless already present
    pub async fn add_member(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> AppResult<bool> {
        project_repository::insert_member(self.txn, project_id, user_id, role).await
    }

    /// Remove the project and its memberships
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !project_repository::delete_project(self.txn, id).await? {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
