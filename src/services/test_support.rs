//! Hand-written UnitOfWork around mocked repositories.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{AppError, AppResult};
use crate::infra::{
    MockProjectRepository, MockUserRepository, ProjectRepository, TransactionContext,
    UnitOfWork, UserRepository,
};

pub(crate) struct TestUnitOfWork {
    user_repo: Arc<MockUserRepository>,
    project_repo: Arc<MockProjectRepository>,
}

impl TestUnitOfWork {
    pub(crate) fn new(users: MockUserRepository, projects: MockProjectRepository) -> Self {
        Self {
            user_repo: Arc::new(users),
            project_repo: Arc::new(projects),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn projects(&self) -> Arc<dyn ProjectRepository> {
        self.project_repo.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Transactions need a real database; covered by the API tests
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}
