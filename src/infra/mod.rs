//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and migrations
//! - Repositories over the users, projects and memberships tables
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{ProjectRepository, ProjectStore, UserRepository, UserStore};
pub use unit_of_work::{Persistence, TransactionContext, TxProjectRepository, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockProjectRepository, MockUserRepository};
