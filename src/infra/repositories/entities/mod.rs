//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod project;
pub mod project_member;
pub mod user;
