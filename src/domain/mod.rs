//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and explicit validation rules, independent
//! of HTTP and persistence concerns.

pub mod password;
pub mod project;
pub mod user;
pub mod validation;

pub use password::Password;
pub use project::{
    Invitation, InviteOutcome, MemberRole, NewProject, Project, ProjectChanges, ProjectDraft,
    ProjectMember, ProjectStatus,
};
pub use user::{NewUser, User, UserProfile, UserResponse};
