//! Project service - membership-scoped project use cases.
//!
//! Every operation takes the acting user's id explicitly. A project the
//! user is not a member of behaves exactly like one that does not exist.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Invitation, InviteOutcome, MemberRole, Project, ProjectChanges, ProjectDraft,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Project service trait for dependency injection.
#[async_trait]
pub trait ProjectService: Send + Sync {
    /// Projects the user belongs to, newest first
    async fn list_projects(&self, user_id: Uuid) -> AppResult<Vec<Project>>;

    async fn get_project(&self, id: Uuid, user_id: Uuid) -> AppResult<Project>;

    /// Create a project owned by the user, who becomes its first (admin) member
    async fn create_project(&self, draft: ProjectDraft, user_id: Uuid) -> AppResult<Project>;

    async fn update_project(
        &self,
        id: Uuid,
        changes: ProjectChanges,
        user_id: Uuid,
    ) -> AppResult<Project>;

    /// Add registered users by email; unknown emails are reported, not created
    async fn invite_members(
        &self,
        id: Uuid,
        invitation: Invitation,
        user_id: Uuid,
    ) -> AppResult<InviteOutcome>;

    /// Owner-only removal of a project and its memberships
    async fn delete_project(&self, id: Uuid, user_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ProjectService using Unit of Work.
pub struct ProjectManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProjectManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn load_for_member(&self, id: Uuid, user_id: Uuid) -> AppResult<Project> {
        let project = self.uow.projects().find_by_id(id).await?.ok_or_not_found()?;
        if !project.is_member(user_id) {
            tracing::debug!(project_id = %id, user_id = %user_id, "Non-member access");
            return Err(AppError::NotFound);
        }
        Ok(project)
    }
}

#[async_trait]
impl<U: UnitOfWork> ProjectService for ProjectManager<U> {
    async fn list_projects(&self, user_id: Uuid) -> AppResult<Vec<Project>> {
        self.uow.projects().list_for_member(user_id).await
    }

    async fn get_project(&self, id: Uuid, user_id: Uuid) -> AppResult<Project> {
        self.load_for_member(id, user_id).await
    }

    async fn create_project(&self, draft: ProjectDraft, user_id: Uuid) -> AppResult<Project> {
        let new_project = draft.validate()?;

        if self.uow.users().find_by_id(user_id).await?.is_none() {
            return Err(AppError::validation("User not found"));
        }

        let project = with_transaction!(self.uow, |ctx| {
            let projects = ctx.projects();
            let id = projects.insert(new_project, user_id).await?;
            projects.add_member(id, user_id, MemberRole::Admin).await?;
            projects
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::internal("Created project vanished inside transaction"))
        })?;

        tracing::info!(project_id = %project.id, owner_id = %user_id, "Project created");
        Ok(project)
    }

    async fn update_project(
        &self,
        id: Uuid,
        changes: ProjectChanges,
        user_id: Uuid,
    ) -> AppResult<Project> {
        let project = self.load_for_member(id, user_id).await?;
        let changes = changes.validate()?;
        if changes.is_empty() {
            return Ok(project);
        }

        let updated = self.uow.projects().update(id, changes).await?.ok_or_not_found()?;
        tracing::info!(project_id = %id, user_id = %user_id, "Project updated");
        Ok(updated)
    }

    async fn invite_members(
        &self,
        id: Uuid,
        invitation: Invitation,
        user_id: Uuid,
    ) -> AppResult<InviteOutcome> {
        let project = self.load_for_member(id, user_id).await?;
        let (emails, role) = invitation.validate()?;

        let users = self.uow.users().find_by_emails(&emails).await?;
        let mut outcome = InviteOutcome::default();

        for email in emails {
            let Some(user) = users.iter().find(|u| u.email == email) else {
                outcome.skipped.push(email);
                continue;
            };

            if project.is_member(user.id) {
                outcome.already_members.push(email);
            } else if self.uow.projects().add_member(id, user.id, role).await? {
                outcome.added.push(email);
            } else {
                // Joined concurrently since the project was loaded
                outcome.already_members.push(email);
            }
        }

        tracing::info!(
            project_id = %id,
            added = outcome.added.len(),
            already_members = outcome.already_members.len(),
            skipped = outcome.skipped.len(),
            "Invitations processed"
        );
        Ok(outcome)
    }

    async fn delete_project(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        let project = self.load_for_member(id, user_id).await?;
        if !project.is_owner(user_id) {
            return Err(AppError::Forbidden);
        }

        with_transaction!(self.uow, |ctx| { ctx.projects().delete(id).await })?;

        tracing::info!(project_id = %id, user_id = %user_id, "Project deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProjectMember, ProjectStatus, User};
    use crate::infra::{MockProjectRepository, MockUserRepository};
    use crate::services::test_support::TestUnitOfWork;
    use chrono::Utc;
    use mockall::predicate::{always, eq};

    fn member(id: Uuid, email: &str, role: MemberRole) -> ProjectMember {
        ProjectMember {
            id,
            name: "Member".into(),
            email: email.into(),
            role,
            joined_at: Utc::now(),
        }
    }

    fn project_owned_by(owner: Uuid) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Apollo".into(),
            description: String::new(),
            status: ProjectStatus::Active,
            tech_stack: vec!["Rust".into()],
            owner_id: owner,
            members: vec![member(owner, "owner@x.com", MemberRole::Admin)],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user(email: &str) -> User {
        User::new(Uuid::new_v4(), email.into(), "hash".into(), "U".into(), None)
    }

    fn service(
        users: MockUserRepository,
        projects: MockProjectRepository,
    ) -> ProjectManager<TestUnitOfWork> {
        ProjectManager::new(Arc::new(TestUnitOfWork::new(users, projects)))
    }

    fn repo_with(project: Project) -> MockProjectRepository {
        let mut repo = MockProjectRepository::new();
        let id = project.id;
        repo.expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(project.clone())));
        repo
    }

    #[tokio::test]
    async fn test_get_project_as_member() {
        let owner = Uuid::new_v4();
        let project = project_owned_by(owner);
        let id = project.id;

        let service = service(MockUserRepository::new(), repo_with(project));
        let found = service.get_project(id, owner).await.unwrap();

        assert_eq!(found.id, id);
    }

    #[tokio::test]
    async fn test_get_project_hidden_from_non_member() {
        let project = project_owned_by(Uuid::new_v4());
        let id = project.id;

        let service = service(MockUserRepository::new(), repo_with(project));
        let result = service.get_project(id, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_missing_project() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = service(MockUserRepository::new(), repo);
        let result = service.get_project(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_projects_delegates_to_membership_query() {
        let user_id = Uuid::new_v4();
        let mut repo = MockProjectRepository::new();
        repo.expect_list_for_member()
            .with(eq(user_id))
            .returning(move |uid| Ok(vec![project_owned_by(uid), project_owned_by(uid)]));

        let service = service(MockUserRepository::new(), repo);
        let projects = service.list_projects(user_id).await.unwrap();

        assert_eq!(projects.len(), 2);
    }

    #[tokio::test]
    async fn test_create_project_requires_existing_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let service = service(users, MockProjectRepository::new());
        let draft = ProjectDraft {
            name: "Apollo".into(),
            ..Default::default()
        };
        let result = service.create_project(draft, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == "User not found"));
    }

    #[tokio::test]
    async fn test_create_project_validates_before_lookup() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();

        let service = service(users, MockProjectRepository::new());
        let result = service
            .create_project(ProjectDraft::default(), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_project_writes_only_changes() {
        let owner = Uuid::new_v4();
        let project = project_owned_by(owner);
        let id = project.id;
        let mut updated = project.clone();
        updated.status = ProjectStatus::Completed;

        let mut repo = repo_with(project);
        repo.expect_update()
            .withf(move |pid, changes| {
                *pid == id
                    && changes.status == Some(ProjectStatus::Completed)
                    && changes.name.is_none()
            })
            .returning(move |_, _| Ok(Some(updated.clone())));

        let service = service(MockUserRepository::new(), repo);
        let changes = ProjectChanges {
            status: Some(ProjectStatus::Completed),
            ..Default::default()
        };
        let result = service.update_project(id, changes, owner).await.unwrap();

        assert_eq!(result.status, ProjectStatus::Completed);
        assert_eq!(result.name, "Apollo");
    }

    #[tokio::test]
    async fn test_update_project_non_member_not_found() {
        let project = project_owned_by(Uuid::new_v4());
        let id = project.id;
        let mut repo = repo_with(project);
        repo.expect_update().never();

        let service = service(MockUserRepository::new(), repo);
        let changes = ProjectChanges {
            name: Some("Hijacked".into()),
            ..Default::default()
        };
        let result = service.update_project(id, changes, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_without_changes_is_noop() {
        let owner = Uuid::new_v4();
        let project = project_owned_by(owner);
        let id = project.id;
        let mut repo = repo_with(project);
        repo.expect_update().never();

        let service = service(MockUserRepository::new(), repo);
        let result = service
            .update_project(id, ProjectChanges::default(), owner)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_invite_members_partitions_emails() {
        let owner = Uuid::new_v4();
        let project = project_owned_by(owner);
        let id = project.id;
        let newcomer = user("new@x.com");
        let newcomer_id = newcomer.id;
        let mut owner_user = user("owner@x.com");
        owner_user.id = owner;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_emails()
            .withf(|emails| emails.len() == 3)
            .returning(move |_| Ok(vec![newcomer.clone(), owner_user.clone()]));

        let mut repo = repo_with(project);
        repo.expect_add_member()
            .with(eq(id), eq(newcomer_id), eq(MemberRole::Manager))
            .times(1)
            .returning(|_, _, _| Ok(true));

        let service = service(users, repo);
        let invitation = Invitation {
            emails: vec!["New@x.com".into(), "owner@x.com".into(), "ghost@x.com".into()],
            role: Some(MemberRole::Manager),
        };
        let outcome = service.invite_members(id, invitation, owner).await.unwrap();

        assert_eq!(outcome.added, vec!["new@x.com"]);
        assert_eq!(outcome.already_members, vec!["owner@x.com"]);
        assert_eq!(outcome.skipped, vec!["ghost@x.com"]);
    }

    #[tokio::test]
    async fn test_invite_lost_race_counts_as_existing_member() {
        let owner = Uuid::new_v4();
        let project = project_owned_by(owner);
        let id = project.id;
        let racer = user("racer@x.com");

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_emails()
            .returning(move |_| Ok(vec![racer.clone()]));

        let mut repo = repo_with(project);
        repo.expect_add_member()
            .with(eq(id), always(), always())
            .returning(|_, _, _| Ok(false));

        let service = service(users, repo);
        let invitation = Invitation {
            emails: vec!["racer@x.com".into()],
            role: None,
        };
        let outcome = service.invite_members(id, invitation, owner).await.unwrap();

        assert!(outcome.added.is_empty());
        assert_eq!(outcome.already_members, vec!["racer@x.com"]);
    }

    #[tokio::test]
    async fn test_invite_non_member_not_found() {
        let project = project_owned_by(Uuid::new_v4());
        let id = project.id;

        let mut users = MockUserRepository::new();
        users.expect_find_by_emails().never();

        let service = service(users, repo_with(project));
        let invitation = Invitation {
            emails: vec!["a@x.com".into()],
            role: None,
        };
        let result = service.invite_members(id, invitation, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_invite_missing_project_not_found() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_add_member().never();

        let mut users = MockUserRepository::new();
        users.expect_find_by_emails().never();

        let service = service(users, repo);
        let invitation = Invitation {
            emails: vec!["a@x.com".into()],
            role: None,
        };
        let result = service
            .invite_members(Uuid::new_v4(), invitation, Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_missing_project_not_found() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_update().never();

        let service = service(MockUserRepository::new(), repo);
        let changes = ProjectChanges {
            name: Some("Renamed".into()),
            ..Default::default()
        };
        let result = service
            .update_project(Uuid::new_v4(), changes, Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_invite_into_project_deleted_meanwhile() {
        let owner = Uuid::new_v4();
        let project = project_owned_by(owner);
        let id = project.id;
        let invitee = user("late@x.com");

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_emails()
            .returning(move |_| Ok(vec![invitee.clone()]));

        let mut repo = repo_with(project);
        repo.expect_add_member()
            .returning(|_, _, _| Err(AppError::NotFound));

        let service = service(users, repo);
        let invitation = Invitation {
            emails: vec!["late@x.com".into()],
            role: None,
        };
        let result = service.invite_members(id, invitation, owner).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_requires_owner() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut project = project_owned_by(owner);
        project.members.push(member(other, "other@x.com", MemberRole::Admin));
        let id = project.id;

        let service = service(MockUserRepository::new(), repo_with(project));
        let result = service.delete_project(id, other).await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
