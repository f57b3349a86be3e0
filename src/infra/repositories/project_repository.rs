//! Project repository - projects and their membership rows.
//!
//! Query helpers are generic over `ConnectionTrait` so the pooled store and
//! the transaction-scoped repository share one implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    SqlErr, Unchanged,
};
use uuid::Uuid;

use super::entities::project::{self, Entity as ProjectEntity};
use super::entities::project_member::{self, Entity as ProjectMemberEntity};
use super::entities::user::Entity as UserEntity;
use crate::domain::{
    MemberRole, NewProject, Project, ProjectChanges, ProjectMember, ProjectStatus,
};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Project repository trait for dependency injection.
///
/// Creation and deletion touch two tables and go through
/// `UnitOfWork::transaction` instead.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Find a project with its members loaded
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Project>>;

    /// All projects the user is a member of, newest first
    async fn list_for_member(&self, user_id: Uuid) -> AppResult<Vec<Project>>;

    /// Write the supplied fields; `None` if the project no longer exists
    async fn update(&self, id: Uuid, changes: ProjectChanges) -> AppResult<Option<Project>>;

    /// Append a member unless already present. Returns whether a row was added.
    async fn add_member(&self, project_id: Uuid, user_id: Uuid, role: MemberRole)
        -> AppResult<bool>;
}

/// Concrete implementation of ProjectRepository
pub struct ProjectStore {
    db: DatabaseConnection,
}

impl ProjectStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectRepository for ProjectStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Project>> {
        find_project(&self.db, id).await
    }

    async fn list_for_member(&self, user_id: Uuid) -> AppResult<Vec<Project>> {
        let models = ProjectEntity::find()
            .join(JoinType::InnerJoin, project::Relation::ProjectMember.def())
            .filter(project_member::Column::UserId.eq(user_id))
            .order_by_desc(project::Column::CreatedAt)
            .all(&self.db)
            .await?;

        with_members(&self.db, models).await
    }

    async fn update(&self, id: Uuid, changes: ProjectChanges) -> AppResult<Option<Project>> {
        let mut active = project::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(tech_stack) = changes.tech_stack {
            active.tech_stack = Set(serde_json::json!(tech_stack));
        }
        active.updated_at = Set(Utc::now());

        match active.update(&self.db).await {
            Ok(_) => find_project(&self.db, id).await,
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn add_member(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> AppResult<bool> {
        insert_member(&self.db, project_id, user_id, role).await
    }
}

/// Insert the project row and return its id.
pub(crate) async fn insert_project<C: ConnectionTrait>(
    db: &C,
    new_project: NewProject,
    owner_id: Uuid,
) -> AppResult<Uuid> {
    let now = Utc::now();
    let id = Uuid::new_v4();
    let active_model = project::ActiveModel {
        id: Set(id),
        name: Set(new_project.name),
        description: Set(new_project.description),
        status: Set(new_project.status.as_str().to_string()),
        tech_stack: Set(serde_json::json!(new_project.tech_stack)),
        owner_id: Set(owner_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    ProjectEntity::insert(active_model).exec_without_returning(db).await?;
    Ok(id)
}

/// Single-statement insert-or-ignore, so concurrent invites cannot lose or duplicate rows.
pub(crate) async fn insert_member<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    user_id: Uuid,
    role: MemberRole,
) -> AppResult<bool> {
    let membership = project_member::ActiveModel {
        project_id: Set(project_id),
        user_id: Set(user_id),
        role: Set(role.as_str().to_string()),
        joined_at: Set(Utc::now()),
        ..Default::default()
    };

    let inserted = ProjectMemberEntity::insert(membership)
        .on_conflict(
            OnConflict::columns([
                project_member::Column::ProjectId,
                project_member::Column::UserId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .map_err(map_missing_project)?;

    Ok(inserted > 0)
}

/// The project was deleted between the membership check and the insert
fn map_missing_project(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::NotFound,
        _ => AppError::from(err),
    }
}

/// Delete memberships and the project row. Returns whether the project existed.
pub(crate) async fn delete_project<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<bool> {
    ProjectMemberEntity::delete_many()
        .filter(project_member::Column::ProjectId.eq(id))
        .exec(db)
        .await?;

    let result = ProjectEntity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

pub(crate) async fn find_project<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Project>> {
    let Some(model) = ProjectEntity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    Ok(with_members(db, vec![model]).await?.pop())
}

/// Attach members (in join order) to each project model, preserving model order.
async fn with_members<C: ConnectionTrait>(
    db: &C,
    models: Vec<project::Model>,
) -> AppResult<Vec<Project>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let rows = ProjectMemberEntity::find()
        .filter(project_member::Column::ProjectId.is_in(ids))
        .find_also_related(UserEntity)
        .order_by_asc(project_member::Column::Id)
        .all(db)
        .await?;

    let mut members: HashMap<Uuid, Vec<ProjectMember>> = HashMap::new();
    for (membership, user) in rows {
        let Some(user) = user else {
            tracing::warn!(
                project_id = %membership.project_id,
                user_id = %membership.user_id,
                "Membership references a missing user"
            );
            continue;
        };
        let role: MemberRole = membership.role.parse().map_err(|_| {
            AppError::internal(format!("Unknown member role in database: {}", membership.role))
        })?;
        members
            .entry(membership.project_id)
            .or_default()
            .push(ProjectMember {
                id: user.id,
                name: user.name,
                email: user.email,
                role,
                joined_at: membership.joined_at,
            });
    }

    models
        .into_iter()
        .map(|model| {
            let project_members = members.remove(&model.id).unwrap_or_default();
            to_domain(model, project_members)
        })
        .collect()
}

fn to_domain(model: project::Model, members: Vec<ProjectMember>) -> AppResult<Project> {
    let status: ProjectStatus = model.status.parse().map_err(|_| {
        AppError::internal(format!("Unknown project status in database: {}", model.status))
    })?;
    let tech_stack: Vec<String> = serde_json::from_value(model.tech_stack)
        .map_err(|e| AppError::internal(format!("Malformed tech stack column: {}", e)))?;

    Ok(Project {
        id: model.id,
        name: model.name,
        description: model.description,
        status,
        tech_stack,
        owner_id: model.owner_id,
        members,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::NewUser;
    use crate::infra::{Database, UserRepository, UserStore};

    async fn migrated_db() -> DatabaseConnection {
        let config = Config::new("sqlite::memory:", "test-secret-key-for-testing-only-32chars")
            .unwrap();
        Database::connect(&config).await.unwrap().get_connection()
    }

    #[tokio::test]
    async fn test_add_member_to_deleted_project_is_not_found() {
        let db = migrated_db().await;
        let user = UserStore::new(db.clone())
            .create(NewUser {
                email: "a@x.com".into(),
                password_hash: "hash".into(),
                name: "A".into(),
                phone: None,
            })
            .await
            .unwrap();

        let store = ProjectStore::new(db);
        let result = store
            .add_member(Uuid::new_v4(), user.id, MemberRole::Member)
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_add_member_twice_inserts_once() {
        let db = migrated_db().await;
        let owner = UserStore::new(db.clone())
            .create(NewUser {
                email: "owner@x.com".into(),
                password_hash: "hash".into(),
                name: "Owner".into(),
                phone: None,
            })
            .await
            .unwrap();
        let new_project = NewProject {
            name: "Apollo".into(),
            description: String::new(),
            status: ProjectStatus::Active,
            tech_stack: Vec::new(),
        };
        let id = insert_project(&db, new_project, owner.id).await.unwrap();

        let store = ProjectStore::new(db);
        assert!(store.add_member(id, owner.id, MemberRole::Admin).await.unwrap());
        assert!(!store.add_member(id, owner.id, MemberRole::Member).await.unwrap());

        let project = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(project.members.len(), 1);
        assert_eq!(project.members[0].role, MemberRole::Admin);
    }
}
