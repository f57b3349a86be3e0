//! Project aggregate: project record plus its ordered membership list.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::validation;
use crate::config::{
    MEMBER_ROLE_ADMIN, MEMBER_ROLE_MANAGER, MEMBER_ROLE_MEMBER, PROJECT_STATUS_ACTIVE,
    PROJECT_STATUS_ARCHIVED, PROJECT_STATUS_COMPLETED, PROJECT_STATUS_ON_HOLD,
};
use crate::errors::{AppError, AppResult};

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    OnHold,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => PROJECT_STATUS_ACTIVE,
            ProjectStatus::Completed => PROJECT_STATUS_COMPLETED,
            ProjectStatus::OnHold => PROJECT_STATUS_ON_HOLD,
            ProjectStatus::Archived => PROJECT_STATUS_ARCHIVED,
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PROJECT_STATUS_ACTIVE => Ok(ProjectStatus::Active),
            PROJECT_STATUS_COMPLETED => Ok(ProjectStatus::Completed),
            PROJECT_STATUS_ON_HOLD => Ok(ProjectStatus::OnHold),
            PROJECT_STATUS_ARCHIVED => Ok(ProjectStatus::Archived),
            other => Err(AppError::validation(format!("Unknown project status: {}", other))),
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a member inside one project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Manager,
    #[default]
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => MEMBER_ROLE_ADMIN,
            MemberRole::Manager => MEMBER_ROLE_MANAGER,
            MemberRole::Member => MEMBER_ROLE_MEMBER,
        }
    }
}

impl FromStr for MemberRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            MEMBER_ROLE_ADMIN => Ok(MemberRole::Admin),
            MEMBER_ROLE_MANAGER => Ok(MemberRole::Manager),
            MEMBER_ROLE_MEMBER => Ok(MemberRole::Member),
            other => Err(AppError::validation(format!("Unknown member role: {}", other))),
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's membership in a project, with the profile fields clients display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    /// Member's user id
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

/// Project aggregate
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    #[schema(example = "Apollo")]
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    #[schema(example = json!(["Rust", "React"]))]
    pub tech_stack: Vec<String>,
    /// User who created the project
    pub owner_id: Uuid,
    /// Members in join order; the owner is always first
    pub members: Vec<ProjectMember>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Whether the user may read and modify this project
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.members.iter().any(|m| m.id == user_id)
    }

    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

/// Project creation input as received from a client
#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub tech_stack: Option<Vec<String>>,
}

/// Validated project creation data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub tech_stack: Vec<String>,
}

impl ProjectDraft {
    pub fn validate(self) -> AppResult<NewProject> {
        Ok(NewProject {
            name: validation::project_name(&self.name)?,
            description: validation::project_description(
                self.description.as_deref().unwrap_or_default(),
            )?,
            status: self.status.unwrap_or_default(),
            tech_stack: validation::tech_stack(self.tech_stack.unwrap_or_default())?,
        })
    }
}

/// Partial update of a project's mutable fields; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub tech_stack: Option<Vec<String>>,
}

impl ProjectChanges {
    pub fn validate(self) -> AppResult<ProjectChanges> {
        Ok(ProjectChanges {
            name: self.name.as_deref().map(validation::project_name).transpose()?,
            description: self
                .description
                .as_deref()
                .map(validation::project_description)
                .transpose()?,
            status: self.status,
            tech_stack: self.tech_stack.map(validation::tech_stack).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.tech_stack.is_none()
    }
}

/// Request to add users to a project by email
#[derive(Debug, Clone, Default)]
pub struct Invitation {
    pub emails: Vec<String>,
    pub role: Option<MemberRole>,
}

impl Invitation {
    /// Normalized, deduplicated emails and the role to grant (default `member`)
    pub fn validate(self) -> AppResult<(Vec<String>, MemberRole)> {
        let emails = validation::invite_emails(self.emails)?;
        Ok((emails, self.role.unwrap_or_default()))
    }
}

/// Result of an invitation: who was added and which emails had no account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteOutcome {
    /// Emails of users newly added to the project
    pub added: Vec<String>,
    /// Emails already on the project
    pub already_members: Vec<String>,
    /// Emails without a registered account
    pub skipped: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: Uuid, role: MemberRole) -> ProjectMember {
        ProjectMember {
            id,
            name: "Member".into(),
            email: "m@x.com".into(),
            role,
            joined_at: Utc::now(),
        }
    }

    fn project(owner: Uuid) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Apollo".into(),
            description: String::new(),
            status: ProjectStatus::Active,
            tech_stack: vec![],
            owner_id: owner,
            members: vec![member(owner, MemberRole::Admin)],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_membership_predicates() {
        let owner = Uuid::new_v4();
        let invited = Uuid::new_v4();
        let mut p = project(owner);
        p.members.push(member(invited, MemberRole::Member));

        assert!(p.is_member(owner));
        assert!(p.is_member(invited));
        assert!(!p.is_member(Uuid::new_v4()));
        assert!(p.is_owner(owner));
        assert!(!p.is_owner(invited));
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&ProjectStatus::OnHold).unwrap(), "\"on-hold\"");
        assert_eq!("on-hold".parse::<ProjectStatus>().unwrap(), ProjectStatus::OnHold);
        assert!("paused".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_draft_defaults() {
        let new = ProjectDraft {
            name: " Apollo ".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(new.name, "Apollo");
        assert_eq!(new.status, ProjectStatus::Active);
        assert!(new.description.is_empty());
        assert!(new.tech_stack.is_empty());
    }

    #[test]
    fn test_draft_requires_name() {
        assert!(ProjectDraft::default().validate().is_err());
    }

    #[test]
    fn test_changes_validation() {
        let changes = ProjectChanges {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
        assert!(ProjectChanges::default().is_empty());
    }

    #[test]
    fn test_invitation_normalization() {
        let (emails, role) = Invitation {
            emails: vec!["B@x.com".into()],
            role: None,
        }
        .validate()
        .unwrap();
        assert_eq!(emails, vec!["b@x.com"]);
        assert_eq!(role, MemberRole::Member);

        let (_, role) = Invitation {
            emails: vec!["c@x.com".into()],
            role: Some(MemberRole::Manager),
        }
        .validate()
        .unwrap();
        assert_eq!(role, MemberRole::Manager);
    }
}
