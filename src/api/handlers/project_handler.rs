//! Project handlers.
//!
//! All routes sit behind the auth middleware; the authenticated user's id
//! is passed into every service call.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::JsonBody;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    Invitation, InviteOutcome, MemberRole, Project, ProjectChanges, ProjectDraft, ProjectStatus,
};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, NoContent};

/// Project creation request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(default)]
    #[schema(example = "Apollo")]
    pub name: String,
    #[schema(example = "Landing page rebuild")]
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    #[schema(example = json!(["Rust", "React"]))]
    pub tech_stack: Option<Vec<String>>,
}

impl From<CreateProjectRequest> for ProjectDraft {
    fn from(req: CreateProjectRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            status: req.status,
            tech_stack: req.tech_stack,
        }
    }
}

/// Project update request; omitted fields stay unchanged
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub tech_stack: Option<Vec<String>>,
}

impl From<UpdateProjectRequest> for ProjectChanges {
    fn from(req: UpdateProjectRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            status: req.status,
            tech_stack: req.tech_stack,
        }
    }
}

/// Invitation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct InviteRequest {
    #[serde(default)]
    #[schema(example = json!(["grace@example.com"]))]
    pub emails: Vec<String>,
    /// Role granted to the invitees (default `member`)
    pub role: Option<MemberRole>,
}

/// Create project routes
pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route(
            "/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/:id/invites", post(invite_members))
}

/// Ids that are not UUIDs cannot name a project
fn parse_project_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

/// List projects the caller is a member of
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's projects, newest first", body = Vec<Project>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_projects(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Project>>> {
    let projects = state.project_service.list_projects(current_user.id).await?;
    Ok(Json(projects))
}

/// Get a project by id
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "Projects",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project", body = Project),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found or caller is not a member")
    )
)]
pub async fn get_project(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Project>> {
    let id = parse_project_id(&id)?;
    let project = state.project_service.get_project(id, current_user.id).await?;
    Ok(Json(project))
}

/// Create a project owned by the caller
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    security(("bearer_auth" = [])),
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Project created", body = Project),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_project(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateProjectRequest>,
) -> AppResult<Json<Project>> {
    let project = state
        .project_service
        .create_project(payload.into(), current_user.id)
        .await?;

    Ok(Json(project))
}

/// Update a project's fields
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    tag = "Projects",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Updated project", body = Project),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found or caller is not a member")
    )
)]
pub async fn update_project(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateProjectRequest>,
) -> AppResult<Json<Project>> {
    let id = parse_project_id(&id)?;
    let project = state
        .project_service
        .update_project(id, payload.into(), current_user.id)
        .await?;

    Ok(Json(project))
}

/// Invite registered users to a project
#[utoipa::path(
    post,
    path = "/api/projects/{id}/invites",
    tag = "Projects",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    request_body = InviteRequest,
    responses(
        (status = 200, description = "Invitations processed", body = InviteOutcome),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found or caller is not a member")
    )
)]
pub async fn invite_members(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<InviteRequest>,
) -> AppResult<Json<ApiResponse<InviteOutcome>>> {
    let id = parse_project_id(&id)?;
    let invitation = Invitation {
        emails: payload.emails,
        role: payload.role,
    };
    let outcome = state
        .project_service
        .invite_members(id, invitation, current_user.id)
        .await?;

    Ok(Json(ApiResponse::with_message(
        outcome,
        "Invitations sent successfully",
    )))
}

/// Delete a project (owner only)
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "Projects",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is a member but not the owner"),
        (status = 404, description = "Project not found or caller is not a member")
    )
)]
pub async fn delete_project(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<NoContent> {
    let id = parse_project_id(&id)?;
    state
        .project_service
        .delete_project(id, current_user.id)
        .await?;

    Ok(NoContent)
}
