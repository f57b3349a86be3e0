//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, project_handler};
use crate::domain::{InviteOutcome, MemberRole, Project, ProjectMember, ProjectStatus, UserResponse};
use crate::services::{AuthSession, IssuedToken};

/// OpenAPI documentation for the ProjectStack API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ProjectStack API",
        version = "0.1.0",
        description = "Authentication and membership-scoped project management",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::signin,
        auth_handler::signup,
        auth_handler::check,
        // Project endpoints
        project_handler::list_projects,
        project_handler::get_project,
        project_handler::create_project,
        project_handler::update_project,
        project_handler::invite_members,
        project_handler::delete_project,
    ),
    components(
        schemas(
            // Domain types
            UserResponse,
            Project,
            ProjectMember,
            ProjectStatus,
            MemberRole,
            InviteOutcome,
            // Auth types
            auth_handler::SigninRequest,
            auth_handler::SignupRequest,
            auth_handler::StatusResponse,
            AuthSession,
            IssuedToken,
            // Project handler types
            project_handler::CreateProjectRequest,
            project_handler::UpdateProjectRequest,
            project_handler::InviteRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signin, signup and service status"),
        (name = "Projects", description = "Projects visible to their members")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/signin"))
                        .build(),
                ),
            );
        }
    }
}
