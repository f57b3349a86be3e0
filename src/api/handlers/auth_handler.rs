//! Authentication handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::domain::UserProfile;
use crate::errors::AppResult;
use crate::services::AuthSession;

/// Signup request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// User email address
    #[serde(default)]
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// User password
    #[serde(default)]
    #[schema(example = "correct horse battery staple")]
    pub password: String,
    /// Display name; defaults to the email's local part
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    /// Contact phone number
    #[schema(example = "+1 555 0100")]
    pub phone: Option<String>,
}

/// Signin request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SigninRequest {
    /// User email address
    #[serde(default)]
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// User password
    #[serde(default)]
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

/// Auth liveness response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "Authentication service is running")]
    pub message: String,
    pub ok: bool,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signin", post(signin))
        .route("/signup", post(signup))
        .route("/check", get(check))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/signin",
    tag = "Authentication",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signin successful", body = AuthSession),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SigninRequest>,
) -> AppResult<Json<AuthSession>> {
    let session = state
        .auth_service
        .authenticate(payload.email, payload.password)
        .await?;

    Ok(Json(session))
}

/// Create an account and sign in
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = AuthSession),
        (status = 400, description = "Validation error or email already in use")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> AppResult<Json<AuthSession>> {
    let profile = UserProfile {
        name: payload.name,
        phone: payload.phone,
    };
    let session = state
        .auth_service
        .register(payload.email, payload.password, profile)
        .await?;

    Ok(Json(session))
}

/// Authentication service liveness
#[utoipa::path(
    get,
    path = "/api/auth/check",
    tag = "Authentication",
    responses(
        (status = 200, description = "Service is running", body = StatusResponse)
    )
)]
pub async fn check(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        message: state.auth_service.check_status().to_string(),
        ok: true,
    })
}
