//! Authentication service - signin, signup and service status.
//!
//! DDD: Uses domain Password value object for hashing.
//! DDD: Uses Unit of Work for repository access.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::token_service::{IssuedToken, TokenService};
use crate::config::DUMMY_PASSWORD_HASH;
use crate::domain::{validation, NewUser, Password, UserProfile, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Returned by signin and signup: a token plus the public profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    #[serde(flatten)]
    pub token: IssuedToken,
    pub user: UserResponse,
}

/// Liveness message reported by the check endpoint
pub const AUTH_STATUS_MESSAGE: &str = "Authentication service is running";

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials and open a session
    async fn authenticate(&self, email: String, password: String) -> AppResult<AuthSession>;

    /// Create an account and open a session for it
    async fn register(
        &self,
        email: String,
        password: String,
        profile: UserProfile,
    ) -> AppResult<AuthSession>;

    /// Static liveness message
    fn check_status(&self) -> &'static str;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: Arc<dyn TokenService>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, tokens: Arc<dyn TokenService>) -> Self {
        Self { uow, tokens }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn authenticate(&self, email: String, password: String) -> AppResult<AuthSession> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("Email and password are required"));
        }
        tracing::info!(email = %email, "Signin attempt");

        let user = self.uow.users().find_by_email(&email).await?;

        // Unknown emails still pay for one hash verification
        let stored_hash = user
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(DUMMY_PASSWORD_HASH);
        let password_valid = Password::from_hash(stored_hash).verify(&password);

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                tracing::warn!(email = %email, "Signin failed: invalid credentials");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "Signin successful");

        Ok(AuthSession {
            token,
            user: UserResponse::from(user),
        })
    }

    async fn register(
        &self,
        email: String,
        password: String,
        profile: UserProfile,
    ) -> AppResult<AuthSession> {
        let email = validation::normalize_email(&email)?;
        tracing::info!(email = %email, "Signup attempt");

        if self.uow.users().find_by_email(&email).await?.is_some() {
            tracing::warn!(email = %email, "Signup rejected: email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let name = validation::display_name(profile.name.as_deref(), &email)?;
        let phone = validation::phone(profile.phone.as_deref())?;
        let password_hash = Password::new(&password)?.into_string();

        let user = self
            .uow
            .users()
            .create(NewUser {
                email,
                password_hash,
                name,
                phone,
            })
            .await?;

        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "Signup successful");

        Ok(AuthSession {
            token,
            user: UserResponse::from(user),
        })
    }

    fn check_status(&self) -> &'static str {
        AUTH_STATUS_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::User;
    use crate::infra::{MockProjectRepository, MockUserRepository};
    use crate::services::test_support::TestUnitOfWork;
    use crate::services::JwtTokenService;
    use tokio_test::assert_ok;
    use uuid::Uuid;

    fn tokens() -> Arc<dyn TokenService> {
        let config =
            Config::new("sqlite::memory:", "test-secret-key-for-testing-only-32chars").unwrap();
        Arc::new(JwtTokenService::new(&config))
    }

    fn service(users: MockUserRepository) -> Authenticator<TestUnitOfWork> {
        let uow = TestUnitOfWork::new(users, MockProjectRepository::new());
        Authenticator::new(Arc::new(uow), tokens())
    }

    fn stored_user(email: &str, password: &str) -> User {
        let hash = Password::new(password).unwrap().into_string();
        User::new(Uuid::new_v4(), email.into(), hash, "Ada".into(), None)
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let user = stored_user("a@x.com", "pw1");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "a@x.com")
            .returning(move |_| Ok(Some(user.clone())));

        let session = assert_ok!(
            service(repo)
                .authenticate(" A@x.com ".into(), "pw1".into())
                .await
        );

        assert_eq!(session.user.email, "a@x.com");
        assert_eq!(session.token.token_type, "Bearer");
        assert!(!session.token.token.is_empty());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let user = stored_user("a@x.com", "pw1");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let result = service(repo)
            .authenticate("a@x.com".into(), "pw2".into())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let result = service(repo)
            .authenticate("ghost@x.com".into(), "pw1".into())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_requires_both_fields() {
        let repo = MockUserRepository::new();
        let result = service(repo).authenticate("".into(), "".into()).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_creates_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|new_user| {
                new_user.email == "b@x.com"
                    && new_user.name == "b"
                    && new_user.password_hash.starts_with("$argon2")
            })
            .returning(|new_user| {
                Ok(User::new(
                    Uuid::new_v4(),
                    new_user.email,
                    new_user.password_hash,
                    new_user.name,
                    new_user.phone,
                ))
            });

        let session = assert_ok!(
            service(repo)
                .register("B@x.com".into(), "pw1".into(), UserProfile::default())
                .await
        );

        assert_eq!(session.user.email, "b@x.com");
        assert_eq!(session.user.name, "b");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_wins_over_bad_password() {
        let existing = stored_user("a@x.com", "pw1");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_create().never();

        let result = service(repo)
            .register("a@x.com".into(), "".into(), UserProfile::default())
            .await;

        assert!(matches!(result, Err(AppError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().never();

        let result = service(repo)
            .register("nope".into(), "pw1".into(), UserProfile::default())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_empty_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().never();

        let result = service(repo)
            .register("c@x.com".into(), "".into(), UserProfile::default())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_check_status() {
        let service = service(MockUserRepository::new());
        assert_eq!(service.check_status(), "Authentication service is running");
    }
}
