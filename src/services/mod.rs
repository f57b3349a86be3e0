//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
pub mod container;
mod project_service;
mod token_service;

#[cfg(test)]
mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, AuthSession, Authenticator, AUTH_STATUS_MESSAGE};
pub use project_service::{ProjectManager, ProjectService};
pub use token_service::{Claims, IssuedToken, JwtTokenService, TokenService};
