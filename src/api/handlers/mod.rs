//! HTTP request handlers.

pub mod auth_handler;
pub mod health_handler;
pub mod project_handler;

pub use auth_handler::auth_routes;
pub use health_handler::health;
pub use project_handler::project_routes;
