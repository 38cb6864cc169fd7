//! Client for the task board backend: an authenticated REST client with
//! typed user/project/task operations, the session token store, and the
//! route table with its navigation guard.

pub mod api;
pub mod app;
pub mod auth;

pub use api::{ApiClient, ApiConfig, ApiError, ApiResult, ResourceId};
pub use app::{Navigation, NavigationGuard, Router};
pub use auth::CredentialStore;
