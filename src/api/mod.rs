pub mod client;
pub mod auth;
pub mod users;
pub mod projects;
pub mod tasks;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Failure of a single backend call.
///
/// `Request` displays as the bare message so callers can show the
/// server-supplied text (e.g. "Duplicate username") unchanged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Request { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl ApiError {
    /// Human-readable message without the variant prefix for `Request`.
    pub fn message(&self) -> String {
        match self {
            ApiError::Request { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status for errors the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Network(error.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Drop the stored token when an authenticated call comes back 401.
    pub clear_token_on_unauthorized: bool,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Origin without a trailing slash, ready for `format!("{}{}", base, path)`.
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            clear_token_on_unauthorized: true,
        }
    }
}

/// Opaque identifier of a user, project or task.
///
/// The backend is free to send ids as JSON strings or numbers; both are
/// accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id as a single URL path segment.
    pub(crate) fn path_segment(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => ResourceId(text),
            RawId::Number(number) => ResourceId(number.to_string()),
        })
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

// Re-export common types and functions
pub use auth::{AuthApi, LoginResponse};
pub use client::{ApiClient, ApiRequest, RequestBody};
pub use projects::{NewProject, Project, ProjectUpdate, ProjectsApi};
pub use tasks::{Task, TaskForm, TasksApi};
pub use users::{NewUser, User, UserUpdate, UsersApi};
