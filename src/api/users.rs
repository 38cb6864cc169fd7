use super::{ApiClient, ApiResult, ResourceId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const USERS_PATH: &str = "/admin/users";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: ResourceId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Fields the server sends that the client does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Partial update; unset fields are left out of the request body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.client.get(USERS_PATH, "Failed to fetch users").await
    }

    pub async fn get_user(&self, id: &ResourceId) -> ApiResult<User> {
        self.client
            .get(&user_path(id), "Failed to fetch user by ID")
            .await
    }

    pub async fn create_user(&self, user: &NewUser) -> ApiResult<User> {
        self.client
            .post(USERS_PATH, user, "Failed to create user")
            .await
    }

    pub async fn update_user(&self, id: &ResourceId, update: &UserUpdate) -> ApiResult<User> {
        self.client
            .put(&user_path(id), update, "Failed to update user")
            .await
    }

    pub async fn delete_user(&self, id: &ResourceId) -> ApiResult<bool> {
        self.client
            .delete(&user_path(id), "Failed to delete user")
            .await
    }
}

fn user_path(id: &ResourceId) -> String {
    format!("{}/{}", USERS_PATH, id.path_segment())
}
