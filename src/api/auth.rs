use super::{ApiClient, ApiRequest, ApiResult};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token.
    ///
    /// The token is returned, not stored; the caller decides whether to
    /// keep the session (see [`AuthApi::sign_in`]).
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let request = ApiRequest::post("/auth/login")
            .json(&LoginRequest { username, password })?
            .public()
            .failure_message("Login failed");
        self.client.send(request).await
    }

    /// Log in and keep the returned token in the credential store.
    pub async fn sign_in(&self, username: &str, password: &str) -> ApiResult<()> {
        let response = self.login(username, password).await?;
        self.client.credentials().set(response.token);
        info!("Signed in as {}", username);
        Ok(())
    }

    pub fn logout(&self) {
        self.client.credentials().clear();
        info!("Signed out");
    }
}
