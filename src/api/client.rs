use super::{ApiConfig, ApiError, ApiResult};
use crate::auth::CredentialStore;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Body of an outgoing request.
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Structured data, sent as JSON text.
    Json(Value),
    /// Multipart form, sent as-is with the transport's boundary content type.
    Form(Form),
}

/// Everything needed to issue one backend call.
#[derive(Debug)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: RequestBody,
    requires_auth: bool,
    failure_message: String,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            requires_auth: true,
            failure_message: "Request failed".to_string(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<R: Serialize + ?Sized>(mut self, body: &R) -> ApiResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidPayload(format!("Failed to serialize body: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn form(mut self, form: Form) -> Self {
        self.body = RequestBody::Form(form);
        self
    }

    /// Send without credentials, e.g. the login call itself.
    pub fn public(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    /// Message reported when the server fails without saying why.
    pub fn failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
    credentials: CredentialStore,
}

impl ApiClient {
    pub fn new(config: ApiConfig, credentials: CredentialStore) -> Self {
        Self {
            client: Client::new(),
            config,
            credentials,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Issue `request` and decode a successful body as `T`.
    ///
    /// An empty or malformed body on a success status is a `Decode` error.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let response = self.execute(request).await?;

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response body: {}", e)))?;

        serde_json::from_str::<T>(&body)
            .map_err(|e| ApiError::Decode(format!("{}. Response body: {}", e, body)))
    }

    /// Issue `request` for an operation whose response carries no data.
    ///
    /// Any success status yields `true`, whatever the body holds.
    pub async fn send_without_body(&self, request: ApiRequest) -> ApiResult<bool> {
        self.execute(request).await?;
        Ok(true)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, failure: &str) -> ApiResult<T> {
        self.send(ApiRequest::get(endpoint).failure_message(failure))
            .await
    }

    pub async fn post<T: DeserializeOwned, R: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &R,
        failure: &str,
    ) -> ApiResult<T> {
        self.send(ApiRequest::post(endpoint).json(body)?.failure_message(failure))
            .await
    }

    pub async fn put<T: DeserializeOwned, R: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &R,
        failure: &str,
    ) -> ApiResult<T> {
        self.send(ApiRequest::put(endpoint).json(body)?.failure_message(failure))
            .await
    }

    pub async fn delete(&self, endpoint: &str, failure: &str) -> ApiResult<bool> {
        self.send_without_body(ApiRequest::delete(endpoint).failure_message(failure))
            .await
    }

    pub async fn post_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: Form,
        failure: &str,
    ) -> ApiResult<T> {
        self.send(ApiRequest::post(endpoint).form(form).failure_message(failure))
            .await
    }

    pub async fn put_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: Form,
        failure: &str,
    ) -> ApiResult<T> {
        self.send(ApiRequest::put(endpoint).form(form).failure_message(failure))
            .await
    }

    // Sends the request and turns every non-success status into an error.
    async fn execute(&self, request: ApiRequest) -> ApiResult<Response> {
        let ApiRequest {
            method,
            path,
            body,
            requires_auth,
            failure_message,
        } = request;

        let url = format!("{}{}", self.config.origin(), path);
        debug!("{} {}", method, url);

        let mut builder = self.client.request(method.clone(), &url);

        let token = if requires_auth {
            self.credentials.get()
        } else {
            None
        };
        match &token {
            Some(token) => builder = builder.bearer_auth(token),
            None if requires_auth => {
                debug!("No token stored, sending {} {} without credentials", method, path)
            }
            None => {}
        }

        builder = match body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, "application/json"),
            RequestBody::Json(value) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(value.to_string()),
            RequestBody::Form(form) => builder.multipart(form),
        };

        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // A body we cannot read must not hide the status failure.
        let error_text = response.text().await.unwrap_or_default();
        let message = error_message(&error_text, &failure_message);
        warn!("{} {} failed with status {}: {}", method, path, status, message);

        // Only the token this request carried is cleared; a newer login stays.
        if let Some(sent) = token.as_deref() {
            if status == StatusCode::UNAUTHORIZED
                && self.config.clear_token_on_unauthorized
                && self.credentials.clear_if(sent)
            {
                warn!("Stored token was rejected, cleared session");
            }
        }

        Err(ApiError::Request {
            status: status.as_u16(),
            message,
        })
    }
}

/// Pick the message for a failed response.
///
/// A JSON object's `message` (then `error`) field wins; plain text is used
/// as-is; anything else, including an empty body or JSON we cannot read,
/// falls back to `fallback`.
pub(crate) fn error_message(body: &str, fallback: &str) -> String {
    let trimmed = body.trim();

    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(trimmed) {
        return ["message", "error"]
            .iter()
            .filter_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|message| !message.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());
    }

    if !trimmed.is_empty() && !trimmed.starts_with('{') && !trimmed.starts_with('[') {
        return trimmed.to_string();
    }

    fallback.to_string()
}

#[cfg(test)]
mod tests;
