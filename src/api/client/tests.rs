use super::*;
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Echo {
    name: String,
}

fn client_for(server: &MockServer, credentials: &CredentialStore) -> ApiClient {
    ApiClient::new(ApiConfig::new(server.uri()), credentials.clone())
}

#[tokio::test]
async fn attaches_bearer_token_and_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header("Authorization", "Bearer secret-jwt"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = CredentialStore::in_memory();
    credentials.set("secret-jwt");
    let client = client_for(&server, &credentials);

    let echo: Echo = client.get("/projects", "Failed to fetch projects").await.unwrap();
    assert_eq!(echo, Echo { name: "ok".to_string() });
}

#[tokio::test]
async fn sends_without_authorization_when_no_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, &CredentialStore::in_memory());
    let projects: Vec<Value> = client.get("/projects", "Failed to fetch projects").await.unwrap();
    assert!(projects.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn public_requests_never_carry_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "ok" })))
        .mount(&server)
        .await;

    let credentials = CredentialStore::in_memory();
    credentials.set("stale");
    let client = client_for(&server, &credentials);

    let request = ApiRequest::post("/auth/login")
        .json(&json!({ "username": "a", "password": "b" }))
        .unwrap()
        .public();
    let _: Echo = client.send(request).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn json_body_is_sent_unchanged() {
    let server = MockServer::start().await;
    let payload = json!({ "name": "Roadmap", "description": null, "tags": ["a", "b"] });
    Mock::given(method("PUT"))
        .and(path("/projects/5"))
        .and(body_json(payload.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Roadmap" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &CredentialStore::in_memory());
    let echo: Echo = client
        .put("/projects/5", &payload, "Failed to update project")
        .await
        .unwrap();
    assert_eq!(echo.name, "Roadmap");
}

#[tokio::test]
async fn multipart_body_leaves_content_type_to_the_transport() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "name": "t" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &CredentialStore::in_memory());
    let form = Form::new().text("title", "Write docs");
    let echo: Echo = client
        .post_form("/tasks", form, "Failed to create task")
        .await
        .unwrap();
    assert_eq!(echo.name, "t");
}

#[tokio::test]
async fn server_message_is_preferred() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/users"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Duplicate username" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, &CredentialStore::in_memory());
    let err = client
        .post::<Value, _>("/admin/users", &json!({ "username": "ann" }), "Failed to create user")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Request { status: 409, .. }));
    assert_eq!(err.message(), "Duplicate username");
}

#[tokio::test]
async fn plain_text_error_body_is_used_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/3"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Task not found\n"))
        .mount(&server)
        .await;

    let client = client_for(&server, &CredentialStore::in_memory());
    let err = client.delete("/tasks/3", "Failed to delete task").await.unwrap_err();
    assert_eq!(err.message(), "Task not found");
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(500).set_body_string("{\"message\": "))
        .mount(&server)
        .await;

    let client = client_for(&server, &CredentialStore::in_memory());
    let err = client
        .post::<Value, _>("/admin/users", &json!({}), "Failed to create user")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.message(), "Failed to create user");
}

#[tokio::test]
async fn empty_error_body_falls_back_to_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server, &CredentialStore::in_memory());
    let err = client
        .get::<Value>("/admin/users", "Failed to fetch users")
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Failed to fetch users");
}

#[tokio::test]
async fn empty_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server, &CredentialStore::in_memory());
    let err = client
        .get::<Echo>("/projects/1", "Failed to get project")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn mismatched_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "title": 1 })))
        .mount(&server)
        .await;

    let client = client_for(&server, &CredentialStore::in_memory());
    let err = client
        .get::<Echo>("/projects/1", "Failed to get project")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn delete_is_true_with_or_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/projects/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/projects/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Deleted"))
        .mount(&server)
        .await;

    let client = client_for(&server, &CredentialStore::in_memory());
    assert!(client.delete("/projects/1", "Failed to delete project").await.unwrap());
    assert!(client.delete("/projects/2", "Failed to delete project").await.unwrap());
}

#[tokio::test]
async fn unauthorized_response_clears_the_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Token expired" })))
        .mount(&server)
        .await;

    let credentials = CredentialStore::in_memory();
    credentials.set("expired");
    let client = client_for(&server, &credentials);

    let err = client
        .get::<Value>("/projects", "Failed to fetch projects")
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Token expired");
    assert!(!credentials.is_authenticated());
}

#[tokio::test]
async fn late_unauthorized_response_keeps_a_newer_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header("Authorization", "Bearer old-expired"))
        .respond_with(
            ResponseTemplate::new(401).set_delay(std::time::Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let credentials = CredentialStore::in_memory();
    credentials.set("old-expired");
    let client = client_for(&server, &credentials);

    let pending = tokio::spawn(async move {
        client
            .get::<Value>("/projects", "Failed to fetch projects")
            .await
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    credentials.set("fresh-after-login");

    let err = pending.await.unwrap().unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(credentials.get().as_deref(), Some("fresh-after-login"));
}

#[tokio::test]
async fn unauthorized_response_keeps_token_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let credentials = CredentialStore::in_memory();
    credentials.set("kept");
    let config = ApiConfig {
        clear_token_on_unauthorized: false,
        ..ApiConfig::new(server.uri())
    };
    let client = ApiClient::new(config, credentials.clone());

    let _ = client.get::<Value>("/projects", "Failed to fetch projects").await;
    assert_eq!(credentials.get().as_deref(), Some("kept"));
}

#[tokio::test]
async fn connection_failure_is_a_network_error() {
    // Port 9 (discard) is not expected to accept HTTP connections.
    let client = ApiClient::new(
        ApiConfig::new("http://127.0.0.1:9"),
        CredentialStore::in_memory(),
    );

    let err = client
        .get::<Value>("/projects", "Failed to fetch projects")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.status(), None);
}

#[test]
fn error_message_precedence() {
    let fallback = "Failed to get tasks";
    assert_eq!(error_message(r#"{"message":"Nope"}"#, fallback), "Nope");
    assert_eq!(error_message(r#"{"error":"Bad id"}"#, fallback), "Bad id");
    assert_eq!(
        error_message(r#"{"message":"","error":"Bad id"}"#, fallback),
        "Bad id"
    );
    assert_eq!(error_message(r#"{"code":7}"#, fallback), fallback);
    assert_eq!(error_message("[1,2", fallback), fallback);
    assert_eq!(error_message("   ", fallback), fallback);
    assert_eq!(error_message("Forbidden", fallback), "Forbidden");
}
