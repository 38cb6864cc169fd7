use super::{ApiClient, ApiError, ApiResult, ResourceId};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const TASKS_PATH: &str = "/tasks";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Task {
    pub id: ResourceId,
    #[serde(default, alias = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone)]
struct Attachment {
    field: String,
    file_name: String,
    bytes: Vec<u8>,
    mime: Option<String>,
}

/// Multipart payload for task create/update.
///
/// Fields and files are forwarded in insertion order; the form is only
/// turned into a transport body when the request is sent.
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    fields: Vec<(String, String)>,
    attachments: Vec<Attachment>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        mime: Option<&str>,
    ) -> Self {
        self.attachments.push(Attachment {
            field: name.into(),
            file_name: file_name.into(),
            bytes,
            mime: mime.map(str::to_string),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.attachments.is_empty()
    }

    pub fn into_form(self) -> ApiResult<Form> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for attachment in self.attachments {
            let mut part = Part::bytes(attachment.bytes).file_name(attachment.file_name);
            if let Some(mime) = attachment.mime {
                part = part.mime_str(&mime).map_err(|e| {
                    ApiError::InvalidPayload(format!("Invalid MIME type {}: {}", mime, e))
                })?;
            }
            form = form.part(attachment.field, part);
        }
        Ok(form)
    }
}

pub struct TasksApi {
    client: ApiClient,
}

impl TasksApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_tasks_by_project(&self, project_id: &ResourceId) -> ApiResult<Vec<Task>> {
        let endpoint = format!("{}/project/{}", TASKS_PATH, project_id.path_segment());
        self.client.get(&endpoint, "Failed to get tasks").await
    }

    pub async fn create_task(&self, task: TaskForm) -> ApiResult<Task> {
        self.client
            .post_form(TASKS_PATH, task.into_form()?, "Failed to create task")
            .await
    }

    pub async fn update_task(&self, task_id: &ResourceId, task: TaskForm) -> ApiResult<Task> {
        self.client
            .put_form(&task_path(task_id), task.into_form()?, "Failed to update task")
            .await
    }

    pub async fn delete_task(&self, task_id: &ResourceId) -> ApiResult<bool> {
        self.client
            .delete(&task_path(task_id), "Failed to delete task")
            .await
    }
}

fn task_path(task_id: &ResourceId) -> String {
    format!("{}/{}", TASKS_PATH, task_id.path_segment())
}
