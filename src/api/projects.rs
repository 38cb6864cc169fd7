use super::{ApiClient, ApiResult, ResourceId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const PROJECTS_PATH: &str = "/projects";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Project {
    pub id: ResourceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub struct ProjectsApi {
    client: ApiClient,
}

impl ProjectsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.client
            .get(PROJECTS_PATH, "Failed to fetch projects")
            .await
    }

    pub async fn get_project(&self, project_id: &ResourceId) -> ApiResult<Project> {
        self.client
            .get(&project_path(project_id), "Failed to get project")
            .await
    }

    pub async fn create_project(&self, project: &NewProject) -> ApiResult<Project> {
        self.client
            .post(PROJECTS_PATH, project, "Failed to create project")
            .await
    }

    pub async fn update_project(
        &self,
        project_id: &ResourceId,
        update: &ProjectUpdate,
    ) -> ApiResult<Project> {
        self.client
            .put(&project_path(project_id), update, "Failed to update project")
            .await
    }

    pub async fn delete_project(&self, project_id: &ResourceId) -> ApiResult<bool> {
        self.client
            .delete(&project_path(project_id), "Failed to delete project")
            .await
    }
}

fn project_path(project_id: &ResourceId) -> String {
    format!("{}/{}", PROJECTS_PATH, project_id.path_segment())
}
