//! Template programmer endpoints.

use crate::DnacClient;
use snmpfix_core::{
    ApiResponse, CreateTemplateRequest, DeployResponse, DeployTemplateRequest, DeploymentState,
    DeploymentStatus, DeploymentTarget, Project, Result, SnmpFixError, TaskHandle, Template,
    VersionTemplateRequest,
};
use tracing::{debug, warn};

const BASE: &str = "/dna/intent/api/v1/template-programmer";

/// Template programmer endpoints
pub struct TemplatesApi<'a> {
    client: &'a DnacClient,
}

impl<'a> TemplatesApi<'a> {
    pub(crate) const fn new(client: &'a DnacClient) -> Self {
        Self { client }
    }

    /// List template projects, optionally filtered by name
    pub async fn projects(&self, name: Option<&str>) -> Result<Vec<Project>> {
        let params: Vec<(&str, String)> = name
            .map(|n| vec![("name", n.to_string())])
            .unwrap_or_default();
        self.client
            .get_with_query(&format!("{BASE}/project"), &params)
            .await
    }

    /// Get a project by exact name
    pub async fn project(&self, name: &str) -> Result<Project> {
        self.projects(Some(name))
            .await?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| SnmpFixError::ProjectNotFound(name.to_string()))
    }

    /// Start creating `template` in the project `project_id`
    pub async fn create(&self, project_id: &str, template: &Template) -> Result<TaskHandle> {
        let request = CreateTemplateRequest::new(project_id, template);
        let reply: ApiResponse<TaskHandle> = self
            .client
            .post(&format!("{BASE}/project/{project_id}/template"), &request)
            .await?;
        Ok(reply.response)
    }

    /// Commit the current draft of a template as a new version
    pub async fn commit(&self, template_id: &str, comments: &str) -> Result<TaskHandle> {
        let request = VersionTemplateRequest {
            comments,
            template_id,
        };
        let reply: ApiResponse<TaskHandle> = self
            .client
            .post(&format!("{BASE}/template/version"), &request)
            .await?;
        Ok(reply.response)
    }

    /// Deploy a committed template to the given targets
    pub async fn deploy(
        &self,
        template_id: &str,
        targets: Vec<DeploymentTarget>,
    ) -> Result<DeployResponse> {
        if targets.is_empty() {
            return Err(SnmpFixError::Config("no deployment targets".into()));
        }
        let request = DeployTemplateRequest {
            template_id,
            target_info: targets,
        };
        self.client
            .post(&format!("{BASE}/template/deploy"), &request)
            .await
    }

    /// Get the status of a deployment
    pub async fn deployment_status(&self, deployment_id: &str) -> Result<DeploymentStatus> {
        self.client
            .get(&format!("{BASE}/template/deploy/status/{deployment_id}"))
            .await
    }

    /// Poll a deployment until it succeeds or fails.
    pub async fn wait_for_deployment(&self, deployment_id: &str) -> Result<DeploymentStatus> {
        let poll = self.client.poll();

        for attempt in 1..=poll.max_attempts {
            let status = self.deployment_status(deployment_id).await?;
            debug!(deployment = deployment_id, attempt, status = %status.status, "deployment status");

            match status.status {
                DeploymentState::Success => return Ok(status),
                DeploymentState::Failure => {
                    warn!(deployment = deployment_id, "deployment failed");
                    let detail = serde_json::to_string(&status.devices)
                        .unwrap_or_else(|_| status.status.to_string());
                    return Err(SnmpFixError::DeploymentFailed {
                        deployment_id: deployment_id.to_string(),
                        detail,
                    });
                }
                _ => tokio::time::sleep(poll.interval).await,
            }
        }

        Err(SnmpFixError::Timeout(poll.budget().as_secs()))
    }
}
