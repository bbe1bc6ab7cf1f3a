//! Payloads exchanged with the controller's task, file and template APIs.

use super::{DeviceType, Template};
use serde::{Deserialize, Serialize};

/// Standard `{"response": ..., "version": ...}` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Wrapped payload
    pub response: T,

    /// API version string
    #[serde(default)]
    pub version: Option<String>,
}

/// Reference to an asynchronous controller task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskHandle {
    /// Task identifier
    pub task_id: String,

    /// Relative URL of the task resource
    #[serde(default)]
    pub url: Option<String>,
}

/// Progress of an asynchronous controller task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    /// Task identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Free-form progress text
    #[serde(default)]
    pub progress: Option<String>,

    /// Completion time (epoch milliseconds); set once the task has finished
    #[serde(default)]
    pub end_time: Option<i64>,

    /// Whether the task ended in error
    #[serde(default)]
    pub is_error: bool,

    /// Failure description when `is_error` is set
    #[serde(default)]
    pub failure_reason: Option<String>,

    /// Link to the task's result, e.g. `/api/v1/file/<file id>`
    #[serde(default, rename = "additionalStatusURL")]
    pub additional_status_url: Option<String>,

    /// Task-specific result data
    #[serde(default)]
    pub data: Option<String>,
}

impl TaskStatus {
    /// Returns true once the controller reports an end time
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    /// File identifier carried in the result link, if any
    #[must_use]
    pub fn file_id(&self) -> Option<&str> {
        self.additional_status_url
            .as_deref()?
            .rsplit('/')
            .find(|segment| !segment.is_empty())
    }

    /// Human readable progress line
    #[must_use]
    pub fn progress_text(&self) -> &str {
        self.progress.as_deref().unwrap_or("Not Started")
    }
}

/// Body of a configuration export request
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest<'a> {
    /// Devices to export
    pub device_id: Vec<&'a str>,

    /// Archive password
    pub password: &'a str,
}

impl std::fmt::Debug for ExportRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportRequest")
            .field("device_id", &self.device_id)
            .field("password", &"***")
            .finish()
    }
}

/// Template project with its templates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier
    pub id: String,

    /// Project name
    pub name: String,

    /// Templates in the project
    #[serde(default)]
    pub templates: Vec<TemplateSummary>,
}

impl Project {
    /// Find a template by exact name
    #[must_use]
    pub fn template(&self, name: &str) -> Option<&TemplateSummary> {
        self.templates.iter().find(|t| t.name == name)
    }
}

/// Template entry in a project listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSummary {
    /// Template name
    pub name: String,

    /// Template identifier
    pub id: String,
}

/// Body of a template creation request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest<'a> {
    /// Template name
    pub name: &'a str,

    /// Owning project
    pub project_id: &'a str,

    /// Template language
    pub language: String,

    /// Software type
    pub software_type: &'a str,

    /// Targeted device types
    pub device_types: &'a [DeviceType],

    /// Rendered template content
    pub template_content: &'a str,

    /// Template format version
    pub version: &'a str,
}

impl<'a> CreateTemplateRequest<'a> {
    /// Build a creation request for `template` inside `project_id`
    #[must_use]
    pub fn new(project_id: &'a str, template: &'a Template) -> Self {
        Self {
            name: &template.name,
            project_id,
            language: template.language.to_string(),
            software_type: &template.software_type,
            device_types: &template.device_types,
            template_content: &template.body,
            version: "2",
        }
    }
}

/// Body of a template version commit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionTemplateRequest<'a> {
    /// Commit comment
    pub comments: &'a str,

    /// Template to commit
    pub template_id: &'a str,
}

/// Body of a template deployment request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployTemplateRequest<'a> {
    /// Template to deploy
    pub template_id: &'a str,

    /// Devices to deploy to
    pub target_info: Vec<DeploymentTarget>,
}

/// One deployment target addressed by management IP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentTarget {
    /// Management IP address
    pub id: String,

    /// Target addressing type
    #[serde(rename = "type")]
    pub kind: String,

    /// Template parameters bound for this target
    pub params: TargetParams,
}

impl DeploymentTarget {
    /// Target a device by management IP, binding `$device_ip` to it
    #[must_use]
    pub fn managed_device_ip(ip: impl Into<String>) -> Self {
        let ip = ip.into();
        Self {
            id: ip.clone(),
            kind: "MANAGED_DEVICE_IP".to_string(),
            params: TargetParams { device_ip: ip },
        }
    }
}

/// Template parameters for a deployment target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetParams {
    /// Value bound to `$device_ip`
    pub device_ip: String,
}

/// Reply to a deployment request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResponse {
    /// Deployment reference, e.g. `"Deployment of template...: <uuid>"`
    pub deployment_id: String,
}

impl DeployResponse {
    /// The bare deployment identifier at the end of the reference
    #[must_use]
    pub fn id(&self) -> &str {
        self.deployment_id
            .rsplit(':')
            .next()
            .unwrap_or(&self.deployment_id)
            .trim()
    }
}

/// State of a template deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentState {
    /// Deployment accepted
    Init,
    /// Deployment running
    InProgress,
    /// Deployment finished on every target
    Success,
    /// Deployment failed
    Failure,
    /// Any state this client does not know about
    #[serde(other)]
    Unknown,
}

impl DeploymentState {
    /// Returns true if the deployment has reached a final state
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

impl std::fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init => write!(f, "INIT"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Success => write!(f, "SUCCESS"),
            Self::Failure => write!(f, "FAILURE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Deployment status report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatus {
    /// Deployment identifier
    #[serde(default)]
    pub deployment_id: Option<String>,

    /// Overall state
    pub status: DeploymentState,

    /// Per-device results as reported by the controller
    #[serde(default)]
    pub devices: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_file_id() {
        let status: TaskStatus = serde_json::from_str(
            r#"{
                "progress": "Device configuration export completed",
                "endTime": 1700000000000,
                "isError": false,
                "additionalStatusURL": "/api/v1/file/7c2e-41aa"
            }"#,
        )
        .unwrap();
        assert!(status.is_finished());
        assert_eq!(status.file_id(), Some("7c2e-41aa"));
    }

    #[test]
    fn test_running_task_has_no_end() {
        let status: TaskStatus = serde_json::from_str(r#"{"progress": "In progress"}"#).unwrap();
        assert!(!status.is_finished());
        assert_eq!(status.file_id(), None);
    }

    #[test]
    fn test_deploy_response_id() {
        let reply = DeployResponse {
            deployment_id: "Deployment of  Template: snmp-fix.  ApproxDeploymentTime: 1 min. DeploymentId: 0d1e-99".into(),
        };
        assert_eq!(reply.id(), "0d1e-99");

        let bare = DeployResponse {
            deployment_id: "0d1e-99".into(),
        };
        assert_eq!(bare.id(), "0d1e-99");
    }

    #[test]
    fn test_deployment_target_shape() {
        let target = DeploymentTarget::managed_device_ip("10.0.0.1");
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "10.0.0.1",
                "type": "MANAGED_DEVICE_IP",
                "params": {"device_ip": "10.0.0.1"}
            })
        );
    }

    #[test]
    fn test_unknown_deployment_state() {
        let status: DeploymentStatus =
            serde_json::from_str(r#"{"status": "SCHEDULED"}"#).unwrap();
        assert_eq!(status.status, DeploymentState::Unknown);
        assert!(!status.status.is_done());
    }
}
