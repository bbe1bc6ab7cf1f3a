//! Controller capabilities backed by the DNA Center REST API.

use crate::DnacClient;
use async_trait::async_trait;
use snmpfix_core::{
    ArchiveExport, ArchiveSecret, ConfigurationArchive, DeploymentStatus, DeploymentTarget,
    Device, DeviceFilter, DeviceInventory, LocationFilter, Provisioning, Result, SnmpFixError,
    Template, TemplateId, TemplateUpload,
};
use tracing::{debug, info};

/// Comment attached to committed template versions
const COMMIT_COMMENT: &str = "Commit via API";

#[async_trait]
impl DeviceInventory for DnacClient {
    async fn list_devices(
        &self,
        filter: &DeviceFilter,
        locations: &LocationFilter,
    ) -> Result<Vec<Device>> {
        self.devices().list_in(filter, locations).await
    }
}

#[async_trait]
impl ArchiveExport for DnacClient {
    async fn request_archive(
        &self,
        devices: &[Device],
        secret: &ArchiveSecret,
    ) -> Result<ConfigurationArchive> {
        let ids: Vec<&str> = devices.iter().map(|d| d.id.as_str()).collect();
        let task = self.archive().export(&ids, secret).await?;
        debug!(task = %task.task_id, devices = ids.len(), "configuration export started");

        let status = self.tasks().wait(&task.task_id).await?;
        let file_id = status.file_id().ok_or_else(|| {
            SnmpFixError::Format(format!(
                "export task {} finished without a result file",
                task.task_id
            ))
        })?;

        let bytes = self.files().download(file_id).await?;
        info!(devices = ids.len(), bytes = bytes.len(), "configuration archive downloaded");
        Ok(ConfigurationArchive::new(bytes))
    }
}

#[async_trait]
impl TemplateUpload for DnacClient {
    async fn create_template(&self, project_name: &str, template: &Template) -> Result<TemplateId> {
        let templates = self.templates();
        let project = templates.project(project_name).await?;
        if project.template(&template.name).is_some() {
            return Err(SnmpFixError::TemplateNameConflict {
                project: project_name.to_string(),
                template: template.name.clone(),
            });
        }

        let task = templates.create(&project.id, template).await?;
        self.tasks().wait(&task.task_id).await?;

        let project = templates.project(project_name).await?;
        let template_id = project
            .template(&template.name)
            .map(|t| TemplateId::from(t.id.as_str()))
            .ok_or_else(|| {
                SnmpFixError::Internal(format!(
                    "template '{}' missing from project '{project_name}' after creation",
                    template.name
                ))
            })?;

        let task = templates.commit(template_id.as_str(), COMMIT_COMMENT).await?;
        self.tasks().wait(&task.task_id).await?;

        info!(template = %template.name, id = %template_id, "template created and committed");
        Ok(template_id)
    }
}

#[async_trait]
impl Provisioning for DnacClient {
    async fn deploy(
        &self,
        template_id: &TemplateId,
        devices: &[Device],
    ) -> Result<DeploymentStatus> {
        let targets = devices
            .iter()
            .map(|d| DeploymentTarget::managed_device_ip(d.management_ip_address.as_str()))
            .collect();

        let templates = self.templates();
        let reply = templates.deploy(template_id.as_str(), targets).await?;
        info!(deployment = reply.id(), targets = devices.len(), "deployment started");

        templates.wait_for_deployment(reply.id()).await
    }
}
