//! Controller operations the remediation pipeline depends on.
//!
//! The pipeline never talks HTTP itself. It is generic over these traits, which
//! the DNA Center client implements and tests replace with in-memory fakes.

use crate::{
    ArchiveSecret, ConfigurationArchive, DeploymentStatus, Device, DeviceFilter, LocationFilter,
    Result, Template, TemplateId,
};
use async_trait::async_trait;

/// Device inventory lookup
#[async_trait]
pub trait DeviceInventory: Send + Sync {
    /// Devices matching every set criterion of `filter` and located in one of
    /// `locations` (an empty location filter does not restrict).
    async fn list_devices(
        &self,
        filter: &DeviceFilter,
        locations: &LocationFilter,
    ) -> Result<Vec<Device>>;
}

/// Configuration export
#[async_trait]
pub trait ArchiveExport: Send + Sync {
    /// Export the running configurations of `devices`, encrypted with
    /// `secret`, and return the finished archive.
    async fn request_archive(
        &self,
        devices: &[Device],
        secret: &ArchiveSecret,
    ) -> Result<ConfigurationArchive>;
}

/// Template creation
#[async_trait]
pub trait TemplateUpload: Send + Sync {
    /// Create and commit `template` under `project_name`.
    ///
    /// Fails with [`SnmpFixError::TemplateNameConflict`](crate::SnmpFixError::TemplateNameConflict)
    /// if a template of the same name exists; existing templates are never
    /// modified.
    async fn create_template(&self, project_name: &str, template: &Template) -> Result<TemplateId>;
}

/// Template deployment
#[async_trait]
pub trait Provisioning: Send + Sync {
    /// Deploy a committed template to `devices` and wait for the outcome.
    async fn deploy(&self, template_id: &TemplateId, devices: &[Device])
        -> Result<DeploymentStatus>;
}

/// Everything a full remediation run needs from the controller
pub trait Controller: DeviceInventory + ArchiveExport + TemplateUpload + Provisioning {}

impl<T> Controller for T where T: DeviceInventory + ArchiveExport + TemplateUpload + Provisioning {}
