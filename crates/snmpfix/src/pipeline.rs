//! The remediation run: inventory, export, classification, synthesis,
//! upload and deployment.

use crate::report::RunReport;
use serde::{Deserialize, Serialize};
use snmpfix_compliance::{
    aggregate_configs, decrypt, synthesize, CompliancePolicy, DecryptedConfigs, RemediationSet,
    Synthesis,
};
use snmpfix_core::{
    ArchiveSecret, Controller, DeploymentStatus, Device, DeviceFilter, LocationFilter, Result,
    SnmpFixError, Template, TemplateId,
};
use tracing::{info, warn};

/// Inputs of a remediation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Reference SNMP configuration
    pub policy: CompliancePolicy,

    /// Inventory filter
    #[serde(default)]
    pub devices: DeviceFilter,

    /// Site restriction; empty means every site
    #[serde(default)]
    pub locations: LocationFilter,

    /// Template project that receives the generated template
    pub project_name: String,

    /// Name of the generated template
    pub template_name: String,

    /// Devices per export request; 0 exports every device at once
    #[serde(default)]
    pub export_batch_size: usize,
}

impl RunConfig {
    /// Create a run configuration covering every device
    #[must_use]
    pub fn new(
        policy: CompliancePolicy,
        project_name: impl Into<String>,
        template_name: impl Into<String>,
    ) -> Self {
        Self {
            policy,
            devices: DeviceFilter::default(),
            locations: LocationFilter::default(),
            project_name: project_name.into(),
            template_name: template_name.into(),
            export_batch_size: 0,
        }
    }

    /// Set the inventory filter
    #[must_use]
    pub fn devices(mut self, filter: DeviceFilter) -> Self {
        self.devices = filter;
        self
    }

    /// Restrict the run to devices in the given sites
    #[must_use]
    pub fn locations(mut self, locations: impl Into<LocationFilter>) -> Self {
        self.locations = locations.into();
        self
    }

    /// Split configuration exports into batches of `size` devices
    #[must_use]
    pub const fn export_batch_size(mut self, size: usize) -> Self {
        self.export_batch_size = size;
        self
    }

    /// Check the configuration before anything is sent to the controller
    pub fn validate(&self) -> Result<()> {
        self.policy.validate()?;
        if self.project_name.trim().is_empty() {
            return Err(SnmpFixError::Config("template project name is not set".into()));
        }
        if self.template_name.trim().is_empty() {
            return Err(SnmpFixError::Config("template name is not set".into()));
        }
        Ok(())
    }
}

/// An export batch whose archive could not be produced or read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveFailure {
    /// Identifiers of the devices in the batch
    pub devices: Vec<String>,

    /// What went wrong
    pub reason: String,
}

/// Configurations gathered across all export batches
#[derive(Debug, Default)]
pub struct CollectedConfigs {
    /// Plaintext configurations keyed by management address
    pub configs: DecryptedConfigs,

    /// Batches that yielded nothing
    pub failures: Vec<ArchiveFailure>,
}

/// Everything known once the template has been synthesized
#[derive(Debug, Clone)]
pub struct Plan {
    /// Devices selected by the filters
    pub devices: Vec<Device>,

    /// Per-device outcome
    pub remediation: RemediationSet,

    /// Template to upload, if any device needs it
    pub synthesis: Synthesis,

    /// Export batches that failed
    pub failures: Vec<ArchiveFailure>,
}

impl Plan {
    /// Summarize the plan for output
    #[must_use]
    pub fn report(&self) -> RunReport {
        RunReport::from_plan(self)
    }
}

/// Drives a remediation run against a controller.
///
/// Each stage is exposed separately so a caller can stop after synthesis
/// (dry run) or after upload, and ask for confirmation before [`deploy`].
///
/// [`deploy`]: Remediator::deploy
pub struct Remediator<C> {
    controller: C,
    config: RunConfig,
}

impl<C: Controller> Remediator<C> {
    /// Create a remediator; fails if `config` does not validate
    pub fn new(controller: C, config: RunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { controller, config })
    }

    /// The run configuration
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The underlying controller
    pub const fn controller(&self) -> &C {
        &self.controller
    }

    /// Fetch the devices selected by the configured filters
    pub async fn inventory(&self) -> Result<Vec<Device>> {
        let devices = self
            .controller
            .list_devices(&self.config.devices, &self.config.locations)
            .await?;
        info!(devices = devices.len(), "device inventory retrieved");
        Ok(devices)
    }

    /// Export and decrypt the running configuration of every device.
    ///
    /// Devices without a management address are not exported and end up
    /// without configuration.
    ///
    /// One secret protects every batch of the run and is dropped once the
    /// last archive is decrypted. A batch whose archive fails is recorded and
    /// its devices end up without configuration; transport and
    /// authentication errors abort the run.
    pub async fn collect_configs(&self, devices: &[Device]) -> Result<CollectedConfigs> {
        let mut collected = CollectedConfigs::default();
        let (devices, unaddressed): (Vec<Device>, Vec<Device>) =
            devices.iter().cloned().partition(Device::has_address);
        for device in &unaddressed {
            warn!(device = %device.id, "device has no management address, skipping export");
        }
        if devices.is_empty() {
            return Ok(collected);
        }

        let batch_size = match self.config.export_batch_size {
            0 => devices.len(),
            n => n,
        };

        let secret = ArchiveSecret::generate();
        for batch in devices.chunks(batch_size) {
            match self.export_batch(batch, &secret).await {
                Ok(configs) => collected.configs.merge(configs),
                Err(err) if is_batch_scoped(&err) => {
                    warn!(devices = batch.len(), error = %err, "configuration export failed");
                    collected.failures.push(ArchiveFailure {
                        devices: batch.iter().map(|d| d.id.clone()).collect(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        drop(secret);

        info!(
            configs = collected.configs.len(),
            failed_batches = collected.failures.len(),
            "configurations collected"
        );
        Ok(collected)
    }

    async fn export_batch(
        &self,
        devices: &[Device],
        secret: &ArchiveSecret,
    ) -> Result<DecryptedConfigs> {
        let archive = self.controller.request_archive(devices, secret).await?;
        Ok(decrypt(&archive, secret)?)
    }

    /// Classify every device against the policy
    pub fn evaluate(&self, devices: &[Device], configs: &DecryptedConfigs) -> RemediationSet {
        let set = aggregate_configs(devices, configs, &self.config.policy);
        info!(
            compliant = set.compliant.len(),
            non_compliant = set.non_compliant.len(),
            no_config = set.no_config_found.len(),
            "compliance evaluated"
        );
        set
    }

    /// Render the remediation template under the configured name
    pub fn synthesize(&self, remediation: &RemediationSet) -> Synthesis {
        synthesize(remediation, &self.config.template_name)
    }

    /// Run every stage up to and including synthesis
    pub async fn plan(&self) -> Result<Plan> {
        let devices = self.inventory().await?;
        let collected = self.collect_configs(&devices).await?;
        let remediation = self.evaluate(&devices, &collected.configs);
        let synthesis = self.synthesize(&remediation);
        Ok(Plan {
            devices,
            remediation,
            synthesis,
            failures: collected.failures,
        })
    }

    /// Create and commit the template in the configured project
    pub async fn upload(&self, template: &Template) -> Result<TemplateId> {
        info!(
            project = %self.config.project_name,
            template = %template.name,
            "uploading template"
        );
        self.controller
            .create_template(&self.config.project_name, template)
            .await
    }

    /// Push a committed template to its target devices.
    ///
    /// Only call this after the operator has confirmed the change.
    pub async fn deploy(
        &self,
        template_id: &TemplateId,
        template: &Template,
    ) -> Result<DeploymentStatus> {
        if template.targets.is_empty() {
            return Err(SnmpFixError::Config(format!(
                "template '{}' has no target devices",
                template.name
            )));
        }
        info!(template = %template_id, targets = template.targets.len(), "deploying template");
        self.controller.deploy(template_id, &template.targets).await
    }
}

const fn is_batch_scoped(err: &SnmpFixError) -> bool {
    err.is_archive_error() || matches!(err, SnmpFixError::TaskFailed { .. })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use snmpfix_core::{
        ArchiveExport, ConfigurationArchive, DeploymentState, DeviceInventory, Provisioning,
        TemplateUpload,
    };
    use std::collections::BTreeMap;
    use std::io::{Cursor, Write};
    use std::sync::Mutex;
    use zip::write::SimpleFileOptions;
    use zip::{AesMode, ZipWriter};

    const VALID: &str = "snmp-server host 10.0.0.5 version 2c rightcommunity";

    #[derive(Default)]
    struct FakeController {
        devices: Vec<Device>,
        configs: BTreeMap<String, String>,
        corrupt: Vec<String>,
        unauthorized_export: bool,
        existing_templates: Vec<String>,
        secrets: Mutex<Vec<String>>,
        exported: Mutex<Vec<String>>,
        uploaded: Mutex<Vec<Template>>,
        deployed: Mutex<Vec<Vec<String>>>,
    }

    impl FakeController {
        fn with_devices(devices: &[(&str, &str, Option<&str>)]) -> Self {
            let mut fake = Self::default();
            for (id, ip, config) in devices {
                fake.devices
                    .push(Device::new(*id, *ip).with_type("Switches and Hubs", "Catalyst 9300"));
                if let Some(text) = config {
                    fake.configs.insert((*ip).to_string(), (*text).to_string());
                }
            }
            fake
        }
    }

    #[async_trait]
    impl DeviceInventory for FakeController {
        async fn list_devices(
            &self,
            filter: &DeviceFilter,
            _locations: &LocationFilter,
        ) -> Result<Vec<Device>> {
            Ok(self
                .devices
                .iter()
                .filter(|d| filter.matches(d))
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl ArchiveExport for FakeController {
        async fn request_archive(
            &self,
            devices: &[Device],
            secret: &ArchiveSecret,
        ) -> Result<ConfigurationArchive> {
            if self.unauthorized_export {
                return Err(SnmpFixError::Unauthorized);
            }
            self.secrets
                .lock()
                .unwrap()
                .push(secret.expose().to_string());
            self.exported
                .lock()
                .unwrap()
                .extend(devices.iter().map(|d| d.id.clone()));
            if devices.iter().any(|d| self.corrupt.contains(&d.id)) {
                return Ok(ConfigurationArchive::new(b"truncated".to_vec()));
            }

            let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
            let options = SimpleFileOptions::default()
                .with_aes_encryption(AesMode::Aes256, secret.expose());
            for device in devices {
                if let Some(text) = self.configs.get(&device.management_ip_address) {
                    let name = format!("{}/{}_RUNNINGCONFIG.cfg", device.management_ip_address, device.id);
                    writer.start_file(name, options).unwrap();
                    writer.write_all(text.as_bytes()).unwrap();
                }
            }
            Ok(ConfigurationArchive::new(
                writer.finish().unwrap().into_inner(),
            ))
        }
    }

    #[async_trait]
    impl TemplateUpload for FakeController {
        async fn create_template(
            &self,
            project_name: &str,
            template: &Template,
        ) -> Result<TemplateId> {
            if self.existing_templates.contains(&template.name) {
                return Err(SnmpFixError::TemplateNameConflict {
                    project: project_name.to_string(),
                    template: template.name.clone(),
                });
            }
            self.uploaded.lock().unwrap().push(template.clone());
            Ok(TemplateId::from("tmpl-1"))
        }
    }

    #[async_trait]
    impl Provisioning for FakeController {
        async fn deploy(
            &self,
            template_id: &TemplateId,
            devices: &[Device],
        ) -> Result<DeploymentStatus> {
            self.deployed
                .lock()
                .unwrap()
                .push(devices.iter().map(|d| d.id.clone()).collect());
            Ok(DeploymentStatus {
                deployment_id: Some(template_id.to_string()),
                status: DeploymentState::Success,
                devices: Vec::new(),
            })
        }
    }

    fn config() -> RunConfig {
        RunConfig::new(
            CompliancePolicy::new("10.0.0.5", "rightcommunity", VALID),
            "Remediation",
            "snmp-fix",
        )
    }

    fn mixed_fleet() -> FakeController {
        FakeController::with_devices(&[
            ("a", "10.1.0.1", Some(format!("hostname a\n{VALID}\n").as_str())),
            (
                "b",
                "10.1.0.2",
                Some("hostname b\nsnmp-server host 10.0.0.1 version 2c wrongcommunity\n"),
            ),
            ("c", "10.1.0.3", None),
        ])
    }

    #[tokio::test]
    async fn test_plan_partitions_and_synthesizes() {
        let remediator = Remediator::new(mixed_fleet(), config()).unwrap();
        let plan = remediator.plan().await.unwrap();

        assert_eq!(plan.devices.len(), 3);
        assert!(plan.remediation.compliant.contains_key("a"));
        assert!(plan.remediation.non_compliant.contains_key("b"));
        assert!(plan.remediation.no_config_found.contains_key("c"));
        assert!(plan.failures.is_empty());

        let template = plan.synthesis.template().unwrap();
        assert_eq!(template.name, "snmp-fix");
        assert_eq!(
            template.body,
            format!(
                "#if($device_ip == '10.1.0.2')\n\
                 no snmp-server host 10.0.0.1 version 2c wrongcommunity\n\
                 {VALID}\n\
                 #end"
            )
        );
        assert_eq!(template.targets.len(), 1);
    }

    #[tokio::test]
    async fn test_one_secret_across_batches() {
        let remediator =
            Remediator::new(mixed_fleet(), config().export_batch_size(2)).unwrap();
        let plan = remediator.plan().await.unwrap();

        let secrets = remediator.controller().secrets.lock().unwrap().clone();
        assert_eq!(secrets.len(), 2);
        assert_eq!(secrets[0], secrets[1]);
        assert!(secrets[0].ends_with('!'));
        assert_eq!(plan.remediation.device_count(), 3);
    }

    #[tokio::test]
    async fn test_fresh_secret_per_run() {
        let remediator = Remediator::new(mixed_fleet(), config()).unwrap();
        remediator.plan().await.unwrap();
        remediator.plan().await.unwrap();

        let secrets = remediator.controller().secrets.lock().unwrap().clone();
        assert_eq!(secrets.len(), 2);
        assert_ne!(secrets[0], secrets[1]);
    }

    #[tokio::test]
    async fn test_corrupt_batch_is_isolated() {
        let mut fake = mixed_fleet();
        fake.corrupt.push("c".into());
        let remediator = Remediator::new(fake, config().export_batch_size(2)).unwrap();
        let plan = remediator.plan().await.unwrap();

        assert_eq!(plan.failures.len(), 1);
        assert_eq!(plan.failures[0].devices, vec!["c".to_string()]);
        assert!(plan.remediation.compliant.contains_key("a"));
        assert!(plan.remediation.non_compliant.contains_key("b"));
        assert!(plan.remediation.no_config_found.contains_key("c"));
    }

    #[tokio::test]
    async fn test_unaddressed_device_has_no_config() {
        let fake = FakeController::with_devices(&[
            (
                "b",
                "10.1.0.2",
                Some("snmp-server host 10.0.0.1 version 2c wrongcommunity\n"),
            ),
            ("n", "", Some("snmp-server host 10.0.0.1 version 2c wrongcommunity\n")),
        ]);
        let remediator = Remediator::new(fake, config()).unwrap();
        let plan = remediator.plan().await.unwrap();

        assert!(plan.remediation.no_config_found.contains_key("n"));
        assert!(plan.remediation.non_compliant.contains_key("b"));
        let exported = remediator.controller().exported.lock().unwrap().clone();
        assert_eq!(exported, vec!["b".to_string()]);

        let template = plan.synthesis.template().unwrap();
        assert!(!template.body.contains("''"));
        let id = remediator.upload(template).await.unwrap();
        remediator.deploy(&id, template).await.unwrap();
        let deployed = remediator.controller().deployed.lock().unwrap().clone();
        assert_eq!(deployed, vec![vec!["b".to_string()]]);
    }

    #[tokio::test]
    async fn test_transport_errors_abort() {
        let mut fake = mixed_fleet();
        fake.unauthorized_export = true;
        let remediator = Remediator::new(fake, config()).unwrap();
        let err = remediator.plan().await.unwrap_err();
        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_nothing_to_do() {
        let fake = FakeController::with_devices(&[
            ("a", "10.1.0.1", Some(VALID)),
            ("z", "10.1.0.9", None),
        ]);
        let remediator = Remediator::new(fake, config()).unwrap();
        let plan = remediator.plan().await.unwrap();
        assert_eq!(plan.synthesis, Synthesis::NothingToDo);
    }

    #[tokio::test]
    async fn test_empty_inventory() {
        let remediator = Remediator::new(FakeController::default(), config()).unwrap();
        let plan = remediator.plan().await.unwrap();
        assert!(plan.devices.is_empty());
        assert_eq!(plan.synthesis, Synthesis::NothingToDo);
        assert!(remediator.controller().secrets.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filter_limits_inventory() {
        let remediator = Remediator::new(
            mixed_fleet(),
            config().devices(DeviceFilter::default().management_ip_address("10.1.0.2")),
        )
        .unwrap();
        let plan = remediator.plan().await.unwrap();
        assert_eq!(plan.devices.len(), 1);
        assert_eq!(plan.remediation.non_compliant.len(), 1);
    }

    #[tokio::test]
    async fn test_upload_then_deploy_targets() {
        let remediator = Remediator::new(mixed_fleet(), config()).unwrap();
        let plan = remediator.plan().await.unwrap();
        let template = plan.synthesis.template().unwrap();

        let id = remediator.upload(template).await.unwrap();
        let status = remediator.deploy(&id, template).await.unwrap();

        assert_eq!(status.status, DeploymentState::Success);
        let deployed = remediator.controller().deployed.lock().unwrap().clone();
        assert_eq!(deployed, vec![vec!["b".to_string()]]);
    }

    #[tokio::test]
    async fn test_upload_conflict_is_reported() {
        let mut fake = mixed_fleet();
        fake.existing_templates.push("snmp-fix".into());
        let remediator = Remediator::new(fake, config()).unwrap();
        let plan = remediator.plan().await.unwrap();

        let err = remediator
            .upload(plan.synthesis.template().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SnmpFixError::TemplateNameConflict { .. }));
        assert!(remediator.controller().uploaded.lock().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad_policy = RunConfig::new(
            CompliancePolicy::new("10.0.0.5", "rightcommunity", "snmp-server host 10.0.0.6 x"),
            "Remediation",
            "snmp-fix",
        );
        assert!(Remediator::new(FakeController::default(), bad_policy).is_err());

        let no_project = RunConfig::new(
            CompliancePolicy::new("10.0.0.5", "rightcommunity", VALID),
            " ",
            "snmp-fix",
        );
        let err = no_project.validate().unwrap_err();
        assert!(matches!(err, SnmpFixError::Config(_)));
    }
}
