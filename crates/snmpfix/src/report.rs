//! Serializable run summary.

use crate::pipeline::{ArchiveFailure, Plan};
use chrono::{DateTime, Utc};
use serde::Serialize;
use snmpfix_compliance::{ComplianceVerdict, Synthesis};
use snmpfix_core::Device;

/// Compliance state of one device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    /// Only the reference host statement is configured
    Compliant,
    /// Remediation is required
    NonCompliant,
    /// No configuration was retrieved
    NoConfigFound,
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compliant => write!(f, "compliant"),
            Self::NonCompliant => write!(f, "non-compliant"),
            Self::NoConfigFound => write!(f, "no config found"),
        }
    }
}

/// One row of a run report
#[derive(Debug, Clone, Serialize)]
pub struct DeviceReport {
    pub id: String,
    pub hostname: Option<String>,
    pub management_ip_address: String,
    pub status: DeviceStatus,
    /// Offending host statements, in configuration order
    pub invalid_lines: Vec<String>,
    /// Commands the template applies to this device
    pub remediation: Vec<String>,
}

impl DeviceReport {
    fn new(device: &Device, status: DeviceStatus, verdict: Option<&ComplianceVerdict>) -> Self {
        Self {
            id: device.id.clone(),
            hostname: device.hostname.clone(),
            management_ip_address: device.management_ip_address.clone(),
            status,
            invalid_lines: verdict
                .map(|v| v.invalid_lines.iter().map(|l| l.raw.clone()).collect())
                .unwrap_or_default(),
            remediation: verdict.map(|v| v.remediation.clone()).unwrap_or_default(),
        }
    }
}

/// Summary of a planned run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub compliant: usize,
    pub non_compliant: usize,
    pub no_config_found: usize,
    /// Generated template name, absent when there is nothing to do
    pub template: Option<String>,
    pub devices: Vec<DeviceReport>,
    pub archive_failures: Vec<ArchiveFailure>,
}

impl RunReport {
    pub(crate) fn from_plan(plan: &Plan) -> Self {
        let set = &plan.remediation;
        let mut devices: Vec<DeviceReport> = set
            .non_compliant
            .values()
            .map(|r| DeviceReport::new(&r.device, DeviceStatus::NonCompliant, Some(&r.verdict)))
            .chain(
                set.compliant
                    .values()
                    .map(|d| DeviceReport::new(d, DeviceStatus::Compliant, None)),
            )
            .chain(
                set.no_config_found
                    .values()
                    .map(|d| DeviceReport::new(d, DeviceStatus::NoConfigFound, None)),
            )
            .collect();
        devices.sort_by(|a, b| a.id.cmp(&b.id));

        Self {
            generated_at: Utc::now(),
            compliant: set.compliant.len(),
            non_compliant: set.non_compliant.len(),
            no_config_found: set.no_config_found.len(),
            template: match &plan.synthesis {
                Synthesis::Ready(template) => Some(template.name.clone()),
                Synthesis::NothingToDo => None,
            },
            devices,
            archive_failures: plan.failures.clone(),
        }
    }

    /// Number of devices covered
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.compliant + self.non_compliant + self.no_config_found
    }
}
