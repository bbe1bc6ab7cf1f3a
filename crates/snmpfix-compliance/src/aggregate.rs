//! Partition a device set by compliance.

use crate::archive::DecryptedConfigs;
use crate::classify::{classify, ComplianceVerdict};
use crate::policy::CompliancePolicy;
use serde::{Deserialize, Serialize};
use snmpfix_core::Device;
use std::collections::BTreeMap;
use tracing::debug;

/// A non-compliant device with its verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRemediation {
    /// The device
    pub device: Device,

    /// Its classification, remediation commands in order
    pub verdict: ComplianceVerdict,
}

/// Verdicts for a whole run, keyed and ordered by device identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationSet {
    /// Devices that already have only the reference host statement
    pub compliant: BTreeMap<String, Device>,

    /// Devices that need remediation
    pub non_compliant: BTreeMap<String, DeviceRemediation>,

    /// Devices for which no configuration was retrieved
    pub no_config_found: BTreeMap<String, Device>,
}

impl RemediationSet {
    /// Record one device's outcome; `None` means no configuration was retrieved
    pub fn insert(&mut self, device: Device, verdict: Option<ComplianceVerdict>) {
        let id = device.id.clone();
        self.compliant.remove(&id);
        self.non_compliant.remove(&id);
        self.no_config_found.remove(&id);

        match verdict {
            None => {
                self.no_config_found.insert(id, device);
            }
            Some(verdict) if verdict.is_compliant() => {
                self.compliant.insert(id, device);
            }
            Some(verdict) => {
                self.non_compliant
                    .insert(id, DeviceRemediation { device, verdict });
            }
        }
    }

    /// Total number of devices in all partitions
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.compliant.len() + self.non_compliant.len() + self.no_config_found.len()
    }

    /// Returns true if no device needs remediation
    #[must_use]
    pub fn is_nothing_to_do(&self) -> bool {
        self.non_compliant.is_empty()
    }

    /// Non-compliant devices in identifier order
    pub fn targets(&self) -> impl Iterator<Item = &Device> {
        self.non_compliant.values().map(|r| &r.device)
    }
}

/// Classify every device through `verdict_fn` and partition the results.
///
/// `verdict_fn` returns `None` when there is no configuration for a device.
/// A device listed more than once is recorded once, with its last outcome.
pub fn aggregate<'a, I, F>(devices: I, mut verdict_fn: F) -> RemediationSet
where
    I: IntoIterator<Item = &'a Device>,
    F: FnMut(&Device) -> Option<ComplianceVerdict>,
{
    let mut set = RemediationSet::default();
    for device in devices {
        let verdict = verdict_fn(device);
        debug!(
            device = %device.display_name(),
            found = verdict.is_some(),
            compliant = verdict.as_ref().is_some_and(ComplianceVerdict::is_compliant),
            "classified device"
        );
        set.insert(device.clone(), verdict);
    }
    set
}

/// Classify devices against decrypted configurations.
pub fn aggregate_configs<'a, I>(
    devices: I,
    configs: &DecryptedConfigs,
    policy: &CompliancePolicy,
) -> RemediationSet
where
    I: IntoIterator<Item = &'a Device>,
{
    aggregate(devices, |device| {
        configs
            .for_device(device)
            .map(|text| classify(text, policy))
    })
}
