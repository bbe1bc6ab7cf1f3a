//! Velocity template synthesis.

use crate::aggregate::{DeviceRemediation, RemediationSet};
use snmpfix_core::{Template, TemplateLanguage, DEFAULT_SOFTWARE_TYPE};
use std::collections::BTreeSet;

/// Template variable the controller binds to each target's management IP
pub const DEVICE_IP_VARIABLE: &str = "$device_ip";

/// Result of synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synthesis {
    /// A template covering every non-compliant device
    Ready(Template),
    /// Every device is compliant or has no configuration
    NothingToDo,
}

impl Synthesis {
    /// The template, if one was produced
    #[must_use]
    pub fn template(&self) -> Option<&Template> {
        match self {
            Self::Ready(template) => Some(template),
            Self::NothingToDo => None,
        }
    }
}

/// Render the remediation of every non-compliant device into one template.
///
/// Each device gets a block guarded by its management IP containing exactly
/// its remediation commands. Blocks follow device identifier order and are
/// separated by a blank line, so identical input gives an identical body.
#[must_use]
pub fn synthesize(remediation: &RemediationSet, name: &str) -> Synthesis {
    if remediation.is_nothing_to_do() {
        return Synthesis::NothingToDo;
    }

    let body = remediation
        .non_compliant
        .values()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n\n");

    let device_types: BTreeSet<_> = remediation
        .targets()
        .map(snmpfix_core::Device::device_type)
        .collect();

    Synthesis::Ready(Template {
        name: name.to_string(),
        body,
        language: TemplateLanguage::Velocity,
        software_type: DEFAULT_SOFTWARE_TYPE.to_string(),
        device_types: device_types.into_iter().collect(),
        targets: remediation.targets().cloned().collect(),
    })
}

fn render_block(entry: &DeviceRemediation) -> String {
    let mut lines = Vec::with_capacity(entry.verdict.remediation.len() + 2);
    lines.push(format!(
        "#if({DEVICE_IP_VARIABLE} == '{}')",
        entry.device.management_ip_address
    ));
    lines.extend(entry.verdict.remediation.iter().map(|line| literal(line)));
    lines.push("#end".to_string());
    lines.join("\n")
}

/// Wrap a command in Velocity's unparsed-content markers when it contains
/// characters the engine would otherwise interpret.
fn literal(command: &str) -> String {
    if command.contains(['$', '#']) {
        format!("#[[{command}]]#")
    } else {
        command.to_string()
    }
}
