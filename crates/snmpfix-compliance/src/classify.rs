//! Per-device compliance classification.

use crate::parser::{host_lines, SnmpHostLine};
use crate::policy::CompliancePolicy;
use serde::{Deserialize, Serialize};

/// Outcome of classifying one device configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    /// Host statements that do not match the reference pair, in file order
    pub invalid_lines: Vec<SnmpHostLine>,

    /// Whether a statement matching the reference pair is already configured
    pub valid_line_present: bool,

    /// Commands that bring the device to the compliant state, in order
    pub remediation: Vec<String>,
}

impl ComplianceVerdict {
    /// Returns true if nothing needs to change on the device
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.invalid_lines.is_empty() && self.valid_line_present
    }

    /// Returns true if the configuration had any host statement at all
    #[must_use]
    pub fn has_host_lines(&self) -> bool {
        self.valid_line_present || !self.invalid_lines.is_empty()
    }

    /// Returns true if remediation adds the intended line
    #[must_use]
    pub const fn adds_intended_line(&self) -> bool {
        !self.valid_line_present
    }
}

/// Classify a configuration against the reference policy.
///
/// Every host statement whose host and community do not both equal the
/// reference pair is invalid and gets a `no <line>` command. The intended
/// line is appended once, and only when no valid statement exists.
#[must_use]
pub fn classify(config_text: &str, policy: &CompliancePolicy) -> ComplianceVerdict {
    let mut verdict = ComplianceVerdict::default();

    for line in host_lines(config_text) {
        if line.matches(&policy.valid_host, &policy.valid_community) {
            verdict.valid_line_present = true;
        } else {
            verdict.remediation.push(line.negation());
            verdict.invalid_lines.push(line);
        }
    }

    if !verdict.valid_line_present {
        verdict.remediation.push(policy.intended_line.clone());
    }

    verdict
}
