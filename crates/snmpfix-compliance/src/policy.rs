use crate::error::{ComplianceError, ComplianceResult};
use crate::parser::SnmpHostLine;
use serde::{Deserialize, Serialize};

/// Reference SNMP configuration every device must converge to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompliancePolicy {
    /// The only acceptable `snmp-server host` receiver
    pub valid_host: String,

    /// The only acceptable community string
    pub valid_community: String,

    /// Line added to devices that lack a valid host statement
    pub intended_line: String,
}

impl CompliancePolicy {
    /// Create a policy from the reference pair and the line to add
    #[must_use]
    pub fn new(
        valid_host: impl Into<String>,
        valid_community: impl Into<String>,
        intended_line: impl Into<String>,
    ) -> Self {
        Self {
            valid_host: valid_host.into(),
            valid_community: valid_community.into(),
            intended_line: intended_line.into(),
        }
    }

    /// Check that the policy is complete and self-consistent.
    ///
    /// The intended line must itself be a host statement for the reference
    /// pair, otherwise a remediated device would still be flagged on the next
    /// run.
    pub fn validate(&self) -> ComplianceResult<()> {
        if self.valid_host.trim().is_empty() {
            return Err(ComplianceError::Policy("valid host is not set".into()));
        }
        if self.valid_community.trim().is_empty() {
            return Err(ComplianceError::Policy("valid community is not set".into()));
        }
        let line = SnmpHostLine::parse(&self.intended_line).ok_or_else(|| {
            ComplianceError::Policy(format!(
                "intended line is not an snmp-server host statement: {:?}",
                self.intended_line
            ))
        })?;
        if !line.matches(&self.valid_host, &self.valid_community) {
            return Err(ComplianceError::Policy(format!(
                "intended line does not use host {} with the valid community",
                self.valid_host
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistent_policy() {
        let policy = CompliancePolicy::new(
            "10.0.0.5",
            "rightcommunity",
            "snmp-server host 10.0.0.5 version 2c rightcommunity",
        );
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_missing_fields() {
        assert!(CompliancePolicy::default().validate().is_err());
        let policy = CompliancePolicy::new("10.0.0.5", " ", "snmp-server host 10.0.0.5 x");
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_intended_line_must_match_reference() {
        let policy = CompliancePolicy::new(
            "10.0.0.5",
            "rightcommunity",
            "snmp-server host 10.0.0.6 version 2c rightcommunity",
        );
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("10.0.0.5"));

        let policy = CompliancePolicy::new("10.0.0.5", "rightcommunity", "logging host 10.0.0.5");
        assert!(policy.validate().is_err());
    }
}
