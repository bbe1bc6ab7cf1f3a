//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use snmpfix::{CompliancePolicy, DeviceFilter, PollConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::output::OutputFormat;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Controller base URL.
    pub url: Option<String>,

    /// Controller username.
    pub username: Option<String>,

    /// Controller password.
    pub password: Option<String>,

    /// Accept self-signed controller certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Reference SNMP receiver.
    pub valid_host: Option<String>,

    /// Reference community string.
    pub valid_community: Option<String>,

    /// Line added to devices without a valid host statement.
    pub intended_line: Option<String>,

    /// Template project for generated templates.
    pub project_name: Option<String>,

    /// Name of generated templates.
    pub template_name: Option<String>,

    /// Devices per configuration export.
    pub export_batch_size: Option<usize>,

    /// Seconds between controller job status checks.
    pub poll_interval_secs: Option<u64>,

    /// Status checks before a controller job times out.
    pub poll_max_attempts: Option<u32>,

    /// Sites devices must be located in.
    #[serde(default)]
    pub locations: Vec<String>,

    /// Inventory filter.
    #[serde(default)]
    pub devices: DeviceFilter,
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("net", "netops-tools", "snmpfix")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Resolve the config file path, preferring an explicit override.
    pub fn path(override_path: Option<&Path>) -> Result<PathBuf> {
        override_path.map_or_else(Self::default_path, |p| Ok(p.to_path_buf()))
    }

    /// Load configuration from file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// The compliance policy, with command-line values taking precedence.
    pub fn policy(
        &self,
        valid_host: Option<String>,
        valid_community: Option<String>,
        intended_line: Option<String>,
    ) -> Result<CompliancePolicy> {
        let valid_host = valid_host
            .or_else(|| self.valid_host.clone())
            .ok_or_else(|| missing("valid_host", "--valid-host"))?;
        let valid_community = valid_community
            .or_else(|| self.valid_community.clone())
            .ok_or_else(|| missing("valid_community", "--valid-community"))?;
        let intended_line = intended_line
            .or_else(|| self.intended_line.clone())
            .ok_or_else(|| missing("intended_line", "--intended-line"))?;

        let policy = CompliancePolicy::new(valid_host, valid_community, intended_line);
        policy.validate()?;
        Ok(policy)
    }

    /// Polling settings for controller jobs.
    pub fn poll(&self) -> PollConfig {
        let mut poll = PollConfig::new();
        if let Some(secs) = self.poll_interval_secs {
            poll = poll.interval(Duration::from_secs(secs));
        }
        if let Some(attempts) = self.poll_max_attempts {
            poll = poll.max_attempts(attempts);
        }
        poll
    }

    /// Set a value by key name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let text = || Some(value.to_string());
        match key {
            "url" => self.url = text(),
            "username" | "user" => self.username = text(),
            "password" => self.password = text(),
            "insecure" => self.insecure = value.parse()?,
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            "valid_host" => self.valid_host = text(),
            "valid_community" => self.valid_community = text(),
            "intended_line" => self.intended_line = text(),
            "project_name" | "project" => self.project_name = text(),
            "template_name" | "template" => self.template_name = text(),
            "export_batch_size" | "batch_size" => self.export_batch_size = Some(value.parse()?),
            "poll_interval_secs" => self.poll_interval_secs = Some(value.parse()?),
            "poll_max_attempts" => self.poll_max_attempts = Some(value.parse()?),
            "locations" => self.locations = split_list(value),
            "hostname" => self.devices.hostname = text(),
            "management_ip_address" => self.devices.management_ip_address = text(),
            "family" => self.devices.family = split_list(value),
            "series" => self.devices.series = split_list(value),
            "platform_id" => self.devices.platform_id = split_list(value),
            _ => {
                anyhow::bail!(
                    "Unknown config key: {}\n\n\
                     Available keys:\n  \
                     url, username, password, insecure, output_format\n  \
                     valid_host, valid_community, intended_line\n  \
                     project_name, template_name, export_batch_size\n  \
                     poll_interval_secs, poll_max_attempts\n  \
                     locations, hostname, management_ip_address, family, series, platform_id\n\n\
                     List values are comma-separated.",
                    key
                );
            }
        }
        Ok(())
    }
}

fn missing(key: &str, flag: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "{key} is not set.\n\n\
         Set it with one of:\n  \
         1. {flag} <VALUE>\n  \
         2. snmpfix config set {key} <VALUE>"
    )
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
