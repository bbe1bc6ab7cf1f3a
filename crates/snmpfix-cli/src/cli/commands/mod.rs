//! Command implementations.

pub mod audit;
pub mod config;
pub mod devices;
pub mod run;

use anyhow::Context as _;
use indicatif::{ProgressBar, ProgressStyle};
use snmpfix::{DeviceFilter, DnacClient, LocationFilter};
use std::path::PathBuf;
use std::time::Duration;

use super::args::FilterArgs;
use crate::config::Config;
use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Configuration merged with command-line values
    pub config: Config,

    /// Where the configuration was loaded from
    pub config_path: PathBuf,

    /// Output format
    pub output_format: OutputFormat,

    /// Verbose output
    pub verbose: bool,

    /// Disable colors
    pub no_color: bool,
}

impl Context {
    /// Connect and log in to the controller.
    pub async fn client(&self) -> anyhow::Result<DnacClient> {
        let url = self.config.url.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "Controller URL required.\n\n\
                 Set it with one of:\n  \
                 1. --url <URL>\n  \
                 2. DNAC_URL environment variable\n  \
                 3. snmpfix config set url <URL>"
            )
        })?;
        let username = self.config.username.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "Controller username required (--username, DNAC_USER or `snmpfix config set username`)"
            )
        })?;
        let password = self.config.password.as_deref().unwrap_or_default();

        DnacClient::builder(url)
            .credentials(username, password)
            .accept_invalid_certs(self.config.insecure)
            .poll(self.config.poll())
            .connect()
            .await
            .with_context(|| format!("Failed to connect to {url}"))
    }

    /// Device and location filters, command-line flags replacing the configured ones.
    pub fn filters(&self, args: FilterArgs) -> (DeviceFilter, LocationFilter) {
        if args.is_empty() {
            return (
                self.config.devices.clone(),
                LocationFilter::from(self.config.locations.clone()),
            );
        }

        let filter = DeviceFilter {
            hostname: args.hostname,
            management_ip_address: args.management_ip,
            family: args.family,
            series: args.series,
            platform_id: args.platform_id,
        };
        (filter, LocationFilter::from(args.locations))
    }

    /// Start a spinner on stderr; hidden for machine-readable output.
    pub fn spinner(&self, message: impl Into<String>) -> ProgressBar {
        if self.output_format != OutputFormat::Pretty {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.into());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}
