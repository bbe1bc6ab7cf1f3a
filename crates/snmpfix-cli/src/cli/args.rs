//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Audit and remediate SNMP host configuration through Cisco DNA Center
///
/// Devices are checked for `snmp-server host` statements that do not point at
/// the reference receiver with the reference community. Offending lines are
/// removed and the reference line added through a provisioning template.
#[derive(Parser, Debug)]
#[command(name = "snmpfix")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Controller base URL, e.g. https://dnac.example.net
    #[arg(long, env = "DNAC_URL", global = true)]
    pub url: Option<String>,

    /// Controller username
    #[arg(short = 'u', long, env = "DNAC_USER", global = true)]
    pub username: Option<String>,

    /// Controller password
    #[arg(long, env = "DNAC_PASS", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Accept self-signed controller certificates
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Configuration file (defaults to the per-user config file)
    #[arg(short, long, env = "SNMPFIX_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase log verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export configurations, build the remediation template, upload and deploy it
    Run(RunArgs),

    /// Classify configuration files or an encrypted export without a controller
    Audit(AuditArgs),

    /// List devices matching the configured filters
    Devices(DeviceArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Shared argument groups
// ============================================================================

#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Reference SNMP receiver
    #[arg(long)]
    pub valid_host: Option<String>,

    /// Reference community string
    #[arg(long)]
    pub valid_community: Option<String>,

    /// Line added to devices without a valid host statement
    #[arg(long)]
    pub intended_line: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Exact device hostname
    #[arg(long)]
    pub hostname: Option<String>,

    /// Exact management IP address
    #[arg(long = "ip")]
    pub management_ip: Option<String>,

    /// Product family (repeatable)
    #[arg(long)]
    pub family: Vec<String>,

    /// Product series (repeatable)
    #[arg(long)]
    pub series: Vec<String>,

    /// Platform identifier (repeatable)
    #[arg(long = "platform")]
    pub platform_id: Vec<String>,

    /// Site the device must be located in (repeatable)
    #[arg(long = "location")]
    pub locations: Vec<String>,
}

impl FilterArgs {
    /// Returns true if no filter flag was given
    pub fn is_empty(&self) -> bool {
        self.hostname.is_none()
            && self.management_ip.is_none()
            && self.family.is_empty()
            && self.series.is_empty()
            && self.platform_id.is_empty()
            && self.locations.is_empty()
    }
}

// ============================================================================
// Run command
// ============================================================================

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Template project receiving the generated template
    #[arg(long = "project")]
    pub project_name: Option<String>,

    /// Name of the generated template
    #[arg(long = "template")]
    pub template_name: Option<String>,

    /// Devices per configuration export (0 = all at once)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Stop after building the template and print it
    #[arg(long)]
    pub dry_run: bool,

    /// Upload the template but do not deploy it
    #[arg(long, conflicts_with = "yes")]
    pub no_deploy: bool,

    /// Deploy without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

// ============================================================================
// Audit command
// ============================================================================

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Configuration file, export directory, or encrypted export archive
    pub path: PathBuf,

    /// Password of an encrypted export archive
    #[arg(long, env = "SNMPFIX_ARCHIVE_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Print the remediation template as well
    #[arg(long)]
    pub show_template: bool,
}

// ============================================================================
// Devices command
// ============================================================================

#[derive(Args, Debug)]
pub struct DeviceArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set (e.g., url, valid_host, project_name)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}
