//! `snmpfix audit` - Offline compliance check.

use anyhow::{Context as _, Result};
use snmpfix::compliance::aggregate_configs;
use snmpfix::compliance::archive::RUNNING_CONFIG_SUFFIX;
use snmpfix::{
    decrypt, synthesize, ArchiveSecret, ConfigurationArchive, DecryptedConfigs, Device, Plan,
};
use std::path::Path;
use tracing::debug;

use super::Context;
use crate::cli::args::AuditArgs;
use crate::output::print_report;

/// Template name used when none is configured
const DEFAULT_TEMPLATE_NAME: &str = "snmp-remediation";

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

pub fn execute(ctx: Context, args: AuditArgs) -> Result<()> {
    let policy = ctx.config.policy(
        args.policy.valid_host,
        args.policy.valid_community,
        args.policy.intended_line,
    )?;

    let configs = load_configs(&args.path, args.secret)?;
    if configs.is_empty() {
        anyhow::bail!("No running configurations found in {}", args.path.display());
    }

    // Offline there is no inventory: the export key stands in for the device.
    let devices: Vec<Device> = configs.keys().map(|key| Device::new(key, key)).collect();
    let remediation = aggregate_configs(&devices, &configs, &policy);
    let template_name = ctx
        .config
        .template_name
        .as_deref()
        .unwrap_or(DEFAULT_TEMPLATE_NAME);
    let plan = Plan {
        synthesis: synthesize(&remediation, template_name),
        devices,
        remediation,
        failures: Vec::new(),
    };

    let template = if args.show_template {
        plan.synthesis.template()
    } else {
        None
    };
    print_report(ctx.output_format, &plan.report(), template)
}

/// Read configurations from a file, an export directory or an encrypted export.
fn load_configs(path: &Path, secret: Option<String>) -> Result<DecryptedConfigs> {
    if path.is_dir() {
        let mut configs = DecryptedConfigs::default();
        collect_dir(path, &mut configs)?;
        return Ok(configs);
    }

    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    if bytes.starts_with(ZIP_MAGIC) {
        let secret = secret
            .map(ArchiveSecret::from_string)
            .ok_or_else(|| anyhow::anyhow!("{} is an archive; pass --secret", path.display()))?;
        let configs = decrypt(&ConfigurationArchive::new(bytes), &secret)?;
        drop(secret);
        return Ok(configs);
    }

    let key = path
        .file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
    let mut configs = DecryptedConfigs::default();
    configs.insert(key, String::from_utf8_lossy(&bytes).into_owned());
    Ok(configs)
}

/// Walk an extracted export, keying each running config by its folder name.
fn collect_dir(dir: &Path, configs: &mut DecryptedConfigs) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(std::fs::DirEntry::path);

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            collect_dir(&path, configs)?;
            continue;
        }
        let name = entry.file_name();
        if !name.to_string_lossy().ends_with(RUNNING_CONFIG_SUFFIX) {
            continue;
        }
        let Some(key) = path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
        else {
            continue;
        };
        let bytes = std::fs::read(&path)?;
        debug!(device = %key, file = %path.display(), "loaded running config");
        configs.insert(key, String::from_utf8_lossy(&bytes).into_owned());
    }
    Ok(())
}
