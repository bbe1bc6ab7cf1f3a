//! Output formatting for different formats.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use snmpfix::{DeviceStatus, RunReport, Template};
use std::str::FromStr;
use tabled::{settings::Style, Table, Tabled};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed tables with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// YAML output
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "table" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: pretty, json, csv, yaml",
                s
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Print a value as JSON or YAML; returns false for the other formats.
pub fn print_structured<T: Serialize>(format: OutputFormat, value: &T) -> Result<bool> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Csv | OutputFormat::Pretty => return Ok(false),
    }
    Ok(true)
}

/// Write flat records as CSV to stdout.
pub fn print_csv<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Report plus the template it produced.
#[derive(Serialize)]
struct ReportOutput<'a> {
    #[serde(flatten)]
    report: &'a RunReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_body: Option<&'a str>,
}

#[derive(Serialize)]
struct ReportCsvRow<'a> {
    id: &'a str,
    hostname: &'a str,
    management_ip_address: &'a str,
    status: DeviceStatus,
    invalid_lines: String,
    remediation: String,
}

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Device")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Invalid lines")]
    invalid: usize,
}

/// Print a compliance report in the requested format.
///
/// `template` is included when the caller wants the rendered body shown.
pub fn print_report(
    format: OutputFormat,
    report: &RunReport,
    template: Option<&Template>,
) -> Result<()> {
    let output = ReportOutput {
        report,
        template_body: template.map(|t| t.body.as_str()),
    };
    if print_structured(format, &output)? {
        return Ok(());
    }

    if format == OutputFormat::Csv {
        return print_csv(report.devices.iter().map(|d| ReportCsvRow {
            id: &d.id,
            hostname: d.hostname.as_deref().unwrap_or(""),
            management_ip_address: &d.management_ip_address,
            status: d.status,
            invalid_lines: d.invalid_lines.join("; "),
            remediation: d.remediation.join("; "),
        }));
    }

    print_report_pretty(report);
    if let Some(template) = template {
        println!();
        println!("{} {}", "Template:".bold(), template.name.cyan());
        println!("{}", template.body);
    }
    Ok(())
}

fn print_report_pretty(report: &RunReport) {
    println!("{}", "Compliance Summary:".bold());
    println!("  {} {}", "Devices:".bold(), report.device_count());
    println!("  {} {}", "Compliant:".bold(), report.compliant.to_string().green());
    println!(
        "  {} {}",
        "Non-compliant:".bold(),
        report.non_compliant.to_string().red()
    );
    println!(
        "  {} {}",
        "No config found:".bold(),
        report.no_config_found.to_string().yellow()
    );

    if !report.devices.is_empty() {
        println!();
        let rows: Vec<ReportRow> = report
            .devices
            .iter()
            .map(|d| ReportRow {
                name: d.hostname.clone().unwrap_or_else(|| d.id.clone()),
                address: d.management_ip_address.clone(),
                status: status_label(d.status),
                invalid: d.invalid_lines.len(),
            })
            .collect();
        let table = Table::new(&rows).with(Style::rounded()).to_string();
        println!("{table}");
    }

    let drifted: Vec<_> = report
        .devices
        .iter()
        .filter(|d| d.status == DeviceStatus::NonCompliant)
        .collect();
    if !drifted.is_empty() {
        println!();
        println!("{}", "Remediation:".bold().underline());
        for device in drifted {
            let name = device.hostname.as_deref().unwrap_or(&device.id);
            println!("  {} ({})", name.bold(), device.management_ip_address);
            for command in &device.remediation {
                let line = if command.starts_with("no ") {
                    command.red()
                } else {
                    command.green()
                };
                println!("    {line}");
            }
        }
    }

    for failure in &report.archive_failures {
        println!();
        println!(
            "{} export of {} device(s) failed: {}",
            "Warning:".yellow().bold(),
            failure.devices.len(),
            failure.reason
        );
    }
}

fn status_label(status: DeviceStatus) -> String {
    match status {
        DeviceStatus::Compliant => status.to_string().green().to_string(),
        DeviceStatus::NonCompliant => status.to_string().red().to_string(),
        DeviceStatus::NoConfigFound => status.to_string().yellow().to_string(),
    }
}
