//! `snmpfix devices` - List devices selected by the filters.

use anyhow::Result;
use colored::Colorize;
use snmpfix::DeviceInventory;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::args::DeviceArgs;
use crate::output::{print_csv, print_structured, OutputFormat};

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Family")]
    family: String,
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Software")]
    software: String,
}

pub async fn execute(ctx: Context, args: DeviceArgs) -> Result<()> {
    let (filter, locations) = ctx.filters(args.filter);
    let client = ctx.client().await?;

    let spinner = ctx.spinner("Retrieving device list...");
    let devices = client.list_devices(&filter, &locations).await;
    spinner.finish_and_clear();
    let devices = devices?;

    if print_structured(ctx.output_format, &devices)? {
        return Ok(());
    }

    match ctx.output_format {
        OutputFormat::Csv => print_csv(&devices)?,
        _ => {
            if devices.is_empty() {
                println!("{}", "No devices matched the filters.".yellow());
                return Ok(());
            }

            let rows: Vec<DeviceRow> = devices
                .iter()
                .map(|d| DeviceRow {
                    hostname: d.hostname.clone().unwrap_or_default(),
                    address: d.management_ip_address.clone(),
                    family: d.family.clone().unwrap_or_default(),
                    platform: d.platform_id.clone().unwrap_or_default(),
                    software: [d.software_type.as_deref(), d.software_version.as_deref()]
                        .into_iter()
                        .flatten()
                        .collect::<Vec<_>>()
                        .join(" "),
                })
                .collect();

            let table = Table::new(&rows).with(Style::rounded()).to_string();
            println!("{table}");
            println!();
            println!("{}", format!("Total: {} devices", devices.len()).dimmed());
        }
    }

    Ok(())
}
