//! `snmpfix config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::{print_structured, OutputFormat};

const MASK: &str = "********";

pub fn execute(ctx: &Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(ctx),
        ConfigCommands::Set { key, value } => set_config(ctx, &key, &value),
        ConfigCommands::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    // Show the file contents, not values merged from flags and environment
    let mut config = Config::load(&ctx.config_path)?;
    if config.password.is_some() {
        config.password = Some(MASK.to_string());
    }

    if print_structured(ctx.output_format, &config)? {
        return Ok(());
    }

    let unset = || "(not set)".dimmed().to_string();
    let show = |value: Option<&str>| value.map_or_else(unset, str::to_string);
    let list = |values: &[String]| {
        if values.is_empty() {
            unset()
        } else {
            values.join(", ")
        }
    };

    println!("{}", "Current Configuration:".bold());
    println!("{}", ctx.config_path.display().to_string().dimmed());
    println!();

    println!("  {} {}", "url:".bold(), show(config.url.as_deref()));
    println!("  {} {}", "username:".bold(), show(config.username.as_deref()));
    println!("  {} {}", "password:".bold(), show(config.password.as_deref()));
    println!("  {} {}", "insecure:".bold(), config.insecure);
    println!(
        "  {} {}",
        "output_format:".bold(),
        config.output_format.unwrap_or(OutputFormat::Pretty)
    );
    println!();
    println!("  {} {}", "valid_host:".bold(), show(config.valid_host.as_deref()));
    println!(
        "  {} {}",
        "valid_community:".bold(),
        show(config.valid_community.as_deref())
    );
    println!(
        "  {} {}",
        "intended_line:".bold(),
        show(config.intended_line.as_deref())
    );
    println!("  {} {}", "project_name:".bold(), show(config.project_name.as_deref()));
    println!(
        "  {} {}",
        "template_name:".bold(),
        show(config.template_name.as_deref())
    );
    println!(
        "  {} {}",
        "export_batch_size:".bold(),
        config
            .export_batch_size
            .map_or_else(unset, |n| n.to_string())
    );
    println!();
    println!("  {} {}", "locations:".bold(), list(&config.locations));
    println!("  {} {}", "hostname:".bold(), show(config.devices.hostname.as_deref()));
    println!(
        "  {} {}",
        "management_ip_address:".bold(),
        show(config.devices.management_ip_address.as_deref())
    );
    println!("  {} {}", "family:".bold(), list(&config.devices.family));
    println!("  {} {}", "series:".bold(), list(&config.devices.series));
    println!("  {} {}", "platform_id:".bold(), list(&config.devices.platform_id));

    Ok(())
}

fn set_config(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load(&ctx.config_path)?;
    config.set(key, value)?;
    config.save(&ctx.config_path)?;

    let shown = if key == "password" { MASK } else { value };
    println!("{} {} set to {}.", "Success:".green().bold(), key, shown.cyan());
    Ok(())
}
