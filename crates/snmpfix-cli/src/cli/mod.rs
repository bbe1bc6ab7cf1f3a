//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.no_color);
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let config_path = Config::path(cli.config.as_deref())?;
    let mut config = Config::load(&config_path)?;

    // Command-line and environment values win over the config file
    if cli.url.is_some() {
        config.url = cli.url;
    }
    if cli.username.is_some() {
        config.username = cli.username;
    }
    if cli.password.is_some() {
        config.password = cli.password;
    }
    config.insecure |= cli.insecure;

    let output_format = cli
        .output
        .or(config.output_format)
        .unwrap_or(OutputFormat::Pretty);

    // Create context for commands
    let ctx = commands::Context {
        config,
        config_path,
        output_format,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };

    // Dispatch to appropriate command
    match cli.command {
        Commands::Run(args) => commands::run::execute(ctx, args).await,
        Commands::Audit(args) => commands::audit::execute(ctx, args),
        Commands::Devices(args) => commands::devices::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(&ctx, args),
    }
}

/// Log to stderr, filtered by `RUST_LOG` or the verbosity flag.
fn init_tracing(verbose: bool, no_color: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,snmpfix={default_level}")));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_ansi(!no_color)
        .compact();

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
