//! `snmpfix run` - Full remediation run.

use anyhow::{Context as _, Result};
use colored::Colorize;
use dialoguer::Confirm;
use snmpfix::{Plan, Remediator, RunConfig, Synthesis};

use super::Context;
use crate::cli::args::RunArgs;
use crate::output::{print_report, OutputFormat};

pub async fn execute(ctx: Context, args: RunArgs) -> Result<()> {
    let run_config = run_config(&ctx, &args)?;

    let spinner = ctx.spinner("Connecting to DNA Center...");
    let client = ctx.client().await;
    spinner.finish_and_clear();
    let remediator = Remediator::new(client?, run_config)?;

    let spinner = ctx.spinner("Retrieving device list...");
    let devices = remediator.inventory().await;
    spinner.finish_and_clear();
    let devices = devices?;
    pretty(&ctx, || {
        println!("{} {} devices matched the filters", "Found".bold(), devices.len());
    });

    let spinner = ctx.spinner(format!("Exporting configurations of {} devices...", devices.len()));
    let collected = remediator.collect_configs(&devices).await;
    spinner.finish_and_clear();
    let collected = collected.context("Configuration export failed")?;

    let remediation = remediator.evaluate(&devices, &collected.configs);
    let synthesis = remediator.synthesize(&remediation);
    let plan = Plan {
        devices,
        remediation,
        synthesis,
        failures: collected.failures,
    };
    let report = plan.report();

    let template = match &plan.synthesis {
        Synthesis::Ready(template) => template,
        Synthesis::NothingToDo => {
            print_report(ctx.output_format, &report, None)?;
            pretty(&ctx, || {
                println!();
                println!("{}", "Nothing to do: no device needs remediation.".green().bold());
            });
            return Ok(());
        }
    };

    if args.dry_run {
        print_report(ctx.output_format, &report, Some(template))?;
        pretty(&ctx, || {
            println!();
            println!("{}", "Dry run: template not uploaded.".dimmed());
        });
        return Ok(());
    }

    print_report(ctx.output_format, &report, None)?;

    let spinner = ctx.spinner(format!("Creating template '{}'...", template.name));
    let template_id = remediator.upload(template).await;
    spinner.finish_and_clear();
    let template_id = template_id.context("Template upload failed")?;
    pretty(&ctx, || {
        println!();
        println!(
            "{} Template {} created and committed ({})",
            "Success:".green().bold(),
            template.name.cyan(),
            template_id
        );
    });

    if args.no_deploy {
        return Ok(());
    }

    if !args.yes && !confirm_deploy(template.target_count())? {
        eprintln!("Deployment skipped. The template is ready in DNA Center.");
        return Ok(());
    }

    let spinner = ctx.spinner(format!(
        "Deploying to {} devices...",
        template.target_count()
    ));
    let status = remediator.deploy(&template_id, template).await;
    spinner.finish_and_clear();
    let status = status.context("Deployment failed")?;

    match ctx.output_format {
        OutputFormat::Pretty => {
            println!("{} Deployment complete ({})", "Success:".green().bold(), status.status);
        }
        _ => {
            crate::output::print_structured(ctx.output_format, &status)?;
        }
    }

    Ok(())
}

fn run_config(ctx: &Context, args: &RunArgs) -> Result<RunConfig> {
    let config = &ctx.config;
    let policy = config.policy(
        args.policy.valid_host.clone(),
        args.policy.valid_community.clone(),
        args.policy.intended_line.clone(),
    )?;

    let project_name = args
        .project_name
        .clone()
        .or_else(|| config.project_name.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("Template project required (--project or `snmpfix config set project_name`)")
        })?;
    let template_name = args
        .template_name
        .clone()
        .or_else(|| config.template_name.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("Template name required (--template or `snmpfix config set template_name`)")
        })?;

    let (devices, locations) = ctx.filters(args.filter.clone());
    let batch_size = args.batch_size.or(config.export_batch_size).unwrap_or(0);

    let run_config = RunConfig::new(policy, project_name, template_name)
        .devices(devices)
        .locations(locations)
        .export_batch_size(batch_size);
    run_config.validate()?;
    Ok(run_config)
}

fn confirm_deploy(targets: usize) -> Result<bool> {
    let answer = Confirm::new()
        .with_prompt(format!("Deploy the template to {targets} device(s) now?"))
        .default(false)
        .interact()
        .context("Could not read confirmation; pass --yes to deploy non-interactively")?;
    Ok(answer)
}

fn pretty(ctx: &Context, f: impl FnOnce()) {
    if ctx.output_format == OutputFormat::Pretty {
        f();
    }
}
