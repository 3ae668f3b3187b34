use std::io;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;
use vestdash_core::{ApiClient, Dashboard};

mod cli;
mod commands;
mod config;
mod format;
mod report;
mod util;

use cli::{Cli, Commands};
use commands::{
    Context, MeasurementsArgs, cmd_add, cmd_config, cmd_exercise, cmd_login, cmd_measurements,
    cmd_sensors, cmd_vest, cmd_vests,
};
use config::{Config, resolve_api_url, resolve_timeout};
use format::FormatOptions;
use report::ConsoleReporter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "vestdash", &mut io::stdout());
        return Ok(());
    }

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();

    if let Commands::Config { action } = cli.command {
        return cmd_config(&config, action, cli.output.as_ref());
    }

    let no_color = cli.no_color || config.no_color;
    let api_url = resolve_api_url(cli.api_url.as_deref(), &config);
    let timeout = resolve_timeout(cli.timeout, &config);
    tracing::debug!("Using API at {} (timeout {:?})", api_url, timeout);

    let client = ApiClient::with_timeout(&api_url, timeout)
        .with_context(|| format!("Invalid API URL: {}", api_url))?;
    let dashboard = Dashboard::new(client).with_recent_seconds(config.recent_seconds);

    let ctx = Context {
        dashboard,
        reporter: Arc::new(ConsoleReporter::new(no_color, cli.quiet)),
        credentials: cli.credentials,
        output: cli.output,
        opts: FormatOptions::new(no_color, cli.compact),
        config,
    };

    match cli.command {
        Commands::Login => cmd_login(&ctx).await,
        Commands::Vests { output } => cmd_vests(&ctx, &output).await,
        Commands::Vest { vest_id, output } => cmd_vest(&ctx, vest_id, &output).await,
        Commands::Sensors { vest_id, output } => cmd_sensors(&ctx, vest_id, &output).await,
        Commands::Measurements {
            vest_id,
            seconds,
            no_chart,
            rows,
            output,
        } => {
            cmd_measurements(
                &ctx,
                MeasurementsArgs {
                    vest_id,
                    seconds,
                    no_chart,
                    rows,
                    output,
                },
            )
            .await
        }
        Commands::Add {
            sensor_id,
            value,
            vest,
        } => cmd_add(&ctx, sensor_id, value, vest).await,
        Commands::Exercise => cmd_exercise(&ctx).await,
        Commands::Config { .. } | Commands::Completions { .. } => {
            // Already handled above
            unreachable!()
        }
    }
}
