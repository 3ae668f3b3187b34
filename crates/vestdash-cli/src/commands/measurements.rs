//! Measurement commands: recent data with charts, and manual submission.

use anyhow::{Result, bail};
use vestdash_core::{Dashboard, Session, SensorId, VestId, format_measurements};

use super::Context;
use crate::cli::{OutputArgs, OutputFormat};
use crate::format::{
    FormatOptions, format_charts, format_measurements_csv, format_measurements_json,
    format_measurements_text,
};
use crate::util::{terminal_width, write_output};

/// Arguments for the measurements command.
pub struct MeasurementsArgs {
    pub vest_id: VestId,
    pub seconds: Option<u64>,
    pub no_chart: bool,
    pub rows: usize,
    pub output: OutputArgs,
}

pub async fn cmd_measurements(ctx: &Context, args: MeasurementsArgs) -> Result<()> {
    let mut session = ctx.logged_in_session()?;
    ctx.select_vest(&mut session, args.vest_id)?;

    let dashboard = match args.seconds {
        Some(seconds) => ctx.dashboard.clone().with_recent_seconds(seconds),
        None => ctx.dashboard.clone(),
    };

    let opts = ctx.opts.with_no_header(args.output.no_header);
    let content = render_recent(
        &dashboard,
        &session,
        args.vest_id,
        args.output.format,
        !args.no_chart,
        args.rows,
        &opts,
    )
    .await?;
    ctx.check_errors()?;

    write_output(ctx.output.as_ref(), &content)?;
    Ok(())
}

pub async fn cmd_add(
    ctx: &Context,
    sensor_id: SensorId,
    value: f64,
    vest: Option<VestId>,
) -> Result<()> {
    let mut session = ctx.logged_in_session()?;
    if let Some(vest_id) = vest {
        ctx.select_vest(&mut session, vest_id)?;
    }

    if !ctx.dashboard.add_measurement(&session, sensor_id, value).await {
        bail!("Measurement for sensor {} was not accepted", sensor_id);
    }

    // Refresh the selected vest so the new value shows up.
    if let Some(vest_id) = session.selected_vest() {
        let content = render_recent(
            &ctx.dashboard,
            &session,
            vest_id,
            OutputFormat::Text,
            true,
            10,
            &ctx.opts,
        )
        .await?;
        ctx.check_errors()?;
        write_output(ctx.output.as_ref(), &content)?;
    }
    Ok(())
}

async fn render_recent(
    dashboard: &Dashboard,
    session: &Session,
    vest_id: VestId,
    format: OutputFormat,
    chart: bool,
    rows: usize,
    opts: &FormatOptions,
) -> Result<String> {
    let raw = dashboard.get_recent_measurements(session, vest_id).await;
    let simulated = raw.iter().any(|m| m.is_simulated());
    let table = format_measurements(&raw);

    let content = match format {
        OutputFormat::Json => format_measurements_json(vest_id, &table, simulated, opts)?,
        OutputFormat::Csv => format_measurements_csv(&table, opts),
        OutputFormat::Text => {
            let mut text = format_measurements_text(&table, simulated, rows, opts);
            if chart && !table.is_empty() {
                let width = terminal_width().saturating_sub(4).clamp(10, 120);
                text.push('\n');
                text.push_str(&format_charts(&table.series(), width, opts));
            }
            text
        }
    };
    Ok(content)
}
