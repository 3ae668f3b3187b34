//! Vest and sensor listing commands.

use anyhow::{Result, bail};
use vestdash_core::VestId;

use super::Context;
use crate::cli::{OutputArgs, OutputFormat};
use crate::format::{
    format_sensors_csv, format_sensors_text, format_vest_detail_json, format_vest_detail_text,
    format_vests_csv, format_vests_text,
};
use crate::util::write_output;

pub async fn cmd_vests(ctx: &Context, output: &OutputArgs) -> Result<()> {
    let session = ctx.logged_in_session()?;
    let vests = ctx.dashboard.list_user_vests(&session).await;
    ctx.check_errors()?;

    let opts = ctx.opts.with_no_header(output.no_header);
    let content = match output.format {
        OutputFormat::Json => opts.as_json(&vests)?,
        OutputFormat::Text => format_vests_text(&vests, &opts),
        OutputFormat::Csv => format_vests_csv(&vests, &opts),
    };
    write_output(ctx.output.as_ref(), &content)?;
    Ok(())
}

pub async fn cmd_vest(ctx: &Context, vest_id: VestId, output: &OutputArgs) -> Result<()> {
    let mut session = ctx.logged_in_session()?;
    ctx.select_vest(&mut session, vest_id)?;

    let Some(vest) = ctx.dashboard.get_vest(&session, vest_id).await else {
        ctx.check_errors()?;
        bail!("Vest {} not found", vest_id);
    };
    let sensors = ctx.dashboard.get_vest_sensors(&session, vest_id).await;
    ctx.check_errors()?;

    let opts = ctx.opts.with_no_header(output.no_header);
    let content = match output.format {
        OutputFormat::Json => format_vest_detail_json(&vest, &sensors, &opts)?,
        OutputFormat::Text => format_vest_detail_text(&vest, &sensors, &opts),
        OutputFormat::Csv => format_sensors_csv(&sensors, &opts),
    };
    write_output(ctx.output.as_ref(), &content)?;
    Ok(())
}

pub async fn cmd_sensors(ctx: &Context, vest_id: VestId, output: &OutputArgs) -> Result<()> {
    let mut session = ctx.logged_in_session()?;
    ctx.select_vest(&mut session, vest_id)?;

    let sensors = ctx.dashboard.get_vest_sensors(&session, vest_id).await;
    ctx.check_errors()?;

    let opts = ctx.opts.with_no_header(output.no_header);
    let content = match output.format {
        OutputFormat::Json => opts.as_json(&sensors)?,
        OutputFormat::Text => format_sensors_text(&sensors, &opts),
        OutputFormat::Csv => format_sensors_csv(&sensors, &opts),
    };
    write_output(ctx.output.as_ref(), &content)?;
    Ok(())
}
