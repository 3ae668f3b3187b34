//! Login command implementation.

use anyhow::Result;

use super::Context;
use crate::format::format_vests_text;
use crate::util::write_output;

pub async fn cmd_login(ctx: &Context) -> Result<()> {
    let session = ctx.logged_in_session()?;
    let vests = ctx.dashboard.list_user_vests(&session).await;
    ctx.check_errors()?;

    let name = session
        .user()
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();
    let content = format!(
        "Signed in as {}\n\n{}",
        name,
        format_vests_text(&vests, &ctx.opts)
    );
    write_output(ctx.output.as_ref(), &content)?;
    Ok(())
}
