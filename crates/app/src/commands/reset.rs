//! The `drill reset` command.

use anyhow::{Result, bail};

use super::Context;

pub async fn execute(ctx: &Context, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("refusing to erase progress for {} without --yes", ctx.user);
    }
    let progress = ctx.progress_service().await?;
    progress.reset_all_data(&ctx.user).await?;
    println!("All progress for {} cleared.", ctx.user);
    Ok(())
}
