//! The `drill record` command: log a finished practice test.

use anyhow::{Context as _, Result};

use drill_core::model::TestNumber;

use super::Context;

pub async fn execute(ctx: &Context, test: u8, score: u32) -> Result<()> {
    let test = TestNumber::new(test).context("invalid --test")?;
    let progress = ctx.progress_service().await?;
    let mut tracker = progress.load(&ctx.user).await?;
    if !tracker.is_test_unlocked(test, true) {
        tracing::warn!(test = %test, "recording an attempt for a test that is still locked");
    }

    let attempt = progress
        .record_test_attempt(&ctx.user, &mut tracker, test, score)
        .await?;
    let outcome = attempt.outcome(tracker.policy().pass_mark_percent);
    println!(
        "Recorded test {test}: {}/{} ({}).",
        attempt.score(),
        attempt.total(),
        if outcome.is_pass() { "pass" } else { "fail" }
    );
    println!("Pass probability: {}%", tracker.pass_probability());
    Ok(())
}
