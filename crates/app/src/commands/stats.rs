//! The `drill stats` command: print the dashboard.

use std::io::Write;

use anyhow::{Context as _, Result};

use drill_core::model::{QUESTIONS_PER_TEST, StateCode, TestOutcome};
use services::{DashboardView, PassOutlook, TestCard, TestStatus};

use super::Context;

pub async fn execute(ctx: &Context, state: Option<&str>, referral: bool) -> Result<()> {
    let categories = match state {
        Some(raw) => {
            let state = StateCode::new(raw).context("invalid --state")?;
            ctx.load_bank()?.categories(&state)?
        }
        None => Vec::new(),
    };
    let tracker = ctx.progress_service().await?.load(&ctx.user).await?;
    let view = DashboardView::build(&tracker, &categories, referral);
    render(&mut std::io::stdout().lock(), &view)
}

fn render(out: &mut impl Write, view: &DashboardView) -> Result<()> {
    match view.outlook {
        PassOutlook::Unknown => writeln!(out, "Pass probability: n/a (no practice tests yet)")?,
        outlook => writeln!(
            out,
            "Pass probability: {}% ({})",
            view.pass_probability,
            outlook_label(outlook)
        )?,
    }
    writeln!(
        out,
        "Training: {} correct all time, streak {} (best {}), accuracy {}%",
        view.total_correct_all_time, view.current_streak, view.best_streak, view.accuracy_percent
    )?;
    writeln!(
        out,
        "Practice tests unlocked: {}",
        if view.onboarding_complete { "yes" } else { "no" }
    )?;

    for card in &view.tests {
        writeln!(out, "{}", test_line(card))?;
    }

    if !view.categories.is_empty() {
        writeln!(out, "Categories:")?;
        for category in &view.categories {
            let mark = if category.is_complete() { " done" } else { "" };
            writeln!(
                out,
                "  {}: {}/{}{mark}",
                category.category, category.correct, category.target
            )?;
        }
    }
    Ok(())
}

fn test_line(card: &TestCard) -> String {
    let mut line = format!("Test {}: ", card.test_number);
    line.push_str(if card.locked { "locked" } else { "unlocked" });
    if card.status == TestStatus::Completed {
        if let (Some(best), Some(avg)) = (card.best_score, card.average_score) {
            line.push_str(&format!(
                ", best {best}/{QUESTIONS_PER_TEST} over {} attempt(s) (avg {avg:.1})",
                card.attempt_count
            ));
        }
        if let Some(outcome) = card.latest_outcome {
            line.push_str(&format!(", last result: {}", outcome_label(outcome)));
        }
    }
    line
}

fn outlook_label(outlook: PassOutlook) -> &'static str {
    match outlook {
        PassOutlook::Likely => "likely to pass",
        PassOutlook::Borderline => "borderline",
        PassOutlook::AtRisk => "at risk",
        PassOutlook::Unknown => "unknown",
    }
}

fn outcome_label(outcome: TestOutcome) -> &'static str {
    match outcome {
        TestOutcome::Mastered => "mastered",
        TestOutcome::Passed => "passed",
        TestOutcome::KeepPracticing => "keep practicing",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::ProgressTracker;
    use drill_core::model::{Category, TestAttempt, TestNumber};
    use drill_core::time::fixed_now;

    fn rendered(view: &DashboardView) -> String {
        let mut out = Vec::new();
        render(&mut out, view).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_dashboard() {
        let view = DashboardView::build(&ProgressTracker::default(), &[Category::general()], false);
        let text = rendered(&view);
        assert!(text.contains("Pass probability: n/a"));
        assert!(text.contains("Test 1: locked"));
        assert!(text.contains("general: 0/50"));
    }

    #[test]
    fn attempts_show_best_and_badge() {
        let mut tracker = ProgressTracker::default();
        let test = TestNumber::new(2).unwrap();
        tracker.record_test_attempt(TestAttempt::new(test, 50, fixed_now()).unwrap());
        let text = rendered(&DashboardView::build(&tracker, &[], false));
        assert!(text.contains("Pass probability: 100% (likely to pass)"));
        assert!(text.contains("Test 2: locked, best 50/50 over 1 attempt(s) (avg 50.0), last result: mastered"));
    }
}
