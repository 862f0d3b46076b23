//! The `drill train` command: an interactive drill on stdin/stdout.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use drill_core::model::{OptionIndex, Question, StateCode};
use services::{AnswerFeedback, TrainingLoopService, TrainingSession};

use super::Context;

pub async fn execute(ctx: &Context, state: &str) -> Result<()> {
    let state = StateCode::new(state).context("invalid --state")?;
    let bank = Arc::new(ctx.load_bank()?);
    let service = TrainingLoopService::new(bank, ctx.progress_service().await?);
    let session = service.start_session(ctx.user.clone(), state).await?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    drill(&service, session, stdin.lock(), stdout.lock()).await
}

async fn drill(
    service: &TrainingLoopService,
    mut session: TrainingSession,
    mut input: impl BufRead,
    mut out: impl Write,
) -> Result<()> {
    let mut line = String::new();
    loop {
        let Some(question) = service.next_question(&mut session)?.cloned() else {
            writeln!(out, "No questions available for {}.", session.state())?;
            break;
        };
        show_question(&mut out, &question)?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let reply = line.trim();
        if reply.eq_ignore_ascii_case("q") {
            break;
        }
        let Ok(chosen) = OptionIndex::from_letter(reply) else {
            writeln!(out, "Please enter A, B, C or D (q to quit).")?;
            continue;
        };
        if let Some(feedback) = service.answer(&mut session, chosen).await {
            show_feedback(&mut out, &question, &feedback)?;
        }
    }

    let training = session.tracker().training();
    let (correct, answered) = (training.correct(), training.answered());
    let tracker = service.end_session(session).await;
    writeln!(
        out,
        "Session over: {correct}/{answered} correct. {} correct all time.",
        tracker.training().total_correct_all_time()
    )?;
    Ok(())
}

fn show_question(out: &mut impl Write, question: &Question) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "[{}] {}", question.category(), question.prompt())?;
    for index in OptionIndex::ALL {
        writeln!(out, "  {}) {}", index.letter(), question.option(index))?;
    }
    write!(out, "Answer [A-D, q to quit]: ")?;
    out.flush()?;
    Ok(())
}

fn show_feedback(
    out: &mut impl Write,
    question: &Question,
    feedback: &AnswerFeedback,
) -> Result<()> {
    if feedback.is_correct {
        writeln!(out, "Correct! Streak {}.", feedback.current_streak)?;
    } else {
        let right = feedback.correct_option;
        writeln!(
            out,
            "Incorrect. The answer is {}) {}.",
            right.letter(),
            question.option(right)
        )?;
    }
    if feedback.unlocked_practice_tests {
        writeln!(out, "Practice tests unlocked!")?;
    }
    Ok(())
}
