use std::sync::Arc;

use drill_core::ProgressPolicy;
use drill_core::model::{
    CorrectAnswerField, OptionIndex, QuestionBank, QuestionRecord, StateCode, TestNumber, UserId,
};
use drill_core::time::fixed_now;
use services::{Clock, DashboardView, PassOutlook, ProgressService, TrainingLoopService};
use storage::repository::{InMemoryRepository, Storage};

fn bank(state: &StateCode) -> QuestionBank {
    let records = (1..=15).map(|i| QuestionRecord {
        id: Some(format!("Q{i}")),
        prompt: Some(format!("Prompt {i}")),
        options: Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
        correct: Some(CorrectAnswerField::Index(2)),
        category: Some(if i % 2 == 0 { "signs" } else { "rules" }.into()),
        ..QuestionRecord::default()
    });
    QuestionBank::from_records(state.clone(), records).unwrap()
}

#[tokio::test]
async fn training_unlocks_tests_and_feeds_dashboard() {
    let state = StateCode::new("ZZ").unwrap();
    let user = UserId::new("smoke").unwrap();
    let progress = ProgressService::new(
        Clock::fixed(fixed_now()),
        ProgressPolicy::default(),
        Arc::new(InMemoryRepository::new()),
    );
    let service = TrainingLoopService::new(Arc::new(bank(&state)), progress.clone());

    let mut session = service.start_session(user.clone(), state.clone()).await.unwrap();
    let mut unlocked_at = None;
    for n in 1..=10 {
        service.next_question(&mut session).unwrap().expect("question");
        let feedback = service
            .answer(&mut session, OptionIndex::ALL[2])
            .await
            .unwrap();
        if feedback.unlocked_practice_tests {
            unlocked_at = Some(n);
        }
    }
    assert_eq!(unlocked_at, Some(10));
    let mut tracker = service.end_session(session).await;

    progress
        .record_test_attempt(&user, &mut tracker, TestNumber::new(1).unwrap(), 42)
        .await
        .unwrap();

    let reloaded = progress.load(&user).await.unwrap();
    let categories = service.bank().categories(&state).unwrap();
    let view = DashboardView::build(&reloaded, &categories, false);

    assert!(view.onboarding_complete);
    assert_eq!(view.total_correct_all_time, 10);
    assert_eq!(view.pass_probability, 84);
    assert_eq!(view.outlook, PassOutlook::Likely);
    assert!(!view.tests[0].locked);
    assert!(view.tests[3].locked);
    let credited: u32 = view.categories.iter().map(|c| c.correct).sum();
    assert_eq!(credited, 10);
}

#[tokio::test]
async fn sqlite_backed_progress_survives_restart() {
    let url = "sqlite:file:services_smoke?mode=memory&cache=shared";
    let state = StateCode::new("ZZ").unwrap();
    let user = UserId::new("smoke").unwrap();

    let storage = Storage::sqlite(url).await.unwrap();
    let progress = ProgressService::new(
        Clock::fixed(fixed_now()),
        ProgressPolicy::default(),
        storage.progress.clone(),
    );
    let service = TrainingLoopService::new(Arc::new(bank(&state)), progress);
    let mut session = service.start_session(user.clone(), state.clone()).await.unwrap();
    for _ in 0..3 {
        service.next_question(&mut session).unwrap();
        service.answer(&mut session, OptionIndex::ALL[0]).await.unwrap();
    }
    service.end_session(session).await;

    let reopened = Storage::sqlite(url).await.unwrap();
    let progress = ProgressService::new(
        Clock::fixed(fixed_now()),
        ProgressPolicy::default(),
        reopened.progress,
    );
    let tracker = progress.load(&user).await.unwrap();
    assert_eq!(tracker.training().total_correct_all_time(), 0);
    assert_eq!(tracker.training().recent().len(), 3);
    assert_eq!(tracker.training().best_streak(), 0);
    drop(storage);
}
