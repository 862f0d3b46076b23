use std::fs;

use drill_core::model::{QuestionId, StateCode};
use storage::repository::StorageError;
use storage::{JsonQuestionSource, QuestionSource, load_bank};

const ZZ_QUESTIONS: &str = r#"[
    {"questionId": "zz-1", "question": "What does a red octagon mean?",
     "options": ["Stop", "Yield", "Merge", "Speed up"], "correctAnswer": 0, "category": "Signs"},
    {"id": "zz-2", "prompt": "Solid yellow line on your side means?",
     "option_a": "Pass freely", "option_b": "No passing", "option_c": "Bus lane", "option_d": "Bike lane",
     "correct_answer": "B", "category": "Rules"}
]"#;

#[test]
fn loads_both_record_shapes_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("zz.json"), ZZ_QUESTIONS).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let source = JsonQuestionSource::new(dir.path());
    let zz = StateCode::new("ZZ").unwrap();
    assert_eq!(source.states().unwrap(), vec![zz.clone()]);

    let bank = load_bank(&source).unwrap();
    assert_eq!(bank.len(&zz), 2);

    let second = bank.get(&zz, &QuestionId::new("zz-2").unwrap()).unwrap();
    assert_eq!(second.correct().letter(), 'B');
    assert_eq!(second.category().as_str(), "rules");
}

#[test]
fn missing_state_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonQuestionSource::new(dir.path());
    assert!(matches!(
        source.records(&StateCode::new("CA").unwrap()),
        Err(StorageError::NotFound)
    ));
}

#[test]
fn broken_json_reports_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ZZ.json"), "[{").unwrap();
    let source = JsonQuestionSource::new(dir.path());

    match load_bank(&source) {
        Err(StorageError::Serialization(msg)) => assert!(msg.contains("ZZ.json")),
        other => panic!("expected serialization error, got {other:?}"),
    }
}
