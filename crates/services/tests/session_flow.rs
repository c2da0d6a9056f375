use std::path::Path;

use quiz_core::model::{QuizKey, Selection};
use quiz_core::time::fixed_now;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{AppServices, Clock, EngineState, QuizSession, SessionEngine, SessionError};
use storage::question_bank::{self, LoadError};

const TWO_QUESTIONS: &str = r#"{
  "chapters": [{
    "chapter": "Chapter 1: Key concepts",
    "questions": [
      {
        "question": "Which one is a practice?",
        "options": ["A", "B", "C"],
        "answer": "B",
        "explanation": {"B": "B is the practice."}
      },
      {
        "question": "Which two are values?",
        "options": ["A", "B", "C", "D"],
        "answer": ["A", "C"]
      }
    ]
  }]
}"#;

fn write_quiz(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

fn open_app(quiz_dir: &Path, scores_path: &Path) -> AppServices {
    AppServices::open(quiz_dir, scores_path, Clock::fixed(fixed_now()), 3600)
}

fn index_of(engine: &SessionEngine, label: &str) -> usize {
    engine
        .session()
        .unwrap()
        .current()
        .options
        .iter()
        .position(|o| o == label)
        .unwrap()
}

/// Ticks the correct single answer and half of the multi answer.
fn answer_three_quarters(engine: &mut SessionEngine) {
    let text = engine.session().unwrap().current().question.text().to_owned();
    let first = if text.starts_with("Which one") {
        Selection::from([index_of(engine, "B")])
    } else {
        Selection::from([index_of(engine, "A")])
    };
    engine.submit(first).unwrap();

    let text = engine.session().unwrap().current().question.text().to_owned();
    let second = if text.starts_with("Which one") {
        Selection::from([index_of(engine, "B")])
    } else {
        Selection::from([index_of(engine, "A")])
    };
    let outcome = engine.submit(second).unwrap();
    assert!(outcome.finished);
}

#[test]
fn finished_attempt_is_scored_persisted_and_listed() {
    let quiz_dir = tempfile::tempdir().unwrap();
    let score_dir = tempfile::tempdir().unwrap();
    let scores_path = score_dir.path().join("scores.json");
    let quiz = write_quiz(quiz_dir.path(), "hoofdstuk1.json", TWO_QUESTIONS);

    let mut app = open_app(quiz_dir.path(), &scores_path);
    app.engine_mut().start_from_path(&quiz).unwrap();
    assert_eq!(app.engine().session().unwrap().title(), "Chapter 1: Key concepts (2)");

    answer_three_quarters(app.engine_mut());
    let report = app.engine_mut().finish().unwrap();

    assert_eq!(report.summary.total(), 2);
    assert_eq!(report.summary.correct(), 1);
    assert_eq!(report.summary.incorrect(), 0);
    assert_eq!(report.summary.skipped(), 0);
    assert!((report.summary.total_score() - 1.5).abs() < 1e-9);
    assert!((report.summary.pct() - 75.0).abs() < 1e-9);
    assert!(report.summary.passed());
    assert!(report.recorded.is_some());

    let review = app.engine().review().unwrap();
    let practice = review
        .iter()
        .find(|item| item.text.starts_with("Which one"))
        .unwrap();
    let b = practice.options.iter().find(|o| o.label == "B").unwrap();
    assert!(b.selected && b.correct);
    assert_eq!(b.explanation.as_deref(), Some("B is the practice."));
    app.engine_mut().close();
    assert_eq!(app.engine().state(), EngineState::Idle);

    let entries = app.catalog().entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].question_count, 2);
    assert_eq!(entries[0].last_pct, Some(75.0));
    assert_eq!(entries[0].passed(), Some(true));

    let restarted = open_app(quiz_dir.path(), &scores_path);
    assert_eq!(
        restarted.scores().percent_for(&QuizKey::new("hoofdstuk1.json")),
        Some(75.0)
    );
}

#[test]
fn stopping_before_any_answer_saves_a_plain_zero() {
    let dir = tempfile::tempdir().unwrap();
    let scores_path = dir.path().join("scores.json");
    let quiz = write_quiz(dir.path(), "h1.json", TWO_QUESTIONS);

    let mut app = open_app(dir.path(), &scores_path);
    app.engine_mut().start_from_path(&quiz).unwrap();
    let report = app.engine_mut().stop().unwrap();

    assert_eq!(report.summary.skipped(), 2);
    assert!(!report.summary.pct().is_sign_negative());
    assert!(!report.summary.total_score().is_sign_negative());
    let recorded = report.recorded.unwrap();
    assert!(!recorded.pct.is_sign_negative());

    let body = std::fs::read_to_string(&scores_path).unwrap();
    assert!(body.contains("\"pct\": 0.0"), "{body}");
    assert!(!body.contains("-0"), "{body}");
}

#[test]
fn abandoned_attempt_leaves_the_score_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let scores_path = dir.path().join("scores.json");
    let quiz = write_quiz(dir.path(), "hoofdstuk2.json", TWO_QUESTIONS);

    let mut app = open_app(dir.path(), &scores_path);
    app.engine_mut().start_from_path(&quiz).unwrap();
    app.engine_mut().submit(Selection::empty()).unwrap();

    assert!(app.engine_mut().exit());
    assert!(!scores_path.exists());
    assert_eq!(app.catalog().entries().unwrap()[0].last_pct, None);
}

#[test]
fn seeded_sessions_shuffle_the_same_way() {
    let dir = tempfile::tempdir().unwrap();
    let quiz = write_quiz(dir.path(), "toets1_1_en.json", TWO_QUESTIONS);
    let document = question_bank::load_path(&quiz).unwrap();

    let first =
        QuizSession::start_with_rng(document.clone(), fixed_now(), &mut StdRng::seed_from_u64(7))
            .unwrap();
    let second =
        QuizSession::start_with_rng(document, fixed_now(), &mut StdRng::seed_from_u64(7)).unwrap();

    assert_eq!(first.total(), 2);
    for position in 0..2 {
        assert_eq!(first.option_order(position), second.option_order(position));
        let mut sorted = first.option_order(position).unwrap().to_vec();
        sorted.sort();
        assert!(sorted == ["A", "B", "C"] || sorted == ["A", "B", "C", "D"]);
    }
}

#[test]
fn missing_answer_labels_become_selectable() {
    let dir = tempfile::tempdir().unwrap();
    let quiz = write_quiz(
        dir.path(),
        "h5.json",
        r#"{"chapters":[{"questions":[{"question":"Q","options":["A","B"],"answer":"Z"}]}]}"#,
    );

    let mut app = open_app(dir.path(), &dir.path().join("scores.json"));
    app.engine_mut().start_from_path(&quiz).unwrap();
    assert_eq!(app.engine().session().unwrap().current().options.len(), 3);

    let z = index_of(app.engine(), "Z");
    let outcome = app.engine_mut().submit(Selection::from([z])).unwrap();
    assert!((outcome.score - 1.0).abs() < f64::EPSILON);
}

#[test]
fn load_failures_name_the_file_and_keep_the_engine_idle() {
    let dir = tempfile::tempdir().unwrap();
    let broken = write_quiz(dir.path(), "broken.json", "{ \"chapters\": [");
    let missing = dir.path().join("missing.json");

    let mut app = open_app(dir.path(), &dir.path().join("scores.json"));

    match app.engine_mut().start_from_path(&broken) {
        Err(SessionError::Load(LoadError::MalformedDocument { path, .. })) => {
            assert_eq!(path, broken);
        }
        other => panic!("expected malformed document, got {other:?}"),
    }
    match app.engine_mut().start_from_path(&missing) {
        Err(SessionError::Load(LoadError::Unreadable { path, .. })) => assert_eq!(path, missing),
        other => panic!("expected unreadable file, got {other:?}"),
    }
    assert_eq!(app.engine().state(), EngineState::Idle);

    let err = app.engine_mut().start_from_path(&broken).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}
