mod common;

use std::sync::Arc;
use std::time::Duration;

use arena_core::domain::{AnswerValue, Language, ParticipantStatus, Score, UserId};
use arena_core::scoring::ScoreChange;
use arena_engine::ws_api::ServerMessage;
use arena_engine::{ContestStore, EngineConfig, EngineError, LeaderboardStore};
use common::{SandboxMode, TestContest, capital_question, points, sum_question};

const PYTHON: i32 = 71;

fn code(source: &str) -> AnswerValue {
    AnswerValue::Code {
        source: source.to_string(),
        language_id: PYTHON,
    }
}

#[tokio::test]
async fn passing_submission_awards_points_once() {
    let contest = TestContest::new(SandboxMode::Pass);
    let question = sum_question(40);
    contest.store.insert_question(question.clone()).await;
    let user_id = contest.join("ada").await;

    let first = contest
        .engine
        .submit_code(
            contest.contest_id,
            user_id,
            question.id,
            "def add(a, b): return a + b".into(),
            PYTHON,
        )
        .await
        .expect("submit should grade");

    assert_eq!((first.result.passed, first.result.failed, first.result.total), (3, 0, 3));
    assert_eq!(first.result.compilation_error, None);
    assert_eq!(first.change, ScoreChange::Award(points(40)));
    assert_eq!(first.score, points(40));

    let second = contest
        .engine
        .submit_code(
            contest.contest_id,
            user_id,
            question.id,
            "def add(a, b): return b + a".into(),
            PYTHON,
        )
        .await
        .expect("resubmit should grade");

    assert_eq!(second.change, ScoreChange::Unchanged);
    assert_eq!(second.score, points(40));

    let participant = contest
        .store
        .find_participant(contest.contest_id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(participant.score, points(40));
    assert_eq!(participant.status, ParticipantStatus::Participating);
}

#[tokio::test]
async fn failing_resubmission_retracts_previous_award() {
    let contest = TestContest::new(SandboxMode::Pass);
    let question = sum_question(25);
    contest.store.insert_question(question.clone()).await;
    let user_id = contest.join("grace").await;

    contest
        .engine
        .submit_code(contest.contest_id, user_id, question.id, "ok".into(), PYTHON)
        .await
        .unwrap();

    contest.sandbox.set_mode(SandboxMode::Fail);
    let outcome = contest
        .engine
        .submit_code(contest.contest_id, user_id, question.id, "broken".into(), PYTHON)
        .await
        .unwrap();

    assert_eq!(outcome.change, ScoreChange::Retract(points(25)));
    assert_eq!(outcome.score, Score::ZERO);
    assert_eq!(outcome.result.failed, 3);

    let submission = contest
        .store
        .find_submission(contest.contest_id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!submission.was_correct(question.id));
    assert_eq!(submission.score, submission.recompute_score());
}

#[tokio::test]
async fn compile_error_keeps_score_and_reports_diagnostic() {
    let contest = TestContest::new(SandboxMode::CompileError("SyntaxError: invalid syntax".into()));
    let question = sum_question(10);
    contest.store.insert_question(question.clone()).await;
    let user_id = contest.join("linus").await;

    let outcome = contest
        .engine
        .submit_code(contest.contest_id, user_id, question.id, "def add(:".into(), PYTHON)
        .await
        .unwrap();

    assert_eq!((outcome.result.passed, outcome.result.failed, outcome.result.total), (0, 3, 3));
    assert_eq!(
        outcome.result.compilation_error.as_deref(),
        Some("SyntaxError: invalid syntax")
    );
    assert_eq!(outcome.change, ScoreChange::Unchanged);
    assert_eq!(outcome.score, Score::ZERO);
}

#[tokio::test]
async fn sandbox_failures_never_move_the_score() {
    let contest = TestContest::new(SandboxMode::Pass);
    let question = sum_question(30);
    contest.store.insert_question(question.clone()).await;
    let user_id = contest.join("barbara").await;

    contest
        .engine
        .submit_code(contest.contest_id, user_id, question.id, "ok".into(), PYTHON)
        .await
        .unwrap();

    for (mode, diagnostic) in [
        (SandboxMode::Unreachable, "connection error"),
        (SandboxMode::Timeout, "execution timed out"),
        (SandboxMode::Garbage, "malformed output"),
    ] {
        contest.sandbox.set_mode(mode);
        let outcome = contest
            .engine
            .submit_code(contest.contest_id, user_id, question.id, "ok".into(), PYTHON)
            .await
            .expect("execution failures are absorbed");

        assert_eq!(outcome.result.compilation_error.as_deref(), Some(diagnostic));
        assert_eq!(outcome.result.total, 3);
        assert_eq!(outcome.change, ScoreChange::Unchanged);
        assert_eq!(outcome.score, points(30));
    }
}

#[tokio::test]
async fn unsupported_language_is_a_result_not_an_error() {
    let contest = TestContest::new(SandboxMode::Pass);
    let question = sum_question(10);
    contest.store.insert_question(question.clone()).await;
    let user_id = contest.join("ken").await;

    let outcome = contest
        .engine
        .submit_code(contest.contest_id, user_id, question.id, "fn add()".into(), 73)
        .await
        .unwrap();

    assert_eq!(
        outcome.result.compilation_error.as_deref(),
        Some("language not supported")
    );
    assert_eq!(outcome.result.total, 3);
    assert_eq!(contest.sandbox.calls(), 0);
}

#[tokio::test]
async fn run_code_uses_visible_cases_and_never_scores() {
    let contest = TestContest::new(SandboxMode::Pass);
    let question = sum_question(10);
    contest.store.insert_question(question.clone()).await;
    let user_id = contest.join("dennis").await;

    let result = contest
        .engine
        .run_code(question.id, "def add(a, b): return a + b", PYTHON)
        .await
        .unwrap();

    assert_eq!((result.passed, result.total), (2, 2));
    let request = contest.sandbox.last_request().expect("sandbox was called");
    assert_eq!(request.language, Language::Python);
    assert!(request.source_code.contains("def add(a, b): return a + b"));
    assert!(!request.stdin.contains("[-4,4]"));

    let submission = contest
        .store
        .find_submission(contest.contest_id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(submission.score, Score::ZERO);
    assert!(submission.answers.is_empty());
}

#[tokio::test]
async fn mcq_progress_grades_inline() {
    let contest = TestContest::new(SandboxMode::Pass);
    let (question, correct, wrong) = capital_question(15);
    contest.store.insert_question(question.clone()).await;
    let user_id = contest.join("margaret").await;

    let saved = contest
        .engine
        .save_progress(
            contest.contest_id,
            user_id,
            question.id,
            AnswerValue::Choice { option_id: correct },
        )
        .await
        .unwrap();
    assert_eq!(saved.score, points(15));

    let submission = contest
        .store
        .find_submission(contest.contest_id, user_id)
        .await
        .unwrap()
        .unwrap();
    let entry = submission.answer(question.id).unwrap();
    assert!(entry.is_correct);
    assert_eq!(entry.points_awarded, points(15));

    let saved = contest
        .engine
        .save_progress(
            contest.contest_id,
            user_id,
            question.id,
            AnswerValue::Choice { option_id: wrong },
        )
        .await
        .unwrap();
    assert_eq!(saved.score, Score::ZERO);

    let submission = contest
        .store
        .find_submission(contest.contest_id, user_id)
        .await
        .unwrap()
        .unwrap();
    let entry = submission.answer(question.id).unwrap();
    assert!(!entry.is_correct);
    assert_eq!(entry.points_awarded, Score::ZERO);
}

#[tokio::test]
async fn progress_saves_keep_score_equal_to_credited_answers() {
    let contest = TestContest::new(SandboxMode::Pass);
    let (mcq, correct, _) = capital_question(5);
    let coding = sum_question(20);
    contest.store.insert_question(mcq.clone()).await;
    contest.store.insert_question(coding.clone()).await;
    let user_id = contest.join("alan").await;

    contest
        .engine
        .submit_code(contest.contest_id, user_id, coding.id, "v1".into(), PYTHON)
        .await
        .unwrap();

    let steps = [
        (mcq.id, AnswerValue::Choice { option_id: correct }),
        (coding.id, code("v2 draft")),
        (coding.id, code("v3 draft")),
    ];
    for (question_id, answer) in steps {
        let saved = contest
            .engine
            .save_progress(contest.contest_id, user_id, question_id, answer)
            .await
            .unwrap();

        let submission = contest
            .store
            .find_submission(contest.contest_id, user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.score, submission.recompute_score());
        assert_eq!(submission.score, submission.recompute_score());
    }

    let submission = contest
        .store
        .find_submission(contest.contest_id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(submission.score, points(25));
}

#[tokio::test]
async fn mismatched_answer_kind_is_rejected() {
    let contest = TestContest::new(SandboxMode::Pass);
    let (mcq, _, _) = capital_question(5);
    contest.store.insert_question(mcq.clone()).await;
    let user_id = contest.join("edsger").await;

    let err = contest
        .engine
        .save_progress(contest.contest_id, user_id, mcq.id, code("print(1)"))
        .await
        .expect_err("code answer for an MCQ");

    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let contest = TestContest::new(SandboxMode::Pass);
    let question = sum_question(5);
    contest.store.insert_question(question.clone()).await;

    let stranger = UserId::new();
    let err = contest
        .engine
        .start(contest.contest_id, stranger)
        .await
        .expect_err("unregistered participant");
    assert!(matches!(err, EngineError::NotFound { entity: "participant", .. }));

    contest.store.register(contest.contest_id, stranger).await;
    let err = contest
        .engine
        .submit_code(contest.contest_id, stranger, question.id, "x".into(), PYTHON)
        .await
        .expect_err("no submission yet");
    assert!(matches!(err, EngineError::NotFound { entity: "submission", .. }));
    assert_eq!(contest.sandbox.calls(), 0);

    let err = contest
        .engine
        .run_code(arena_core::domain::QuestionId::new(), "x", PYTHON)
        .await
        .expect_err("unknown question");
    assert!(matches!(err, EngineError::NotFound { entity: "question", .. }));
}

#[tokio::test]
async fn disqualified_participants_cannot_answer() {
    let contest = TestContest::new(SandboxMode::Pass);
    let (mcq, correct, _) = capital_question(5);
    contest.store.insert_question(mcq.clone()).await;
    let user_id = contest.join("mallory").await;

    let mut participant = contest
        .store
        .find_participant(contest.contest_id, user_id)
        .await
        .unwrap()
        .unwrap();
    participant.status = ParticipantStatus::Disqualified;
    contest.store.save_participant(&participant).await.unwrap();

    let err = contest
        .engine
        .save_progress(
            contest.contest_id,
            user_id,
            mcq.id,
            AnswerValue::Choice { option_id: correct },
        )
        .await
        .expect_err("disqualified");
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn finished_submission_is_closed() {
    let contest = TestContest::new(SandboxMode::Pass);
    let (mcq, correct, _) = capital_question(5);
    contest.store.insert_question(mcq.clone()).await;
    let user_id = contest.join("donald").await;

    contest
        .engine
        .save_progress(
            contest.contest_id,
            user_id,
            mcq.id,
            AnswerValue::Choice { option_id: correct },
        )
        .await
        .unwrap();
    let finished = contest.engine.finish(contest.contest_id, user_id).await.unwrap();
    assert!(finished.is_completed());
    assert_eq!(finished.score, points(5));

    let again = contest.engine.finish(contest.contest_id, user_id).await.unwrap();
    assert_eq!(again.id, finished.id);

    let err = contest
        .engine
        .save_progress(
            contest.contest_id,
            user_id,
            mcq.id,
            AnswerValue::Choice { option_id: correct },
        )
        .await
        .expect_err("completed submission");
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn missing_participant_row_does_not_fail_scoring() {
    let contest = TestContest::new(SandboxMode::Pass);
    let (mcq, correct, _) = capital_question(8);
    contest.store.insert_question(mcq.clone()).await;
    let user_id = contest.join("oscar").await;
    contest.store.remove_participant(contest.contest_id, user_id).await;

    let saved = contest
        .engine
        .save_progress(
            contest.contest_id,
            user_id,
            mcq.id,
            AnswerValue::Choice { option_id: correct },
        )
        .await
        .expect("consistency failures are swallowed");

    assert_eq!(saved.score, points(8));
    let ranked = contest.leaderboard.top_n(contest.contest_id, None).await.unwrap();
    assert_eq!(ranked[0].score, points(8));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_preserve_invariant() {
    let contest = Arc::new(TestContest::new(SandboxMode::Pass));
    let questions: Vec<_> = (0..4).map(|_| sum_question(10)).collect();
    for question in &questions {
        contest.store.insert_question(question.clone()).await;
    }
    let user_id = contest.join("tabs").await;

    let mut handles = Vec::new();
    for round in 0..3 {
        for question in &questions {
            let contest = contest.clone();
            let question_id = question.id;
            handles.push(tokio::spawn(async move {
                contest
                    .engine
                    .submit_code(
                        contest.contest_id,
                        user_id,
                        question_id,
                        format!("v{round}"),
                        PYTHON,
                    )
                    .await
                    .unwrap()
            }));
        }
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let submission = contest
        .store
        .find_submission(contest.contest_id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(submission.score, points(40));
    assert_eq!(submission.score, submission.recompute_score());
}

#[tokio::test]
async fn leaderboard_orders_and_rebuilds_from_submissions() {
    let contest = TestContest::new(SandboxMode::Pass);
    let (mcq, correct, _) = capital_question(30);
    let coding = sum_question(50);
    contest.store.insert_question(mcq.clone()).await;
    contest.store.insert_question(coding.clone()).await;
    let u1 = contest.join("u1").await;
    let u2 = contest.join("u2").await;

    contest
        .engine
        .save_progress(contest.contest_id, u1, mcq.id, AnswerValue::Choice { option_id: correct })
        .await
        .unwrap();
    contest
        .engine
        .submit_code(contest.contest_id, u2, coding.id, "ok".into(), PYTHON)
        .await
        .unwrap();

    let board = contest.engine.leaderboard(contest.contest_id).await.unwrap();
    let view: Vec<(&str, u32)> = board
        .iter()
        .map(|e| (e.identity.as_str(), e.score.value()))
        .collect();
    assert_eq!(view, vec![("u2", 50), ("u1", 30)]);

    contest.engine.remove_contest(contest.contest_id).await.unwrap();
    assert!(contest.engine.leaderboard(contest.contest_id).await.unwrap().is_empty());

    let ranked = contest.engine.rebuild_leaderboard(contest.contest_id).await.unwrap();
    assert_eq!(ranked, 2);
    let board = contest.engine.leaderboard(contest.contest_id).await.unwrap();
    assert_eq!(board[0].participant_id, u2);
    assert_eq!(board[1].score, points(30));
}

#[tokio::test(start_paused = true)]
async fn viewer_sees_descending_snapshot_then_polled_update() {
    let contest = TestContest::new(SandboxMode::Pass);
    let (u1, u2) = (UserId::new(), UserId::new());
    contest.store.insert_user(u1, "u1").await;
    contest.store.insert_user(u2, "u2").await;
    contest.leaderboard.set_score(contest.contest_id, u1, points(30)).await.unwrap();
    contest.leaderboard.set_score(contest.contest_id, u2, points(50)).await.unwrap();

    let mut session = contest.engine.feed_session();
    let subscribe = format!(
        r#"{{"type":"SUBSCRIBE_LEADERBOARD","payload":{{"contestId":"{}"}}}}"#,
        contest.contest_id
    );
    assert!(session.dispatch(&subscribe).is_none());

    let ServerMessage::LeaderboardUpdate { payload } = session.next_update().await.unwrap() else {
        panic!("expected leaderboard update");
    };
    let first: Vec<(UserId, u32)> = payload
        .leaderboard
        .iter()
        .map(|entry| (entry.participant_id, entry.score.value()))
        .collect();
    assert_eq!(first, vec![(u2, 50), (u1, 30)]);

    contest.leaderboard.set_score(contest.contest_id, u1, points(60)).await.unwrap();
    let started = tokio::time::Instant::now();
    let ServerMessage::LeaderboardUpdate { payload } = session.next_update().await.unwrap() else {
        panic!("expected leaderboard update");
    };
    assert!(started.elapsed() <= Duration::from_secs(2));
    let second: Vec<(UserId, u32)> = payload
        .leaderboard
        .iter()
        .map(|entry| (entry.participant_id, entry.score.value()))
        .collect();
    assert_eq!(second, vec![(u1, 60), (u2, 50)]);
}

#[test]
fn engine_config_file_round_trip() {
    let path = std::env::temp_dir().join(format!("arena-engine-{}.toml", UserId::new()));
    std::fs::write(
        &path,
        "[execution]\nbase_url = \"http://judge0:2358\"\n\n[feed]\npoll_interval_ms = 250\n",
    )
    .unwrap();

    let config = EngineConfig::from_file(&path).expect("config file should load");
    std::fs::remove_file(&path).ok();

    assert_eq!(config.feed.poll_interval(), Duration::from_millis(250));
    assert!(EngineConfig::from_file(&path).is_err());
}
