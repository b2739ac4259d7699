#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use arena_core::domain::{
    ContestId, ExecutionClient, ExecutionError, ExecutionRequest, ExecutionResponse, McqOption,
    OptionId, Question, Score, TestCase, UserId,
};
use arena_engine::{ContestEngine, FeedConfig, MemoryContestStore, MemoryLeaderboard};
use async_trait::async_trait;
use serde_json::{Value, json};

/// What the fake sandbox answers with on the next call.
#[derive(Debug, Clone)]
pub enum SandboxMode {
    /// Every case reports `actualOutput == expectedOutput`.
    Pass,
    /// Every case reports a wrong answer.
    Fail,
    CompileError(String),
    Garbage,
    Unreachable,
    Timeout,
}

/// Scripted stand-in for the execution service. It reads the stdin document
/// the harness would read and fabricates the matching report line.
#[derive(Clone)]
pub struct FakeSandbox {
    mode: Arc<Mutex<SandboxMode>>,
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<ExecutionRequest>>>,
}

impl FakeSandbox {
    pub fn new(mode: SandboxMode) -> Self {
        Self {
            mode: Arc::new(Mutex::new(mode)),
            calls: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_mode(&self, mode: SandboxMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ExecutionRequest> {
        self.last_request.lock().unwrap().clone()
    }

    fn report(stdin: &str, pass: bool) -> String {
        let document: Value = serde_json::from_str(stdin).expect("harness stdin is json");
        let cases = document["cases"].as_array().cloned().unwrap_or_default();
        let results: Vec<Value> = cases
            .iter()
            .map(|case| {
                let actual = if pass {
                    case["expectedOutput"].clone()
                } else {
                    json!("wrong")
                };
                json!({
                    "id": case["id"],
                    "input": case["input"],
                    "actualOutput": actual,
                    "expectedOutput": case["expectedOutput"],
                    "passed": pass,
                })
            })
            .collect();
        let passed = if pass { results.len() } else { 0 };
        format!(
            "candidate debug line\n{}\n",
            json!({"results": results, "passed": passed, "failed": cases.len() - passed})
        )
    }
}

#[async_trait]
impl ExecutionClient for FakeSandbox {
    async fn execute(
        &self,
        request: ExecutionRequest,
    ) -> Result<ExecutionResponse, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let mode = self.mode.lock().unwrap().clone();
        match mode {
            SandboxMode::Pass => Ok(ExecutionResponse::with_stdout(Self::report(
                &request.stdin,
                true,
            ))),
            SandboxMode::Fail => Ok(ExecutionResponse::with_stdout(Self::report(
                &request.stdin,
                false,
            ))),
            SandboxMode::CompileError(message) => {
                Ok(ExecutionResponse::with_compile_output(message))
            }
            SandboxMode::Garbage => Ok(ExecutionResponse::with_stdout("Segmentation fault")),
            SandboxMode::Unreachable => {
                Err(ExecutionError::Connection("connection refused".to_string()))
            }
            SandboxMode::Timeout => Err(ExecutionError::Timeout),
        }
    }
}

pub fn points(value: u32) -> Score {
    Score::new(value).expect("valid points")
}

pub fn sum_question(points_value: u32) -> Question {
    Question::code(
        points(points_value),
        "add",
        vec![
            TestCase::new(vec![json!(1), json!(2)], json!(3)),
            TestCase::new(vec![json!(5), json!(5)], json!(10)),
            TestCase::new(vec![json!(-4), json!(4)], json!(0)).hidden(),
        ],
    )
    .expect("valid entry point")
}

/// The question plus the ids of its correct and wrong options.
pub fn capital_question(points_value: u32) -> (Question, OptionId, OptionId) {
    let correct = McqOption {
        id: OptionId::new(),
        text: "Paris".to_string(),
        is_correct: true,
    };
    let wrong = McqOption {
        id: OptionId::new(),
        text: "Lyon".to_string(),
        is_correct: false,
    };
    let (correct_id, wrong_id) = (correct.id, wrong.id);
    (
        Question::mcq(points(points_value), vec![correct, wrong]),
        correct_id,
        wrong_id,
    )
}

pub struct TestContest {
    pub engine: Arc<ContestEngine>,
    pub store: Arc<MemoryContestStore>,
    pub leaderboard: Arc<MemoryLeaderboard>,
    pub sandbox: FakeSandbox,
    pub contest_id: ContestId,
}

impl TestContest {
    pub fn new(mode: SandboxMode) -> Self {
        let store = Arc::new(MemoryContestStore::new());
        let leaderboard = Arc::new(MemoryLeaderboard::new());
        let sandbox = FakeSandbox::new(mode);
        let engine = Arc::new(ContestEngine::new(
            &FeedConfig::default(),
            store.clone(),
            leaderboard.clone(),
            Arc::new(sandbox.clone()),
        ));

        Self {
            engine,
            store,
            leaderboard,
            sandbox,
            contest_id: ContestId::new(),
        }
    }

    /// Registers and starts a participant with a display name.
    pub async fn join(&self, name: &str) -> UserId {
        let user_id = UserId::new();
        self.store.insert_user(user_id, name).await;
        self.store.register(self.contest_id, user_id).await;
        self.engine
            .start(self.contest_id, user_id)
            .await
            .expect("participant should start");
        user_id
    }
}
