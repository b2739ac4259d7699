use serde::Deserialize;
use serde_json::Value;

use crate::domain::{CaseResult, ExecutionError, ExecutionResponse, RunResult};

pub const MALFORMED_OUTPUT: &str = "malformed output";
pub const NO_OUTPUT: &str = "no output";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarnessReport {
    results: Vec<HarnessCase>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarnessCase {
    id: String,
    #[serde(default)]
    input: Value,
    #[serde(default)]
    actual_output: Value,
    #[serde(default)]
    expected_output: Value,
    passed: bool,
    #[serde(default)]
    error: Option<String>,
}

impl From<HarnessCase> for CaseResult {
    fn from(case: HarnessCase) -> Self {
        Self {
            test_case_id: case.id,
            input: case.input,
            actual_output: case.actual_output,
            expected_output: case.expected_output,
            passed: case.passed,
            error: case.error,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|text| !text.is_empty())
}

/// How far a grading call got before producing its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The harness ran and reported every case.
    Evaluated,
    /// The candidate's code failed to compile or crashed the harness.
    CandidateFailed,
    /// The sandbox never produced a usable report. Scores must not move.
    ExecutionFailed,
}

#[derive(Debug, Clone)]
pub struct Graded {
    pub run: RunResult,
    pub outcome: Outcome,
}

impl Graded {
    pub fn execution_failed(run: RunResult) -> Self {
        Self {
            run,
            outcome: Outcome::ExecutionFailed,
        }
    }

    pub fn affects_score(&self) -> bool {
        self.outcome != Outcome::ExecutionFailed
    }
}

/// Normalizes raw sandbox output into a [`RunResult`].
///
/// Diagnostics on the compile or stderr stream fail every case. Otherwise
/// the last non-empty stdout line must be the harness report, and it must
/// cover exactly `test_case_count` cases.
pub fn aggregate(response: &ExecutionResponse, test_case_count: usize) -> RunResult {
    classify(response, test_case_count).run
}

/// Same as [`aggregate`], keeping track of which branch decided the result.
pub fn classify(response: &ExecutionResponse, test_case_count: usize) -> Graded {
    if let Some(diagnostic) = non_empty(&response.compile_output).or(non_empty(&response.stderr)) {
        return Graded {
            run: RunResult::failed_all(test_case_count, diagnostic),
            outcome: Outcome::CandidateFailed,
        };
    }

    let Some(stdout) = non_empty(&response.stdout) else {
        return Graded::execution_failed(RunResult::failed_all(test_case_count, NO_OUTPUT));
    };

    let report_line = stdout
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default();

    match serde_json::from_str::<HarnessReport>(report_line) {
        Ok(report) if report.results.len() == test_case_count => Graded {
            run: RunResult::from_cases(report.results.into_iter().map(CaseResult::from).collect()),
            outcome: Outcome::Evaluated,
        },
        _ => Graded::execution_failed(RunResult::failed_all(test_case_count, MALFORMED_OUTPUT)),
    }
}

/// A transport failure still yields a well-formed, all-failed result.
pub fn from_execution_error(error: &ExecutionError, test_case_count: usize) -> RunResult {
    RunResult::failed_all(test_case_count, error.diagnostic())
}
