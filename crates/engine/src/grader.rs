use std::sync::Arc;

use arena_core::domain::{ExecutionClient, ExecutionRequest, Language, Question, RunResult};
use arena_core::grading::{self, Graded};
use arena_core::harness::{self, HarnessError};
use tracing::{debug, instrument, warn};

use crate::error::{EngineError, Result};

/// Which test cases a grading call runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestScope {
    /// Practice runs only see the visible cases.
    Visible,
    /// Scored submissions include hidden cases.
    All,
}

/// Glues harness generation, the execution client and the aggregator.
#[derive(Clone)]
pub struct Grader {
    client: Arc<dyn ExecutionClient>,
}

impl Grader {
    pub fn new(client: Arc<dyn ExecutionClient>) -> Self {
        Self { client }
    }

    /// Grades `source` against `question`. Only a question that cannot be
    /// graded at all is an error; every runtime failure becomes a `RunResult`.
    #[instrument(skip(self, question, source), fields(question_id = %question.id))]
    pub async fn grade(
        &self,
        question: &Question,
        source: &str,
        language_id: i32,
        scope: TestScope,
    ) -> Result<Graded> {
        let Some(entry_point) = question.entry_point() else {
            return Err(EngineError::validation("question is not a coding question"));
        };

        let test_cases = match scope {
            TestScope::Visible => question.visible_test_cases(),
            TestScope::All => question.test_cases().to_vec(),
        };
        if test_cases.is_empty() {
            return Err(EngineError::validation(match scope {
                TestScope::Visible => "question has no visible test cases",
                TestScope::All => "question has no test cases",
            }));
        }
        let total = test_cases.len();

        let Some(language) = Language::from_id(language_id) else {
            debug!(language_id, "rejecting unsupported language");
            return Ok(Graded::execution_failed(RunResult::failed_all(
                total,
                HarnessError::UnsupportedLanguage(language_id).to_string(),
            )));
        };

        let program = match harness::generate_harness(language_id, source, entry_point, &test_cases)
        {
            Ok(program) => program,
            Err(err) => {
                warn!(error = %err, "test cases cannot drive a harness");
                return Ok(Graded::execution_failed(RunResult::failed_all(
                    total,
                    err.to_string(),
                )));
            }
        };

        let request = ExecutionRequest {
            source_code: program,
            language,
            stdin: harness::stdin_document(&test_cases),
        };

        match self.client.execute(request).await {
            Ok(response) => {
                let graded = grading::classify(&response, total);
                debug!(
                    passed = graded.run.passed,
                    total = graded.run.total,
                    outcome = ?graded.outcome,
                    "grading finished"
                );
                Ok(graded)
            }
            Err(err) => {
                warn!(error = %err, "execution service call failed");
                Ok(Graded::execution_failed(grading::from_execution_error(
                    &err, total,
                )))
            }
        }
    }
}
