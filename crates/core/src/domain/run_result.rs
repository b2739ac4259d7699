use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseResult {
    pub test_case_id: String,
    pub input: Value,
    pub actual_output: Value,
    pub expected_output: Value,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Normalized outcome of one grading call, independent of the harness language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
    pub cases: Vec<CaseResult>,
    pub compilation_error: Option<String>,
}

impl RunResult {
    pub fn from_cases(cases: Vec<CaseResult>) -> Self {
        let total = cases.len();
        let passed = cases.iter().filter(|case| case.passed).count();
        Self {
            passed,
            failed: total - passed,
            total,
            cases,
            compilation_error: None,
        }
    }

    /// Every case counted as failed, no per-case detail.
    pub fn failed_all(total: usize, compilation_error: impl Into<String>) -> Self {
        Self {
            passed: 0,
            failed: total,
            total,
            cases: Vec::new(),
            compilation_error: Some(compilation_error.into()),
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.total > 0 && self.passed == self.total
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn case(passed: bool) -> CaseResult {
        CaseResult {
            test_case_id: "t".to_string(),
            input: json!([1]),
            actual_output: json!(1),
            expected_output: json!(1),
            passed,
            error: None,
        }
    }

    #[test]
    fn counts_are_derived_from_cases() {
        let result = RunResult::from_cases(vec![case(true), case(false), case(true)]);

        assert_eq!((result.passed, result.failed, result.total), (2, 1, 3));
        assert!(!result.is_all_passed());
    }

    #[test]
    fn zero_cases_is_never_all_passed() {
        assert!(!RunResult::from_cases(Vec::new()).is_all_passed());
    }

    #[test]
    fn failed_all_keeps_total() {
        let result = RunResult::failed_all(2, "boom");

        assert_eq!((result.passed, result.failed, result.total), (0, 2, 2));
        assert_eq!(result.compilation_error.as_deref(), Some("boom"));
        assert!(result.cases.is_empty());
    }
}
