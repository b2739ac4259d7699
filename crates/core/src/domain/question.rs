use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DomainError, OptionId, QuestionId, Score, TestCaseId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionKind {
    Mcq,
    Code,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqOption {
    pub id: OptionId,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: TestCaseId,
    /// Positional arguments for the entry point.
    pub input: Vec<Value>,
    pub expected_output: Value,
    #[serde(default)]
    pub hidden: bool,
}

impl TestCase {
    pub fn new(input: Vec<Value>, expected_output: Value) -> Self {
        Self {
            id: TestCaseId::new(),
            input,
            expected_output,
            hidden: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionBody {
    Mcq {
        options: Vec<McqOption>,
    },
    #[serde(rename_all = "camelCase")]
    Code {
        entry_point: String,
        test_cases: Vec<TestCase>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub points: Score,
    #[serde(flatten)]
    pub body: QuestionBody,
}

impl Question {
    pub fn mcq(points: Score, options: Vec<McqOption>) -> Self {
        Self {
            id: QuestionId::new(),
            points,
            body: QuestionBody::Mcq { options },
        }
    }

    pub fn code(
        points: Score,
        entry_point: impl Into<String>,
        test_cases: Vec<TestCase>,
    ) -> Result<Self, DomainError> {
        let entry_point = entry_point.into();
        if !is_identifier(&entry_point) {
            return Err(DomainError::InvalidEntryPoint(entry_point));
        }

        Ok(Self {
            id: QuestionId::new(),
            points,
            body: QuestionBody::Code {
                entry_point,
                test_cases,
            },
        })
    }

    pub fn kind(&self) -> QuestionKind {
        match self.body {
            QuestionBody::Mcq { .. } => QuestionKind::Mcq,
            QuestionBody::Code { .. } => QuestionKind::Code,
        }
    }

    pub fn options(&self) -> &[McqOption] {
        match &self.body {
            QuestionBody::Mcq { options } => options,
            QuestionBody::Code { .. } => &[],
        }
    }

    pub fn entry_point(&self) -> Option<&str> {
        match &self.body {
            QuestionBody::Code { entry_point, .. } => Some(entry_point),
            QuestionBody::Mcq { .. } => None,
        }
    }

    /// Every test case, hidden ones included.
    pub fn test_cases(&self) -> &[TestCase] {
        match &self.body {
            QuestionBody::Code { test_cases, .. } => test_cases,
            QuestionBody::Mcq { .. } => &[],
        }
    }

    pub fn visible_test_cases(&self) -> Vec<TestCase> {
        self.test_cases()
            .iter()
            .filter(|case| !case.hidden)
            .cloned()
            .collect()
    }

    pub fn option(&self, option_id: OptionId) -> Option<&McqOption> {
        self.options().iter().find(|option| option.id == option_id)
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`. Entry points are spliced into generated source.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn points(value: u32) -> Score {
        Score::new(value).expect("valid points")
    }

    #[test]
    fn code_question_rejects_non_identifier_entry_point() {
        let err = Question::code(points(10), "two sum()", vec![]).expect_err("invalid name");
        assert_eq!(err, DomainError::InvalidEntryPoint("two sum()".to_string()));
    }

    #[test]
    fn visible_test_cases_skip_hidden_ones() {
        let question = Question::code(
            points(10),
            "add",
            vec![
                TestCase::new(vec![json!(1), json!(2)], json!(3)),
                TestCase::new(vec![json!(5), json!(5)], json!(10)).hidden(),
            ],
        )
        .expect("valid question");

        assert_eq!(question.test_cases().len(), 2);
        assert_eq!(question.visible_test_cases().len(), 1);
        assert_eq!(question.kind(), QuestionKind::Code);
        assert_eq!(question.entry_point(), Some("add"));
    }

    #[test]
    fn mcq_question_serializes_with_kind_tag() {
        let question = Question::mcq(
            points(5),
            vec![McqOption {
                id: OptionId::new(),
                text: "4".to_string(),
                is_correct: true,
            }],
        );

        let value = serde_json::to_value(&question).expect("serialize");
        assert_eq!(value["kind"], "MCQ");
        assert_eq!(value["points"], 5);
        assert_eq!(value["options"][0]["isCorrect"], true);
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("twoSum"));
        assert!(is_identifier("_helper2"));
        assert!(!is_identifier("2sum"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }
}
