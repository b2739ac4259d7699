use serde::Serialize;
use serde_json::Value;

use crate::domain::TestCase;

#[derive(Serialize)]
struct StdinDocument<'a> {
    cases: Vec<StdinCase<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StdinCase<'a> {
    id: String,
    input: &'a [Value],
    expected_output: &'a Value,
}

/// Whole-stdin JSON document every harness reads:
/// `{"cases":[{"id","input":[...],"expectedOutput":...}]}`.
pub fn stdin_document(test_cases: &[TestCase]) -> String {
    let document = StdinDocument {
        cases: test_cases
            .iter()
            .map(|case| StdinCase {
                id: case.id.to_string(),
                input: &case.input,
                expected_output: &case.expected_output,
            })
            .collect(),
    };

    serde_json::to_string(&document).unwrap_or_else(|_| String::from(r#"{"cases":[]}"#))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn document_lists_cases_in_order() {
        let cases = vec![
            TestCase::new(vec![json!([2, 7, 11, 15]), json!(9)], json!([0, 1])),
            TestCase::new(vec![json!("line\nbreak")], json!(null)).hidden(),
        ];

        let raw = stdin_document(&cases);
        let parsed: Value = serde_json::from_str(&raw).expect("document is valid json");

        assert_eq!(parsed["cases"].as_array().map(Vec::len), Some(2));
        assert_eq!(parsed["cases"][0]["id"], cases[0].id.to_string());
        assert_eq!(parsed["cases"][0]["input"], json!([[2, 7, 11, 15], 9]));
        assert_eq!(parsed["cases"][0]["expectedOutput"], json!([0, 1]));
        assert_eq!(parsed["cases"][1]["input"][0], "line\nbreak");
        assert!(parsed["cases"][1].get("hidden").is_none());
    }
}
