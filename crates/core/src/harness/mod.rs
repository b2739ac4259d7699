//! Harness Generator: wraps candidate source in a per-language driver that
//! runs the entry point against every test case read from stdin and prints a
//! single JSON result line.

mod cpp;
mod java;
mod javascript;
mod payload;
mod python;
mod shape;

use thiserror::Error;

use crate::domain::{Language, TestCase, is_identifier};

pub use payload::stdin_document;
pub use shape::{Location, ShapeError, Signature, ValueShape};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HarnessError {
    #[error("language not supported")]
    UnsupportedLanguage(i32),
    #[error("entry point must be a plain identifier, got '{0}'")]
    InvalidEntryPoint(String),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// How a language's driver is produced. Statically-typed targets carry the
/// signature inferred from the test cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSpec {
    JavaScript,
    Python,
    Cpp(Signature),
    Java(Signature),
}

impl TemplateSpec {
    pub fn for_language(language: Language, test_cases: &[TestCase]) -> Result<Self, HarnessError> {
        Ok(match language {
            Language::JavaScript => TemplateSpec::JavaScript,
            Language::Python => TemplateSpec::Python,
            Language::Cpp => TemplateSpec::Cpp(Signature::infer(test_cases)?),
            Language::Java => TemplateSpec::Java(Signature::infer(test_cases)?),
        })
    }

    pub fn render(&self, candidate_source: &str, entry_point: &str) -> String {
        match self {
            TemplateSpec::JavaScript => javascript::render(candidate_source, entry_point),
            TemplateSpec::Python => python::render(candidate_source, entry_point),
            TemplateSpec::Cpp(signature) => cpp::render(candidate_source, entry_point, signature),
            TemplateSpec::Java(signature) => java::render(candidate_source, entry_point, signature),
        }
    }
}

/// Builds the self-contained program for `language_id`. The test data itself
/// travels on stdin, see [`stdin_document`].
pub fn generate_harness(
    language_id: i32,
    candidate_source: &str,
    entry_point: &str,
    test_cases: &[TestCase],
) -> Result<String, HarnessError> {
    let language =
        Language::from_id(language_id).ok_or(HarnessError::UnsupportedLanguage(language_id))?;
    if !is_identifier(entry_point) {
        return Err(HarnessError::InvalidEntryPoint(entry_point.to_string()));
    }

    let spec = TemplateSpec::for_language(language, test_cases)?;
    Ok(spec.render(candidate_source, entry_point))
}
