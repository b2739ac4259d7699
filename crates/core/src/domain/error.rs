use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid score: {0}. score must be in [0, 1000000]")]
    InvalidScore(i64),
    #[error("entry point must be a plain identifier, got '{0}'")]
    InvalidEntryPoint(String),
}
