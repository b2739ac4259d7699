pub mod domain;
pub mod grading;
pub mod harness;
pub mod scoring;
