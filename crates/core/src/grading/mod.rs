mod aggregate;

pub use aggregate::{
    Graded, MALFORMED_OUTPUT, NO_OUTPUT, Outcome, aggregate, classify, from_execution_error,
};
