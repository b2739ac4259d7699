use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::domain::TestCase;

/// Static type of a JSON literal as seen by a statically-typed harness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueShape {
    Int,
    Long,
    Float,
    Bool,
    Str,
    List(Box<ValueShape>),
    /// Element type of an empty list; unifies with anything.
    Unknown,
}

impl ValueShape {
    fn of(value: &Value) -> Result<Self, &'static str> {
        match value {
            Value::Null => Err("null"),
            Value::Object(_) => Err("an object"),
            Value::Bool(_) => Ok(ValueShape::Bool),
            Value::String(_) => Ok(ValueShape::Str),
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    if i32::try_from(int).is_ok() {
                        Ok(ValueShape::Int)
                    } else {
                        Ok(ValueShape::Long)
                    }
                } else if number.is_u64() {
                    Err("an integer outside the 64-bit signed range")
                } else {
                    Ok(ValueShape::Float)
                }
            }
            Value::Array(items) => {
                let mut element = ValueShape::Unknown;
                for item in items {
                    let shape = ValueShape::of(item)?;
                    element = element.unify(&shape).ok_or("a list with mixed element types")?;
                }
                Ok(ValueShape::List(Box::new(element)))
            }
        }
    }

    fn unify(&self, other: &ValueShape) -> Option<ValueShape> {
        use ValueShape::*;

        match (self, other) {
            (Unknown, shape) | (shape, Unknown) => Some(shape.clone()),
            (Int, Long) | (Long, Int) => Some(Long),
            (Int | Long, Float) | (Float, Int | Long) => Some(Float),
            (List(a), List(b)) => a.unify(b).map(|element| List(Box::new(element))),
            (a, b) if a == b => Some(a.clone()),
            _ => None,
        }
    }

    /// Replaces unresolved element types with `Int`.
    fn resolved(self) -> ValueShape {
        match self {
            ValueShape::Unknown => ValueShape::Int,
            ValueShape::List(element) => ValueShape::List(Box::new(element.resolved())),
            shape => shape,
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueShape::Int => f.write_str("int"),
            ValueShape::Long => f.write_str("long"),
            ValueShape::Float => f.write_str("float"),
            ValueShape::Bool => f.write_str("bool"),
            ValueShape::Str => f.write_str("string"),
            ValueShape::List(element) => write!(f, "list<{element}>"),
            ValueShape::Unknown => f.write_str("unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Argument(usize),
    ExpectedOutput,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Argument(index) => write!(f, "argument {}", index + 1),
            Location::ExpectedOutput => f.write_str("expected output"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("no test cases to infer a signature from")]
    NoTestCases,
    #[error("test case {case}: expected {expected} arguments, found {found}")]
    ArityMismatch {
        case: String,
        expected: usize,
        found: usize,
    },
    #[error(
        "test case {case}: {location} has shape {found}, incompatible with {expected} inferred from earlier test cases"
    )]
    Incompatible {
        case: String,
        location: Location,
        expected: ValueShape,
        found: ValueShape,
    },
    #[error("test case {case}: {location} is {kind}, which a statically-typed harness cannot represent")]
    Unrepresentable {
        case: String,
        location: Location,
        kind: &'static str,
    },
}

/// Parameter and return types for a statically-typed entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<ValueShape>,
    pub returns: ValueShape,
}

impl Signature {
    /// Infers types from the first test case and checks every other case
    /// against them.
    pub fn infer(test_cases: &[TestCase]) -> Result<Self, ShapeError> {
        let (first, rest) = test_cases.split_first().ok_or(ShapeError::NoTestCases)?;

        let mut params = first
            .input
            .iter()
            .enumerate()
            .map(|(index, value)| shape_at(first, Location::Argument(index), value))
            .collect::<Result<Vec<_>, _>>()?;
        let mut returns = shape_at(first, Location::ExpectedOutput, &first.expected_output)?;

        for case in rest {
            if case.input.len() != params.len() {
                return Err(ShapeError::ArityMismatch {
                    case: case.id.to_string(),
                    expected: params.len(),
                    found: case.input.len(),
                });
            }

            for (index, value) in case.input.iter().enumerate() {
                let location = Location::Argument(index);
                let shape = shape_at(case, location, value)?;
                params[index] = unify_at(case, location, &params[index], &shape)?;
            }

            let shape = shape_at(case, Location::ExpectedOutput, &case.expected_output)?;
            returns = unify_at(case, Location::ExpectedOutput, &returns, &shape)?;
        }

        Ok(Self {
            params: params.into_iter().map(ValueShape::resolved).collect(),
            returns: returns.resolved(),
        })
    }
}

fn shape_at(case: &TestCase, location: Location, value: &Value) -> Result<ValueShape, ShapeError> {
    ValueShape::of(value).map_err(|kind| ShapeError::Unrepresentable {
        case: case.id.to_string(),
        location,
        kind,
    })
}

fn unify_at(
    case: &TestCase,
    location: Location,
    expected: &ValueShape,
    found: &ValueShape,
) -> Result<ValueShape, ShapeError> {
    expected
        .unify(found)
        .ok_or_else(|| ShapeError::Incompatible {
            case: case.id.to_string(),
            location,
            expected: expected.clone(),
            found: found.clone(),
        })
}
