use std::iter::Sum;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Non-negative point total. Used both for a question's point value and for
/// a submission's aggregate score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u32);

impl Score {
    pub const MIN: u32 = 0;
    pub const MAX: u32 = 1_000_000;
    pub const ZERO: Score = Score(0);

    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidScore(i64::from(value)))
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Sum capped at [`Score::MAX`].
    pub fn saturating_add(self, other: Score) -> Score {
        Score(self.0.saturating_add(other.0).min(Self::MAX))
    }

    pub fn saturating_sub(self, other: Score) -> Score {
        Score(self.0.saturating_sub(other.0))
    }

    /// Converts a ranked-store score, which is a float on the wire.
    pub fn from_rank(value: f64) -> Score {
        if value.is_nan() || value <= 0.0 {
            return Score::ZERO;
        }
        Score((value.round() as u64).min(u64::from(Self::MAX)) as u32)
    }

    pub fn as_rank(self) -> f64 {
        f64::from(self.0)
    }
}

impl TryFrom<i64> for Score {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map_err(|_| DomainError::InvalidScore(value))
            .and_then(Self::new)
    }
}

impl TryFrom<u32> for Score {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for i64 {
    fn from(value: Score) -> Self {
        i64::from(value.value())
    }
}

impl From<Score> for u32 {
    fn from(value: Score) -> Self {
        value.value()
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Score>>(iter: I) -> Self {
        iter.fold(Score::ZERO, Score::saturating_add)
    }
}
