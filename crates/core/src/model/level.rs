use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur when constructing a maturity level.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("maturity level must be between 1 and 5, got {0}")]
    OutOfRange(i64),
}

//
// ─── MATURITY LEVEL ───────────────────────────────────────────────────────────
//

/// Capability-maturity rung selected for a single question.
///
/// Levels run from 1 (`Initial/Ad Hoc`) to 5 (`Optimized`). The numeric value
/// is what feeds the percentage calculation; names and descriptions mirror the
/// reference table shown next to every question.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MaturityLevel(u8);

impl MaturityLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// The lowest rung; unanswered questions are assumed to sit here.
    pub const LOWEST: MaturityLevel = MaturityLevel(Self::MIN);

    /// Validates a raw level value.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::OutOfRange` if the value is not in `1..=5`.
    pub fn new(value: i64) -> Result<Self, LevelError> {
        match u8::try_from(value) {
            Ok(level) if (Self::MIN..=Self::MAX).contains(&level) => Ok(Self(level)),
            _ => Err(LevelError::OutOfRange(value)),
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// All levels, lowest first.
    pub fn all() -> impl Iterator<Item = MaturityLevel> {
        (Self::MIN..=Self::MAX).map(MaturityLevel)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self.0 {
            1 => "Initial/Ad Hoc",
            2 => "Repeatable but Intuitive",
            3 => "Defined Process",
            4 => "Managed and Measurable",
            _ => "Optimized",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self.0 {
            1 => "Processes are unpredictable, poorly controlled, and reactive",
            2 => "Processes follow a regular pattern but are not documented",
            3 => "Processes are documented and standardized",
            4 => "Processes are monitored and measured",
            _ => "Focus on continuous improvement and optimization",
        }
    }
}

impl TryFrom<i64> for MaturityLevel {
    type Error = LevelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MaturityLevel> for u8 {
    fn from(level: MaturityLevel) -> Self {
        level.0
    }
}

impl fmt::Debug for MaturityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MaturityLevel({})", self.0)
    }
}

impl fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_levels_one_through_five() {
        let values: Vec<u8> = MaturityLevel::all().map(MaturityLevel::value).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
        assert_eq!(MaturityLevel::new(3).unwrap().value(), 3);
    }

    #[test]
    fn rejects_out_of_range_levels() {
        assert_eq!(MaturityLevel::new(0), Err(LevelError::OutOfRange(0)));
        assert_eq!(MaturityLevel::new(6), Err(LevelError::OutOfRange(6)));
        assert_eq!(MaturityLevel::new(-1), Err(LevelError::OutOfRange(-1)));
        assert_eq!(MaturityLevel::new(261), Err(LevelError::OutOfRange(261)));
    }

    #[test]
    fn names_follow_reference_table() {
        assert_eq!(MaturityLevel::LOWEST.name(), "Initial/Ad Hoc");
        assert_eq!(MaturityLevel::new(5).unwrap().name(), "Optimized");
    }

    #[test]
    fn deserializing_rejects_invalid_levels() {
        let ok: MaturityLevel = serde_json::from_str("4").unwrap();
        assert_eq!(ok.value(), 4);
        assert!(serde_json::from_str::<MaturityLevel>("9").is_err());
    }
}
