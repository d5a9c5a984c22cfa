use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when validating identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdError {
    #[error("{kind} cannot be empty")]
    Empty { kind: &'static str },
}

fn normalize(kind: &'static str, value: String) -> Result<String, IdError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty { kind });
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Identifier of a single assessment question, unique across all categories.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId(String);

impl QuestionId {
    /// Create a validated question id (trimmed, non-empty).
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        normalize("question id", value.into()).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of an assessment category.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryId(String);

impl CategoryId {
    /// Create a validated category id (trimmed, non-empty).
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        normalize("category id", value.into()).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CategoryId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

// ─── Conversions ───────────────────────────────────────────────────────────────

impl FromStr for QuestionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for CategoryId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for QuestionId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for CategoryId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QuestionId> for String {
    fn from(id: QuestionId) -> Self {
        id.0
    }
}

impl From<CategoryId> for String {
    fn from(id: CategoryId) -> Self {
        id.0
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_id_trims_whitespace() {
        let id = QuestionId::new("  detect-1 ").unwrap();
        assert_eq!(id.as_str(), "detect-1");
        assert_eq!(id.to_string(), "detect-1");
    }

    #[test]
    fn test_blank_ids_are_rejected() {
        assert_eq!(
            QuestionId::new("   "),
            Err(IdError::Empty { kind: "question id" })
        );
        assert_eq!(
            "".parse::<CategoryId>(),
            Err(IdError::Empty { kind: "category id" })
        );
    }

    #[test]
    fn test_category_id_from_str() {
        let id: CategoryId = "recovery".parse().unwrap();
        assert_eq!(id, CategoryId::new("recovery").unwrap());
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = CategoryId::new("detection").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"detection\"");

        let blank: Result<QuestionId, _> = serde_json::from_str("\" \"");
        assert!(blank.is_err());
    }
}
