//! Versioned persisted form of the assessment state.
//!
//! The payload is JSON text stored under [`STORAGE_KEY`]:
//!
//! ```json
//! { "version": 1, "responses": [...], "categoryScores": [...] }
//! ```
//!
//! Payloads written before the version field existed decode as version 0 and
//! are migrated on load. Those may also arrive wrapped in a
//! `{ "state": {...}, "version": 0 }` envelope, which is unwrapped first.

use maturity_core::model::{AssessmentState, CategoryScore, QuestionResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::repository::StorageError;

/// Key the snapshot is stored under.
pub const STORAGE_KEY: &str = "assessment-storage";

/// Schema version written by this build.
pub const CURRENT_VERSION: u32 = 1;

/// Persisted shape of the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSnapshot {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub responses: Vec<QuestionResponse>,
    #[serde(default)]
    pub category_scores: Vec<CategoryScore>,
}

impl AssessmentSnapshot {
    #[must_use]
    pub fn from_state(state: &AssessmentState) -> Self {
        Self {
            version: CURRENT_VERSION,
            responses: state.responses().to_vec(),
            category_scores: state.category_scores().to_vec(),
        }
    }

    /// Convert back into domain state, keeping cached scores as stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::UnsupportedVersion` if the snapshot was not
    /// migrated to the current version, or `StorageError::Serialization` if
    /// the lists violate state invariants.
    pub fn into_state(self) -> Result<AssessmentState, StorageError> {
        if self.version != CURRENT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_VERSION,
            });
        }
        AssessmentState::from_parts(self.responses, self.category_scores)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Serialize to the stored text form.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if JSON encoding fails.
    pub fn encode(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Parse stored text and migrate it to [`CURRENT_VERSION`].
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed payloads and
    /// `StorageError::UnsupportedVersion` for payloads newer than this build.
    pub fn decode(text: &str) -> Result<Self, StorageError> {
        let value: Value =
            serde_json::from_str(text).map_err(|err| StorageError::Serialization(err.to_string()))?;
        let value = unwrap_envelope(value);
        let snapshot: Self = serde_json::from_value(value)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        migrate(snapshot)
    }
}

fn unwrap_envelope(value: Value) -> Value {
    let Value::Object(mut outer) = value else {
        return value;
    };
    match outer.remove("state") {
        Some(Value::Object(mut inner)) => {
            if !inner.contains_key("version") {
                let version = outer.remove("version").unwrap_or(Value::from(0));
                inner.insert("version".to_string(), version);
            }
            Value::Object(inner)
        }
        Some(other) => {
            outer.insert("state".to_string(), other);
            Value::Object(outer)
        }
        None => Value::Object(outer),
    }
}

fn migrate(mut snapshot: AssessmentSnapshot) -> Result<AssessmentSnapshot, StorageError> {
    if snapshot.version > CURRENT_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: snapshot.version,
            supported: CURRENT_VERSION,
        });
    }

    // v0 -> v1: same lists, version field added.
    if snapshot.version == 0 {
        snapshot.version = 1;
    }

    Ok(snapshot)
}
