use serde::{Deserialize, Serialize};

use crate::model::CategoryId;
use crate::scoring::DEFAULT_SCORE;

/// Cached score summary for one category.
///
/// `total_questions` is whatever the caller declared at initialization; it is
/// reported alongside the score but never feeds the percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category_id: CategoryId,
    pub score: u8,
    pub total_questions: u32,
    pub answered_questions: u32,
}

impl CategoryScore {
    /// A freshly initialized category: default score, nothing answered.
    #[must_use]
    pub fn initial(category_id: CategoryId, total_questions: u32) -> Self {
        Self {
            category_id,
            score: DEFAULT_SCORE,
            total_questions,
            answered_questions: 0,
        }
    }
}
