use serde::{Deserialize, Serialize};

use crate::model::{CategoryId, MaturityLevel, QuestionId};

/// One recorded answer: the level chosen for a question within its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub question_id: QuestionId,
    pub category_id: CategoryId,
    pub selected_level: MaturityLevel,
}

impl QuestionResponse {
    #[must_use]
    pub fn new(
        question_id: QuestionId,
        category_id: CategoryId,
        selected_level: MaturityLevel,
    ) -> Self {
        Self {
            question_id,
            category_id,
            selected_level,
        }
    }
}
