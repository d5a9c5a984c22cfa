use std::collections::HashSet;

use thiserror::Error;

use crate::model::{CategoryId, CategoryScore, MaturityLevel, QuestionId, QuestionResponse};
use crate::scoring;

/// Errors raised by assessment state transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error("question {question_id} is recorded under {recorded}, not {requested}")]
    CategoryMismatch {
        question_id: QuestionId,
        recorded: CategoryId,
        requested: CategoryId,
    },
    #[error("duplicate response for question {0}")]
    DuplicateQuestion(QuestionId),
    #[error("duplicate score entry for category {0}")]
    DuplicateCategory(CategoryId),
    #[error("score {score} for category {category_id} exceeds 100")]
    ScoreOutOfRange { category_id: CategoryId, score: u8 },
}

/// What an upsert did to the assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseUpdate {
    Inserted,
    Replaced { previous: MaturityLevel },
    /// Same level as recorded, but the cached category entry was stale and
    /// has been recomputed.
    Rescored,
    Unchanged,
}

impl ResponseUpdate {
    #[must_use]
    pub fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// All responses and cached category scores of one assessment.
///
/// Responses keep insertion order and are replaced in place on overwrite.
/// Category scores keep initialization order. Both lists are unique by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssessmentState {
    responses: Vec<QuestionResponse>,
    category_scores: Vec<CategoryScore>,
}

impl AssessmentState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild state from persisted lists, keeping cached scores as stored.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError` if a question or category appears twice, or a
    /// cached score is above 100.
    pub fn from_parts(
        responses: Vec<QuestionResponse>,
        category_scores: Vec<CategoryScore>,
    ) -> Result<Self, AssessmentError> {
        let mut questions = HashSet::with_capacity(responses.len());
        for response in &responses {
            if !questions.insert(&response.question_id) {
                return Err(AssessmentError::DuplicateQuestion(
                    response.question_id.clone(),
                ));
            }
        }

        let mut categories = HashSet::with_capacity(category_scores.len());
        for entry in &category_scores {
            if !categories.insert(&entry.category_id) {
                return Err(AssessmentError::DuplicateCategory(entry.category_id.clone()));
            }
            if entry.score > 100 {
                return Err(AssessmentError::ScoreOutOfRange {
                    category_id: entry.category_id.clone(),
                    score: entry.score,
                });
            }
        }

        Ok(Self {
            responses,
            category_scores,
        })
    }

    #[must_use]
    pub fn responses(&self) -> &[QuestionResponse] {
        &self.responses
    }

    #[must_use]
    pub fn category_scores(&self) -> &[CategoryScore] {
        &self.category_scores
    }

    #[must_use]
    pub fn response(&self, question_id: &QuestionId) -> Option<&QuestionResponse> {
        self.responses
            .iter()
            .find(|r| &r.question_id == question_id)
    }

    pub fn responses_for<'a>(
        &'a self,
        category_id: &'a CategoryId,
    ) -> impl Iterator<Item = &'a QuestionResponse> + 'a {
        self.responses
            .iter()
            .filter(move |r| &r.category_id == category_id)
    }

    #[must_use]
    pub fn category(&self, category_id: &CategoryId) -> Option<&CategoryScore> {
        self.category_scores
            .iter()
            .find(|cs| &cs.category_id == category_id)
    }

    /// Cached score of a category, or the default for one never initialized.
    #[must_use]
    pub fn category_score(&self, category_id: &CategoryId) -> u8 {
        self.category(category_id)
            .map_or(scoring::DEFAULT_SCORE, |cs| cs.score)
    }

    #[must_use]
    pub fn overall_score(&self) -> u8 {
        scoring::overall_score(&self.category_scores)
    }

    /// Register a category with the default score.
    ///
    /// Returns `false` and leaves the entry untouched if the category already
    /// exists, whatever `total_questions` is passed this time.
    pub fn initialize_category(&mut self, category_id: CategoryId, total_questions: u32) -> bool {
        if self.category(&category_id).is_some() {
            return false;
        }
        self.category_scores
            .push(CategoryScore::initial(category_id, total_questions));
        true
    }

    /// Insert or overwrite the response for `question_id`, then refresh the
    /// cached score of `category_id`.
    ///
    /// When the category was never initialized the response is still kept but
    /// no score entry is created for it.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::CategoryMismatch` if the question already has a
    /// response recorded under a different category. State is left unchanged.
    pub fn update_response(
        &mut self,
        question_id: QuestionId,
        category_id: CategoryId,
        selected_level: MaturityLevel,
    ) -> Result<ResponseUpdate, AssessmentError> {
        let position = self
            .responses
            .iter()
            .position(|r| r.question_id == question_id);

        let update = match position {
            Some(index) => {
                let existing = &mut self.responses[index];
                if existing.category_id != category_id {
                    return Err(AssessmentError::CategoryMismatch {
                        question_id,
                        recorded: existing.category_id.clone(),
                        requested: category_id,
                    });
                }
                if existing.selected_level == selected_level {
                    ResponseUpdate::Unchanged
                } else {
                    let previous = existing.selected_level;
                    existing.selected_level = selected_level;
                    ResponseUpdate::Replaced { previous }
                }
            }
            None => {
                self.responses.push(QuestionResponse::new(
                    question_id,
                    category_id.clone(),
                    selected_level,
                ));
                ResponseUpdate::Inserted
            }
        };

        let rescored = self.refresh_category(&category_id);
        if update == ResponseUpdate::Unchanged && rescored {
            return Ok(ResponseUpdate::Rescored);
        }
        Ok(update)
    }

    /// Recompute the cached entry of `category_id`. Returns whether it changed.
    fn refresh_category(&mut self, category_id: &CategoryId) -> bool {
        let score = scoring::category_score(&self.responses, category_id);
        let answered = self.responses_for(category_id).count();
        let answered = u32::try_from(answered).unwrap_or(u32::MAX);

        if let Some(entry) = self
            .category_scores
            .iter_mut()
            .find(|cs| &cs.category_id == category_id)
        {
            let changed = entry.score != score || entry.answered_questions != answered;
            entry.score = score;
            entry.answered_questions = answered;
            return changed;
        }
        false
    }
}
