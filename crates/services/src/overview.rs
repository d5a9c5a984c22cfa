//! Presentation-agnostic views of assessment progress.
//!
//! These carry numbers and bands, not formatted strings; callers decide how
//! to render them.

use maturity_core::catalog::{self, CategoryDef};
use maturity_core::model::{
    AssessmentState, CategoryId, CategoryScore, IdError, MaturityBand, MaturityLevel, QuestionId,
};

/// One row of the assessment overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOverview {
    pub category_id: CategoryId,
    pub title: String,
    pub score: u8,
    pub band: MaturityBand,
    pub answered_questions: u32,
    pub total_questions: u32,
}

impl CategoryOverview {
    #[must_use]
    pub fn from_score(entry: &CategoryScore) -> Self {
        let title = catalog::find_category(&entry.category_id)
            .map_or_else(|| entry.category_id.to_string(), |def| def.title.to_string());
        Self {
            category_id: entry.category_id.clone(),
            title,
            score: entry.score,
            band: MaturityBand::from_score(entry.score),
            answered_questions: entry.answered_questions,
            total_questions: entry.total_questions,
        }
    }
}

/// Overall score plus one row per initialized category, in initialization order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentOverview {
    pub categories: Vec<CategoryOverview>,
    pub overall_score: u8,
    pub overall_band: MaturityBand,
    pub answered_questions: u32,
    pub total_questions: u32,
}

impl AssessmentOverview {
    #[must_use]
    pub fn from_state(state: &AssessmentState) -> Self {
        let categories: Vec<CategoryOverview> = state
            .category_scores()
            .iter()
            .map(CategoryOverview::from_score)
            .collect();
        let overall_score = state.overall_score();

        Self {
            answered_questions: categories.iter().map(|c| c.answered_questions).sum(),
            total_questions: categories.iter().map(|c| c.total_questions).sum(),
            overall_band: MaturityBand::from_score(overall_score),
            overall_score,
            categories,
        }
    }
}

/// A catalog question with the level currently selected for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub question_id: QuestionId,
    pub prompt: &'static str,
    pub selected_level: MaturityLevel,
    pub answered: bool,
}

/// Everything a category screen needs: its questions seeded from recorded
/// responses, and the category score.
///
/// Unanswered questions show the lowest level, matching the default score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDetail {
    pub category_id: CategoryId,
    pub title: &'static str,
    pub description: &'static str,
    pub questions: Vec<QuestionView>,
    pub score: u8,
    pub band: MaturityBand,
}

impl CategoryDetail {
    /// # Errors
    ///
    /// Returns `IdError` if a catalog id fails validation.
    pub fn from_state(state: &AssessmentState, def: &CategoryDef) -> Result<Self, IdError> {
        let category_id = def.category_id()?;

        let questions = def
            .questions
            .iter()
            .map(|question| {
                let question_id = QuestionId::new(question.id)?;
                let recorded = state
                    .response(&question_id)
                    .filter(|r| r.category_id == category_id)
                    .map(|r| r.selected_level);
                Ok(QuestionView {
                    question_id,
                    prompt: question.prompt,
                    selected_level: recorded.unwrap_or(MaturityLevel::LOWEST),
                    answered: recorded.is_some(),
                })
            })
            .collect::<Result<Vec<_>, IdError>>()?;

        let score = state.category_score(&category_id);
        Ok(Self {
            category_id,
            title: def.title,
            description: def.description,
            questions,
            score,
            band: MaturityBand::from_score(score),
        })
    }
}
