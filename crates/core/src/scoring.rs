//! Percentage scoring policy.
//!
//! A category's score is the mean selected level expressed as a percentage of
//! the top level. Unanswered categories fall back to [`DEFAULT_SCORE`], the
//! percentage of the lowest level, so a fresh assessment reads as "assumed
//! lowest maturity" rather than blank.

use crate::model::{CategoryId, CategoryScore, MaturityLevel, QuestionResponse};

/// Score reported for a category with no responses (level 1 of 5).
pub const DEFAULT_SCORE: u8 = 20;

/// Integer division rounded half away from zero.
fn div_round(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

fn clamp_percent(value: u64) -> u8 {
    u8::try_from(value.min(100)).unwrap_or(100)
}

/// Score for a set of selected levels.
///
/// Returns [`DEFAULT_SCORE`] for an empty set, otherwise
/// `round(100 * sum / (5 * count))`.
#[must_use]
pub fn score_levels(levels: impl IntoIterator<Item = MaturityLevel>) -> u8 {
    let (sum, count) = levels
        .into_iter()
        .fold((0_u64, 0_u64), |(sum, count), level| {
            (sum + u64::from(level.value()), count + 1)
        });

    if count == 0 {
        return DEFAULT_SCORE;
    }

    let max = u64::from(MaturityLevel::MAX) * count;
    clamp_percent(div_round(100 * sum, max))
}

/// Score for one category over every response currently tagged with it.
#[must_use]
pub fn category_score(responses: &[QuestionResponse], category_id: &CategoryId) -> u8 {
    score_levels(
        responses
            .iter()
            .filter(|r| &r.category_id == category_id)
            .map(|r| r.selected_level),
    )
}

/// Unweighted mean of category scores, rounded.
///
/// Every category counts once regardless of how many questions it declares
/// or has answered. Returns [`DEFAULT_SCORE`] when there are no categories.
#[must_use]
pub fn overall_score(scores: &[CategoryScore]) -> u8 {
    if scores.is_empty() {
        return DEFAULT_SCORE;
    }

    let total: u64 = scores.iter().map(|cs| u64::from(cs.score)).sum();
    clamp_percent(div_round(total, scores.len() as u64))
}
