//! The fixed set of assessment categories and their questions.
//!
//! The store accepts any category id; this catalog is what the app seeds it
//! with and what views use to resolve titles and question prompts.

use crate::model::{CategoryId, IdError, QuestionId};

/// A question as presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionDef {
    pub id: &'static str,
    pub prompt: &'static str,
}

/// One assessment dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub questions: &'static [QuestionDef],
}

impl CategoryDef {
    /// # Errors
    ///
    /// Returns `IdError` only if the static id is blank, which the catalog never is.
    pub fn category_id(&self) -> Result<CategoryId, IdError> {
        CategoryId::new(self.id)
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn question(&self, question_id: &QuestionId) -> Option<&'static QuestionDef> {
        self.questions
            .iter()
            .find(|q| q.id == question_id.as_str())
    }
}

pub const PREPARATION: CategoryDef = CategoryDef {
    id: "preparation",
    title: "Preparation & Planning",
    description: "Policies, procedures, and team structure",
    questions: &[
        QuestionDef {
            id: "prep-1",
            prompt: "How well-documented is your incident response policy and plan?",
        },
        QuestionDef {
            id: "prep-2",
            prompt: "How clearly are incident response roles and responsibilities defined?",
        },
        QuestionDef {
            id: "prep-3",
            prompt: "How regularly does your team train and run incident response exercises?",
        },
        QuestionDef {
            id: "prep-4",
            prompt: "How ready are the tools and resources your responders depend on?",
        },
        QuestionDef {
            id: "prep-5",
            prompt: "How complete is your inventory of critical assets and data?",
        },
    ],
};

pub const DETECTION: CategoryDef = CategoryDef {
    id: "detection",
    title: "Detection & Analysis",
    description: "Monitoring, alerting, and incident identification",
    questions: &[
        QuestionDef {
            id: "detect-1",
            prompt: "How comprehensive is your security monitoring and alerting system?",
        },
        QuestionDef {
            id: "detect-2",
            prompt: "How effective is your threat detection and analysis capability?",
        },
        QuestionDef {
            id: "detect-3",
            prompt: "How well do you correlate and prioritize security events?",
        },
        QuestionDef {
            id: "detect-4",
            prompt: "How mature is your incident classification and categorization process?",
        },
    ],
};

pub const CONTAINMENT: CategoryDef = CategoryDef {
    id: "containment",
    title: "Containment & Eradication",
    description: "Response procedures and threat elimination",
    questions: &[
        QuestionDef {
            id: "contain-1",
            prompt: "How quickly can you isolate and contain security incidents?",
        },
        QuestionDef {
            id: "contain-2",
            prompt: "How effective are your threat eradication procedures?",
        },
        QuestionDef {
            id: "contain-3",
            prompt: "How well do you preserve evidence during incident response?",
        },
        QuestionDef {
            id: "contain-4",
            prompt: "How coordinated is your response across different systems and teams?",
        },
        QuestionDef {
            id: "contain-5",
            prompt: "How do you validate that threats have been completely eliminated?",
        },
    ],
};

pub const RECOVERY: CategoryDef = CategoryDef {
    id: "recovery",
    title: "Recovery & Post-Incident",
    description: "System restoration and lessons learned",
    questions: &[
        QuestionDef {
            id: "recovery-1",
            prompt: "How comprehensive are your system recovery and restoration procedures?",
        },
        QuestionDef {
            id: "recovery-2",
            prompt: "How effective is your post-incident analysis and lessons learned process?",
        },
        QuestionDef {
            id: "recovery-3",
            prompt: "How well do you validate system integrity after recovery?",
        },
        QuestionDef {
            id: "recovery-4",
            prompt: "How do you monitor for recurring incidents and implement preventive measures?",
        },
    ],
};

pub const COMMUNICATION: CategoryDef = CategoryDef {
    id: "communication",
    title: "Communication & Coordination",
    description: "Internal and external communication protocols",
    questions: &[
        QuestionDef {
            id: "comm-1",
            prompt: "How well-defined are your internal communication protocols during incidents?",
        },
        QuestionDef {
            id: "comm-2",
            prompt: "How effective is your external stakeholder communication process?",
        },
        QuestionDef {
            id: "comm-3",
            prompt: "How comprehensive is your regulatory and legal notification process?",
        },
        QuestionDef {
            id: "comm-4",
            prompt: "How coordinated is your public relations and media response capability?",
        },
        QuestionDef {
            id: "comm-5",
            prompt: "How well do you manage customer and partner communications during incidents?",
        },
    ],
};

/// All categories in display order.
pub static CATEGORIES: [CategoryDef; 5] =
    [PREPARATION, DETECTION, CONTAINMENT, RECOVERY, COMMUNICATION];

#[must_use]
pub fn find_category(category_id: &CategoryId) -> Option<&'static CategoryDef> {
    CATEGORIES.iter().find(|c| c.id == category_id.as_str())
}

/// Resolve the category that owns a question.
#[must_use]
pub fn category_of(question_id: &QuestionId) -> Option<&'static CategoryDef> {
    CATEGORIES
        .iter()
        .find(|c| c.question(question_id).is_some())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn declared_question_counts() {
        let counts: Vec<u32> = CATEGORIES.iter().map(CategoryDef::total_questions).collect();
        assert_eq!(counts, vec![5, 4, 5, 4, 5]);
    }

    #[test]
    fn question_ids_are_unique_across_categories() {
        let mut seen = HashSet::new();
        for category in &CATEGORIES {
            for question in category.questions {
                assert!(seen.insert(question.id), "duplicate {}", question.id);
            }
        }
    }

    #[test]
    fn resolves_owning_category() {
        let question = QuestionId::new("contain-3").unwrap();
        assert_eq!(category_of(&question).map(|c| c.id), Some("containment"));
        assert!(category_of(&QuestionId::new("nope").unwrap()).is_none());
    }

    #[test]
    fn finds_category_by_id() {
        let id = CategoryId::new("recovery").unwrap();
        assert_eq!(find_category(&id).map(|c| c.title), Some("Recovery & Post-Incident"));
    }
}
