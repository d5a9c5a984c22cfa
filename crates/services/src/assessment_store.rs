use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use maturity_core::model::{
    AssessmentState, CategoryId, CategoryScore, MaturityLevel, QuestionId, QuestionResponse,
    ResponseUpdate,
};
use storage::repository::AssessmentRepository;
use storage::snapshot::AssessmentSnapshot;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::overview::AssessmentOverview;

/// Outcome of the most recent background save.
#[derive(Debug, Clone, Default)]
struct PersistStatus {
    revision: u64,
    error: Option<String>,
}

/// Single source of truth for assessment progress.
///
/// Writes apply synchronously: once a call returns, every reader and
/// subscriber sees the new state. Persistence is handed to a background task
/// that saves the latest state after each change, so a write returns before it
/// is durable. Call [`AssessmentStore::flush`] to wait for durability.
///
/// Build one per application and share it behind an `Arc`.
pub struct AssessmentStore {
    state: watch::Sender<AssessmentState>,
    revision: Arc<AtomicU64>,
    persisted: watch::Receiver<PersistStatus>,
}

impl AssessmentStore {
    /// Restore the store from `repo`, or start empty if nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the stored snapshot cannot be read or
    /// decoded. A corrupt snapshot is never silently replaced.
    pub async fn open(repo: Arc<dyn AssessmentRepository>) -> Result<Self, StoreError> {
        let state = match repo.load_snapshot().await? {
            Some(snapshot) => snapshot.into_state()?,
            None => AssessmentState::new(),
        };
        debug!(
            responses = state.responses().len(),
            categories = state.category_scores().len(),
            "opened assessment store"
        );
        Ok(Self::from_state(repo, state))
    }

    /// Wrap an existing state and start persisting changes to `repo`.
    ///
    /// Persistence needs a Tokio runtime; outside one the store still works
    /// in memory and [`AssessmentStore::flush`] reports
    /// `StoreError::PersisterStopped` once there are unsaved changes.
    #[must_use]
    pub fn from_state(repo: Arc<dyn AssessmentRepository>, state: AssessmentState) -> Self {
        let (state_tx, state_rx) = watch::channel(state);
        let (status_tx, status_rx) = watch::channel(PersistStatus::default());
        let revision = Arc::new(AtomicU64::new(0));

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(persist_changes(
                    state_rx,
                    Arc::clone(&revision),
                    repo,
                    status_tx,
                ));
            }
            Err(_) => warn!("no async runtime available; assessment changes will not be persisted"),
        }

        Self {
            state: state_tx,
            revision,
            persisted: status_rx,
        }
    }

    /// Register a category with the default score.
    ///
    /// Returns `false` if the category already exists; its entry is left as
    /// is, including the originally declared question count.
    pub fn initialize_category(&self, category_id: CategoryId, total_questions: u32) -> bool {
        self.state.send_if_modified(|state| {
            let created = state.initialize_category(category_id.clone(), total_questions);
            if created {
                self.revision.fetch_add(1, Ordering::AcqRel);
                debug!(category = %category_id, total_questions, "initialized category");
            }
            created
        })
    }

    /// Record the level chosen for a question and refresh its category score.
    ///
    /// Responses for a category that was never initialized are kept, but no
    /// score entry is created for them.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Assessment` if the question is already recorded
    /// under another category.
    pub fn update_response(
        &self,
        question_id: QuestionId,
        category_id: CategoryId,
        selected_level: MaturityLevel,
    ) -> Result<ResponseUpdate, StoreError> {
        let mut outcome = Ok(ResponseUpdate::Unchanged);
        self.state.send_if_modified(|state| {
            outcome = state.update_response(question_id.clone(), category_id.clone(), selected_level);
            let Ok(update) = &outcome else {
                return false;
            };
            if !update.is_change() {
                return false;
            }

            self.revision.fetch_add(1, Ordering::AcqRel);
            if state.category(&category_id).is_none() {
                warn!(
                    question = %question_id,
                    category = %category_id,
                    "response recorded for uninitialized category; score not tracked"
                );
            } else {
                debug!(
                    question = %question_id,
                    category = %category_id,
                    level = %selected_level,
                    score = state.category_score(&category_id),
                    "recorded response"
                );
            }
            true
        });
        outcome.map_err(StoreError::from)
    }

    /// Validate raw input and record it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Id` for blank identifiers, `StoreError::Level` for
    /// levels outside `1..=5`, or any error from [`Self::update_response`].
    pub fn record_answer(
        &self,
        question_id: &str,
        category_id: &str,
        selected_level: i64,
    ) -> Result<ResponseUpdate, StoreError> {
        let question_id = QuestionId::new(question_id)?;
        let category_id = CategoryId::new(category_id)?;
        let selected_level = MaturityLevel::new(selected_level)?;
        self.update_response(question_id, category_id, selected_level)
    }

    /// Score of a category, or the default if it was never initialized.
    #[must_use]
    pub fn category_score(&self, category_id: &CategoryId) -> u8 {
        self.state.borrow().category_score(category_id)
    }

    /// Unweighted mean of all category scores.
    #[must_use]
    pub fn overall_score(&self) -> u8 {
        self.state.borrow().overall_score()
    }

    #[must_use]
    pub fn category(&self, category_id: &CategoryId) -> Option<CategoryScore> {
        self.state.borrow().category(category_id).cloned()
    }

    #[must_use]
    pub fn response(&self, question_id: &QuestionId) -> Option<QuestionResponse> {
        self.state.borrow().response(question_id).cloned()
    }

    /// Responses recorded for one category, in recording order.
    #[must_use]
    pub fn responses_for(&self, category_id: &CategoryId) -> Vec<QuestionResponse> {
        self.state
            .borrow()
            .responses_for(category_id)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn snapshot(&self) -> AssessmentState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn overview(&self) -> AssessmentOverview {
        AssessmentOverview::from_state(&self.state.borrow())
    }

    /// Observe every committed change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AssessmentState> {
        self.state.subscribe()
    }

    /// Wait until every change made so far has been handed to storage.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persist` if the latest save failed (in-memory state
    /// is unaffected), or `StoreError::PersisterStopped` if no background
    /// persistence is running.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let target = self.revision.load(Ordering::Acquire);
        let mut status = self.persisted.clone();
        let error = {
            let current = status
                .wait_for(|s| s.revision >= target)
                .await
                .map_err(|_| StoreError::PersisterStopped)?;
            current.error.clone()
        };
        match error {
            Some(message) => Err(StoreError::Persist(message)),
            None => Ok(()),
        }
    }
}

async fn persist_changes(
    mut changes: watch::Receiver<AssessmentState>,
    revision: Arc<AtomicU64>,
    repo: Arc<dyn AssessmentRepository>,
    status: watch::Sender<PersistStatus>,
) {
    while changes.changed().await.is_ok() {
        let (snapshot, saved_revision) = {
            let state = changes.borrow_and_update();
            (
                AssessmentSnapshot::from_state(&state),
                revision.load(Ordering::Acquire),
            )
        };

        let error = match repo.save_snapshot(&snapshot).await {
            Ok(()) => {
                debug!(revision = saved_revision, "persisted assessment snapshot");
                None
            }
            Err(err) => {
                warn!(
                    revision = saved_revision,
                    error = %err,
                    "failed to persist assessment snapshot; keeping in-memory state"
                );
                Some(err.to_string())
            }
        };

        status.send_replace(PersistStatus {
            revision: saved_revision,
            error,
        });
    }
}
