use std::sync::Arc;

use maturity_core::catalog;
use storage::repository::{AssessmentRepository, Storage};

use crate::assessment_store::AssessmentStore;
use crate::error::AppServicesError;

/// Assembles app-facing services around one shared assessment store.
#[derive(Clone)]
pub struct AppServices {
    assessment: Arc<AssessmentStore>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or restoring the
    /// saved assessment fails.
    pub async fn new_sqlite(db_url: &str) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_repository(Arc::clone(&storage.assessments)).await
    }

    /// Build services over a fresh in-memory repository.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if catalog ids fail validation.
    pub async fn in_memory() -> Result<Self, AppServicesError> {
        Self::from_repository(Storage::in_memory().assessments).await
    }

    /// Open the store over `repo` and register every catalog category.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the stored snapshot cannot be restored.
    pub async fn from_repository(
        repo: Arc<dyn AssessmentRepository>,
    ) -> Result<Self, AppServicesError> {
        let assessment = Arc::new(AssessmentStore::open(repo).await?);
        initialize_catalog(&assessment)?;
        Ok(Self { assessment })
    }

    #[must_use]
    pub fn assessment(&self) -> Arc<AssessmentStore> {
        Arc::clone(&self.assessment)
    }
}

fn initialize_catalog(store: &AssessmentStore) -> Result<(), AppServicesError> {
    for def in &catalog::CATEGORIES {
        store.initialize_category(def.category_id()?, def.total_questions());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registers_every_catalog_category() {
        let services = AppServices::in_memory().await.unwrap();
        let store = services.assessment();

        let overview = store.overview();
        assert_eq!(overview.categories.len(), catalog::CATEGORIES.len());
        assert_eq!(overview.overall_score, 20);
    }
}
