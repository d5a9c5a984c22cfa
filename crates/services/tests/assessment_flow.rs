use std::sync::Arc;

use maturity_core::catalog;
use maturity_core::model::{CategoryId, MaturityBand};
use services::{AppServices, AssessmentStore, CategoryDetail};
use storage::repository::{AssessmentRepository, InMemoryRepository};
use storage::snapshot::STORAGE_KEY;

fn category(id: &str) -> CategoryId {
    CategoryId::new(id).unwrap()
}

#[tokio::test]
async fn answers_survive_reopening_the_store() {
    let repo = InMemoryRepository::new();
    let services = AppServices::from_repository(Arc::new(repo.clone()))
        .await
        .unwrap();
    let store = services.assessment();

    store.record_answer("detect-1", "detection", 1).unwrap();
    store.record_answer("detect-2", "detection", 5).unwrap();
    store.record_answer("comm-1", "communication", 5).unwrap();
    store.flush().await.unwrap();

    let before: Vec<(CategoryId, u8)> = store
        .snapshot()
        .category_scores()
        .iter()
        .map(|cs| (cs.category_id.clone(), cs.score))
        .collect();
    let overall_before = store.overall_score();
    drop(services);

    let reopened = AssessmentStore::open(Arc::new(repo.clone())).await.unwrap();
    for (id, score) in before {
        assert_eq!(reopened.category_score(&id), score);
    }
    assert_eq!(reopened.overall_score(), overall_before);
    assert_eq!(reopened.category_score(&category("detection")), 60);
    assert_eq!(reopened.category_score(&category("communication")), 100);
}

#[tokio::test]
async fn reopening_does_not_reset_initialized_categories() {
    let repo = InMemoryRepository::new();
    {
        let services = AppServices::from_repository(Arc::new(repo.clone()))
            .await
            .unwrap();
        let store = services.assessment();
        store.record_answer("recovery-1", "recovery", 4).unwrap();
        store.flush().await.unwrap();
    }

    let services = AppServices::from_repository(Arc::new(repo))
        .await
        .unwrap();
    let entry = services
        .assessment()
        .category(&category("recovery"))
        .unwrap();
    assert_eq!(entry.score, 80);
    assert_eq!(entry.answered_questions, 1);
    assert_eq!(entry.total_questions, 4);
}

#[tokio::test]
async fn overall_score_weights_categories_equally() {
    let services = AppServices::in_memory().await.unwrap();
    let store = services.assessment();

    // preparation: one answer at level 5 -> 100
    store.record_answer("prep-1", "preparation", 5).unwrap();
    // detection: every question at level 3 -> 60
    for question in catalog::DETECTION.questions {
        store.record_answer(question.id, "detection", 3).unwrap();
    }

    // 100, 60, 20, 20, 20
    assert_eq!(store.overall_score(), 44);

    let overview = store.overview();
    assert_eq!(overview.overall_band, MaturityBand::Basic);
    assert_eq!(overview.answered_questions, 5);
}

#[tokio::test]
async fn category_detail_reflects_latest_answers() {
    let services = AppServices::in_memory().await.unwrap();
    let store = services.assessment();

    store.record_answer("contain-2", "containment", 2).unwrap();
    store.record_answer("contain-2", "containment", 4).unwrap();

    let detail = CategoryDetail::from_state(&store.snapshot(), &catalog::CONTAINMENT).unwrap();
    let answered: Vec<_> = detail.questions.iter().filter(|q| q.answered).collect();
    assert_eq!(answered.len(), 1);
    assert_eq!(answered[0].question_id.as_str(), "contain-2");
    assert_eq!(answered[0].selected_level.value(), 4);
    assert_eq!(detail.score, 80);
}

#[tokio::test]
async fn corrupt_snapshot_is_reported_not_overwritten() {
    let repo = InMemoryRepository::new();
    repo.put_raw(STORAGE_KEY, "{\"version\": 1, \"responses\": 42}")
        .unwrap();

    let result = AppServices::from_repository(Arc::new(repo.clone())).await;
    assert!(result.is_err());
    assert_eq!(
        repo.raw(STORAGE_KEY).unwrap().as_deref(),
        Some("{\"version\": 1, \"responses\": 42}")
    );
    assert!(repo.load_snapshot().await.is_err());
}

#[tokio::test]
async fn sqlite_backed_services_restore_state() {
    let url = "sqlite:file:memdb_services_restore?mode=memory&cache=shared";
    let first = AppServices::new_sqlite(url).await.unwrap();
    let store = first.assessment();
    store.record_answer("prep-2", "preparation", 3).unwrap();
    store.record_answer("prep-3", "preparation", 4).unwrap();
    store.flush().await.unwrap();

    // Keep `first` alive so the shared in-memory database survives.
    let second = AppServices::new_sqlite(url).await.unwrap();
    let restored = second.assessment();
    assert_eq!(restored.category_score(&category("preparation")), 70);
    assert_eq!(restored.overall_score(), store.overall_score());
}
