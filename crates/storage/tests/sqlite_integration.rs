use maturity_core::model::{AssessmentState, CategoryId, MaturityLevel, QuestionId};
use storage::repository::{AssessmentRepository, StorageError};
use storage::snapshot::{AssessmentSnapshot, CURRENT_VERSION, STORAGE_KEY};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn answered_state() -> AssessmentState {
    let preparation = CategoryId::new("preparation").unwrap();
    let detection = CategoryId::new("detection").unwrap();

    let mut state = AssessmentState::new();
    state.initialize_category(preparation.clone(), 5);
    state.initialize_category(detection.clone(), 4);
    state
        .update_response(
            QuestionId::new("prep-1").unwrap(),
            preparation,
            MaturityLevel::new(4).unwrap(),
        )
        .unwrap();
    state
        .update_response(
            QuestionId::new("detect-1").unwrap(),
            detection,
            MaturityLevel::new(2).unwrap(),
        )
        .unwrap();
    state
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_scores() {
    let repo = connect("memdb_roundtrip").await;
    assert!(repo.load_snapshot().await.unwrap().is_none());

    let state = answered_state();
    repo.save_snapshot(&AssessmentSnapshot::from_state(&state))
        .await
        .unwrap();

    let restored = repo
        .load_snapshot()
        .await
        .unwrap()
        .expect("snapshot saved")
        .into_state()
        .unwrap();

    for entry in state.category_scores() {
        assert_eq!(
            restored.category_score(&entry.category_id),
            state.category_score(&entry.category_id)
        );
    }
    assert_eq!(restored.overall_score(), state.overall_score());
    assert_eq!(restored.responses(), state.responses());
}

#[tokio::test]
async fn sqlite_overwrites_previous_snapshot() {
    let repo = connect("memdb_overwrite").await;

    let mut state = answered_state();
    repo.save_snapshot(&AssessmentSnapshot::from_state(&state))
        .await
        .unwrap();

    let preparation = CategoryId::new("preparation").unwrap();
    state
        .update_response(
            QuestionId::new("prep-1").unwrap(),
            preparation.clone(),
            MaturityLevel::new(1).unwrap(),
        )
        .unwrap();
    repo.save_snapshot(&AssessmentSnapshot::from_state(&state))
        .await
        .unwrap();

    let restored = repo
        .load_snapshot()
        .await
        .unwrap()
        .unwrap()
        .into_state()
        .unwrap();
    assert_eq!(restored.category_score(&preparation), 20);
    assert_eq!(restored.responses().len(), 2);
}

#[tokio::test]
async fn sqlite_migrates_legacy_payload() {
    let repo = connect("memdb_legacy").await;
    repo.put_value(
        STORAGE_KEY,
        r#"{"responses":[{"questionId":"recovery-2","categoryId":"recovery","selectedLevel":3}],
            "categoryScores":[{"categoryId":"recovery","score":60,"totalQuestions":4,"answeredQuestions":1}]}"#,
    )
    .await
    .unwrap();

    let snapshot = repo.load_snapshot().await.unwrap().unwrap();
    assert_eq!(snapshot.version, CURRENT_VERSION);

    let state = snapshot.into_state().unwrap();
    assert_eq!(
        state.category_score(&CategoryId::new("recovery").unwrap()),
        60
    );
}

#[tokio::test]
async fn sqlite_rejects_future_payload() {
    let repo = connect("memdb_future").await;
    repo.put_value(STORAGE_KEY, r#"{"version":99,"responses":[],"categoryScores":[]}"#)
        .await
        .unwrap();

    let err = repo.load_snapshot().await.unwrap_err();
    assert!(matches!(err, StorageError::UnsupportedVersion { found: 99, .. }));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}
