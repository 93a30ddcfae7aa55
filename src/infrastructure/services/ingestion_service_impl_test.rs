use super::*;
use crate::domain::models::keyword::Keyword;
use crate::domain::models::note::NoteTag;
use crate::domain::repositories::keyword_repository::KeywordRepository;
use crate::domain::repositories::note_repository::NoteRepository;
use crate::infrastructure::repositories::keyword_repo_impl::KeywordRepositoryImpl;
use crate::infrastructure::repositories::note_repo_impl::NoteRepositoryImpl;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, PaginatorTrait};
use serde_json::json;

const NOTE_A: &str = "64f1a2b3c4d5e6f7a8b9c0d1";
const NOTE_B: &str = "64f1a2b3c4d5e6f7a8b9c0d2";
const NOTE_REJECTED: &str = "64f1a2b3c4d5e6f7a8b9c0ff";

async fn setup() -> (Arc<DatabaseConnection>, IngestionServiceImpl) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let db = Arc::new(db);
    let service = IngestionServiceImpl::new(db.clone(), ImportanceThresholds::default());
    (db, service)
}

fn search_batch(notes: serde_json::Value, comments: serde_json::Value) -> IngestionBatch {
    IngestionBatch::classify(json!({
        "query": "露营",
        "notes": notes,
        "comments": comments,
    }))
}

fn note_json(note_id: &str, liked: i64, comments: i64) -> serde_json::Value {
    json!({
        "note_id": note_id,
        "title": "周末露营清单",
        "desc": "帐篷和睡袋推荐",
        "liked_count": liked,
        "comment_count": comments,
    })
}

#[tokio::test]
async fn test_first_ingestion_creates_one_new_row() {
    let (db, service) = setup().await;

    let result = service
        .ingest(search_batch(json!([note_json(NOTE_A, 5, 10)]), json!([])))
        .await
        .unwrap();

    assert_eq!(result.total_processed, 1);
    assert_eq!(result.new_notes, 1);
    assert!(result.errors.is_empty());

    let count = note_entity::Entity::find().count(db.as_ref()).await.unwrap();
    assert_eq!(count, 1);

    let note = NoteRepositoryImpl::new(db.clone())
        .find_by_note_id(NOTE_A)
        .await
        .unwrap()
        .unwrap();
    assert!(note.is_new);
    assert_eq!(note.description.as_deref(), Some("帐篷和睡袋推荐"));
}

#[tokio::test]
async fn test_reingestion_detects_changes_and_logs() {
    let (db, service) = setup().await;
    let repo = NoteRepositoryImpl::new(db.clone());

    service
        .ingest(search_batch(json!([note_json(NOTE_A, 5, 10)]), json!([])))
        .await
        .unwrap();

    let unchanged = service
        .ingest(search_batch(json!([note_json(NOTE_A, 5, 10)]), json!([])))
        .await
        .unwrap();
    assert_eq!(unchanged.changed_notes, 0);
    assert_eq!(unchanged.details[0].outcome, "unchanged");
    assert!(repo.find_tag_logs(NOTE_A).await.unwrap().is_empty());

    let changed = service
        .ingest(search_batch(json!([note_json(NOTE_A, 5, 12)]), json!([])))
        .await
        .unwrap();
    assert_eq!(changed.changed_notes, 1);

    let note = repo.find_by_note_id(NOTE_A).await.unwrap().unwrap();
    assert!(note.is_changed);
    assert!(!note.is_new);
    assert_eq!(note.crawl_count, 3);
    assert_eq!(note.current_tags, vec![NoteTag::New, NoteTag::Changed]);

    let logs = repo.find_tag_logs(NOTE_A).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].old_stats.map(|s| s.comment_count), Some(10));
    assert_eq!(logs[0].new_stats.map(|s| s.comment_count), Some(12));
}

#[tokio::test]
async fn test_failing_item_does_not_block_others() {
    let (db, service) = setup().await;

    let result = service
        .ingest(search_batch(
            json!([note_json("short", 1, 1), note_json(NOTE_B, 1, 1)]),
            json!([]),
        ))
        .await
        .unwrap();

    assert_eq!(result.total_processed, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("short"));

    let count = note_entity::Entity::find().count(db.as_ref()).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_database_failure_rolls_back_only_that_item() {
    let (db, service) = setup().await;
    db.execute_unprepared(&format!(
        "CREATE TRIGGER reject_note BEFORE INSERT ON notes \
         WHEN NEW.note_id = '{NOTE_REJECTED}' \
         BEGIN SELECT RAISE(ABORT, 'note rejected by trigger'); END;"
    ))
    .await
    .unwrap();

    let result = service
        .ingest(search_batch(
            json!([
                note_json(NOTE_A, 1, 1),
                note_json(NOTE_REJECTED, 1, 1),
                note_json(NOTE_B, 1, 1),
            ]),
            json!([]),
        ))
        .await
        .unwrap();

    assert_eq!(result.total_processed, 2);
    assert_eq!(result.new_notes, 2);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with(NOTE_REJECTED));
    assert!(result.errors[0].contains("note rejected by trigger"));

    let count = note_entity::Entity::find().count(db.as_ref()).await.unwrap();
    assert_eq!(count, 2);
    assert!(note_entity::Entity::find()
        .filter(note_entity::Column::NoteId.eq(NOTE_REJECTED))
        .one(db.as_ref())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_keyword_match_marks_note_and_comment() {
    let (db, service) = setup().await;
    KeywordRepositoryImpl::new(db.clone())
        .create(&Keyword::new("帐篷".to_string(), Some("装备".to_string()), 4, None))
        .await
        .unwrap();

    let result = service
        .ingest(search_batch(
            json!([note_json(NOTE_A, 1, 1)]),
            json!([
                {
                    "comment_id": "c-0000000001",
                    "note_id": NOTE_A,
                    "content": "这个帐篷在哪买？",
                    "like_count": "1.2万"
                },
                {
                    "comment_id": "c-0000000002",
                    "note_id": NOTE_A,
                    "content": "好看"
                },
                {
                    "comment_id": "c-0000000003",
                    "note_id": "missing-parent-note",
                    "content": "帐篷"
                }
            ]),
        ))
        .await
        .unwrap();

    assert_eq!(result.important_notes, 1);
    assert_eq!(result.details[0].matched_keywords, vec!["帐篷".to_string()]);
    assert_eq!(result.comments_processed, 2);
    assert_eq!(result.errors.len(), 1);

    let stored = comment_entity::Entity::find()
        .filter(comment_entity::Column::CommentId.eq("c-0000000001"))
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert!(stored.contains_business_keywords);
    assert_eq!(stored.importance_score, 4);
    assert_eq!(stored.like_count, 12000);

    let note = NoteRepositoryImpl::new(db.clone())
        .find_by_note_id(NOTE_A)
        .await
        .unwrap()
        .unwrap();
    assert!(note.is_important);
    assert_eq!(note.important_comment_ids, vec!["c-0000000001".to_string()]);
}

#[tokio::test]
async fn test_soft_deleted_note_is_updated_in_place() {
    let (db, service) = setup().await;
    let repo = NoteRepositoryImpl::new(db.clone());

    service
        .ingest(search_batch(json!([note_json(NOTE_A, 1, 1)]), json!([])))
        .await
        .unwrap();
    repo.soft_delete(NOTE_A).await.unwrap();

    let result = service
        .ingest(search_batch(json!([note_json(NOTE_A, 2, 1)]), json!([])))
        .await
        .unwrap();

    assert!(result.errors.is_empty());
    assert_eq!(result.changed_notes, 1);
    assert!(repo.find_by_note_id(NOTE_A).await.unwrap().is_none());

    let count = note_entity::Entity::find().count(db.as_ref()).await.unwrap();
    assert_eq!(count, 1);
}
