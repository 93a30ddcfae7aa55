use super::*;
use serde_json::json;

const NOTE_A: &str = "64f1a2b3c4d5e6f7a8b9c0d1";
const NOTE_B: &str = "64f1a2b3c4d5e6f7a8b9c0d2";

#[test]
fn test_search_result_with_comments() {
    let batch = IngestionBatch::classify(json!({
        "query": "露营",
        "total_count": 2,
        "notes": [{"note_id": NOTE_A}, {"note_id": NOTE_B, "liked_count": 3}],
        "comments": [{"comment_id": "c000000001", "note_id": NOTE_A, "content": "求链接"}]
    }));

    assert_eq!(batch.kind, DataKind::Search);
    assert_eq!(batch.source.as_deref(), Some("露营"));
    assert_eq!(batch.notes.len(), 2);
    assert_eq!(batch.comments.len(), 1);
    assert!(batch.rejected.is_empty());
}

#[test]
fn test_single_note_object() {
    let batch = IngestionBatch::classify(json!({"note_id": NOTE_A, "title": "t"}));

    assert_eq!(batch.kind, DataKind::Note);
    assert_eq!(batch.notes.len(), 1);
    assert_eq!(batch.notes[0].title.as_deref(), Some("t"));
}

#[test]
fn test_user_result_skips_unparseable_entries() {
    let batch = IngestionBatch::classify(json!({
        "user_url": "https://www.xiaohongshu.com/user/profile/abc",
        "notes": [{"note_id": NOTE_A}, {"title": "no id"}]
    }));

    assert_eq!(batch.kind, DataKind::User);
    assert_eq!(batch.notes.len(), 1);
    assert_eq!(batch.rejected.len(), 1);
}

#[test]
fn test_array_is_note_list() {
    let batch = IngestionBatch::classify(json!([{"note_id": NOTE_A}, {"note_id": NOTE_B}]));
    assert_eq!(batch.kind, DataKind::List);
    assert_eq!(batch.notes.len(), 2);
}

#[test]
fn test_unknown_shape_is_empty() {
    let batch = IngestionBatch::classify(json!({"foo": "bar"}));
    assert_eq!(batch.kind, DataKind::Unknown);
    assert!(batch.is_empty());

    let batch = IngestionBatch::classify(json!("text"));
    assert_eq!(batch.kind, DataKind::Unknown);
}

#[test]
fn test_payload_rejects_unknown_status() {
    let result = serde_json::from_value::<WebhookPayload>(json!({
        "status": "paused",
        "message": "m",
        "timestamp": "2025-07-18T10:00:00Z",
        "run_id": "1"
    }));
    assert!(result.is_err());
}

#[test]
fn test_payload_accepts_naive_timestamp() {
    let payload: WebhookPayload = serde_json::from_value(json!({
        "status": "progress",
        "message": "m",
        "timestamp": "2025-07-18T10:00:00.123456",
        "run_id": "1",
        "progress": 40
    }))
    .unwrap();

    assert_eq!(payload.status, WebhookStatus::Progress);
    assert_eq!(payload.progress, Some(40));
    assert!(payload.data.is_none());
}
