// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, wait_for, webhook_payload, TestApp, NOTE_A, NOTE_B};
use axum::http::StatusCode;
use serde_json::{json, Value};

const NOTE_C: &str = "64f1a2b3c4d5e6f7a8b9c0d3";

async fn seed_notes(app: &TestApp) {
    let data = json!([
        {"note_id": NOTE_A, "title": "Camping Gear", "desc": "tent", "liked_count": 10, "author_user_id": "u1"},
        {"note_id": NOTE_B, "title": "徒步路线", "desc": "山野", "liked_count": 500, "author_user_id": "u2"},
        {"note_id": NOTE_C, "title": "城市咖啡", "liked_count": 2000, "author_user_id": "u1"},
    ]);
    app.server
        .post("/api/webhook/xhs-result")
        .json(&webhook_payload("success", None, Some(data)))
        .await
        .assert_status_ok();

    let server = &app.server;
    wait_for(move || async move {
        server.get("/api/notes/stats").await.json::<Value>()["total_notes"] == 3
    })
    .await;
}

fn note_ids(body: &Value) -> Vec<String> {
    body.as_array()
        .map(|notes| {
            notes
                .iter()
                .filter_map(|n| n["note_id"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_keyword_search_is_case_insensitive() {
    let app = create_test_app().await;
    seed_notes(&app).await;

    let body: Value = app
        .server
        .get("/api/notes")
        .add_query_param("keyword", "camping")
        .await
        .json();

    assert_eq!(note_ids(&body), vec![NOTE_A.to_string()]);
}

#[tokio::test]
async fn test_flags_author_and_paging() {
    let app = create_test_app().await;
    seed_notes(&app).await;

    let important: Value = app
        .server
        .get("/api/notes")
        .add_query_param("is_important", "true")
        .await
        .json();
    assert_eq!(note_ids(&important), vec![NOTE_C.to_string()]);

    let by_author: Value = app
        .server
        .get("/api/notes")
        .add_query_param("author_user_id", "u1")
        .await
        .json();
    assert_eq!(by_author.as_array().map(Vec::len), Some(2));

    let page: Value = app
        .server
        .get("/api/notes")
        .add_query_param("limit", 1)
        .add_query_param("offset", 1)
        .await
        .json();
    assert_eq!(page.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_advanced_filters_and_sort() {
    let app = create_test_app().await;
    seed_notes(&app).await;

    let filters = json!([{"id": "liked_count", "value": "100", "operator": "gte"}]).to_string();
    let sort = json!([{"id": "liked_count", "desc": false}]).to_string();
    let body: Value = app
        .server
        .get("/api/notes")
        .add_query_param("filters", &filters)
        .add_query_param("sort", &sort)
        .await
        .json();

    assert_eq!(note_ids(&body), vec![NOTE_B.to_string(), NOTE_C.to_string()]);

    let ignored: Value = app
        .server
        .get("/api/notes")
        .add_query_param("filters", "not json")
        .await
        .json();
    assert_eq!(ignored.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_limit_out_of_range_is_rejected() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/api/notes")
        .add_query_param("limit", 5000)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_soft_delete_hides_note() {
    let app = create_test_app().await;
    seed_notes(&app).await;

    let deleted = app.server.delete(&format!("/api/notes/{}", NOTE_A)).await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

    let detail = app.server.get(&format!("/api/notes/{}", NOTE_A)).await;
    assert_eq!(detail.status_code(), StatusCode::NOT_FOUND);

    let again = app.server.delete(&format!("/api/notes/{}", NOTE_A)).await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);

    let stats: Value = app.server.get("/api/notes/stats").await.json();
    assert_eq!(stats["total_notes"], 2);
}

#[tokio::test]
async fn test_recrawl_with_changed_counts_writes_tag_log() {
    let app = create_test_app().await;
    seed_notes(&app).await;

    app.server
        .post("/api/webhook/xhs-result")
        .json(&webhook_payload(
            "success",
            None,
            Some(json!({"note_id": NOTE_B, "liked_count": 500, "comment_count": 42})),
        ))
        .await
        .assert_status_ok();

    let server = &app.server;
    wait_for(move || async move {
        server
            .get(&format!("/api/notes/{}", NOTE_B))
            .await
            .json::<Value>()["is_changed"]
            == true
    })
    .await;

    let logs: Value = app
        .server
        .get(&format!("/api/notes/{}/tag-logs", NOTE_B))
        .await
        .json();
    let logs = logs.as_array().cloned().unwrap_or_default();
    assert_eq!(logs.len(), 1);
    assert!(logs[0]["change_reason"]
        .as_str()
        .unwrap_or("")
        .contains("comment_count"));
}

#[tokio::test]
async fn test_comments_of_missing_note_is_not_found() {
    let app = create_test_app().await;

    let response = app
        .server
        .get(&format!("/api/notes/{}/comments", NOTE_A))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
