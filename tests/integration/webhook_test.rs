// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    create_test_app, create_test_app_with, wait_for, webhook_payload, NOTE_A, NOTE_B,
};
use axum::http::StatusCode;
use notepulse::presentation::middleware::signature_middleware::{sign, SIGNATURE_HEADER};
use serde_json::{json, Value};

#[tokio::test]
async fn test_webhook_test_endpoint() {
    let app = create_test_app().await;

    let response = app.server.post("/api/webhook/test").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_malformed_payload_is_unprocessable() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/webhook/xhs-result")
        .json(&json!({"status": "exploded", "message": "?"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_search_result_is_ingested_in_background() {
    let app = create_test_app().await;

    let data = json!({
        "query": "露营",
        "notes": [
            {"note_id": NOTE_A, "title": "露营装备清单", "desc": "帐篷", "liked_count": "1.5万"},
            {"note_id": NOTE_B, "title": "徒步路线", "comment_count": 3},
        ],
        "comments": [
            {"comment_id": "c000000001", "note_id": NOTE_A, "content": "求链接", "like_count": 2}
        ]
    });
    let response = app
        .server
        .post("/api/webhook/xhs-result")
        .json(&webhook_payload("success", None, Some(data)))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "received");
    assert_eq!(body["processed_count"], 3);
    assert!(body.get("errors").is_none());

    let server = &app.server;
    wait_for(move || async move {
        server.get("/api/notes/stats").await.json::<Value>()["total_notes"] == 2
    })
    .await;

    let note: Value = app.server.get(&format!("/api/notes/{}", NOTE_A)).await.json();
    assert_eq!(note["liked_count"], 15000);
    assert_eq!(note["is_new"], true);
    assert_eq!(note["is_important"], true);
    assert_eq!(note["desc"], "帐篷");

    wait_for(move || async move {
        server
            .get(&format!("/api/notes/{}/comments", NOTE_A))
            .await
            .json::<Value>()["total"]
            == 1
    })
    .await;
}

#[tokio::test]
async fn test_task_lifecycle_through_callbacks() {
    let app = create_test_app().await;

    let task: Value = app
        .server
        .post("/api/tasks")
        .json(&json!({"task_name": "露营", "keyword": "露营"}))
        .await
        .json();
    let task_id = task["id"].as_str().unwrap().to_string();

    app.server
        .post("/api/webhook/xhs-result")
        .json(&webhook_payload("started", Some(&task_id), None))
        .await
        .assert_status_ok();
    let running: Value = app.server.get(&format!("/api/tasks/{}", task_id)).await.json();
    assert_eq!(running["status"], "running");
    assert_eq!(running["run_id"], "1234567890");

    app.server
        .post("/api/webhook/xhs-result")
        .json(&webhook_payload("progress", Some(&task_id), None))
        .await
        .assert_status_ok();

    app.server
        .post("/api/webhook/xhs-result")
        .json(&webhook_payload(
            "completed",
            Some(&task_id),
            Some(json!([{"note_id": NOTE_A, "title": "露营"}])),
        ))
        .await
        .assert_status_ok();

    let server = &app.server;
    let path = format!("/api/tasks/{}", task_id);
    let path = path.as_str();
    wait_for(move || async move {
        server.get(path).await.json::<Value>()["status"] == "completed"
    })
    .await;

    let done: Value = app.server.get(path).await.json();
    assert_eq!(done["progress"], 100);
    assert_eq!(done["total_crawled"], 1);
    assert_eq!(done["new_notes"], 1);
    assert!(done["finished_at"].is_string());
}

#[tokio::test]
async fn test_error_callback_fails_task() {
    let app = create_test_app().await;

    let task: Value = app
        .server
        .post("/api/tasks")
        .json(&json!({"task_name": "t", "keyword": "k"}))
        .await
        .json();
    let task_id = task["id"].as_str().unwrap();

    app.server
        .post("/api/webhook/xhs-result")
        .json(&webhook_payload("error", Some(task_id), None))
        .await
        .assert_status_ok();

    let failed: Value = app.server.get(&format!("/api/tasks/{}", task_id)).await.json();
    assert_eq!(failed["status"], "failed");
    assert_eq!(failed["error_message"], "crawler error");
}

#[tokio::test]
async fn test_signature_is_enforced_when_secret_configured() {
    let app = create_test_app_with(|builder| {
        builder.set_override("webhook.secret", "s3cret").unwrap()
    })
    .await;
    let payload = webhook_payload("started", None, None);

    let unsigned = app
        .server
        .post("/api/webhook/xhs-result")
        .json(&payload)
        .await;
    assert_eq!(unsigned.status_code(), StatusCode::UNAUTHORIZED);

    let body = serde_json::to_vec(&payload).unwrap();
    let signed = app
        .server
        .post("/api/webhook/xhs-result")
        .add_header(SIGNATURE_HEADER, sign("s3cret", &body).unwrap())
        .json(&payload)
        .await;
    assert_eq!(signed.status_code(), StatusCode::OK);
}
