// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, create_test_app_with};
use axum::http::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

const DISPATCH_PATH: &str = "/repos/JunJD/xiuer-spider/dispatches";

#[tokio::test]
async fn test_create_defaults_and_validation() {
    let app = create_test_app().await;

    let created = app
        .server
        .post("/api/tasks")
        .json(&json!({"task_name": "露营", "keyword": "露营装备"}))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let task: Value = created.json();
    assert_eq!(task["status"], "pending");
    assert_eq!(task["target_count"], 200);
    assert_eq!(task["sort_type"], 1);

    let invalid = app
        .server
        .post("/api/tasks")
        .json(&json!({"task_name": "露营", "keyword": "露营装备", "target_count": 1001}))
        .await;
    assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_pages_newest_first_and_stats() {
    let app = create_test_app().await;

    for name in ["first", "second", "third"] {
        app.server
            .post("/api/tasks")
            .json(&json!({"task_name": name, "keyword": "k"}))
            .await
            .assert_status(StatusCode::CREATED);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let page: Value = app
        .server
        .get("/api/tasks")
        .add_query_param("page", 1)
        .add_query_param("size", 2)
        .await
        .json();
    assert_eq!(page["total"], 3);
    assert_eq!(page["size"], 2);
    assert_eq!(page["tasks"][0]["task_name"], "third");

    let stats: Value = app.server.get("/api/tasks/stats").await.json();
    assert_eq!(stats["total_tasks"], 3);
    assert_eq!(stats["pending_tasks"], 3);
}

#[tokio::test]
async fn test_cancel_then_cancel_again_conflicts() {
    let app = create_test_app().await;

    let task: Value = app
        .server
        .post("/api/tasks")
        .json(&json!({"task_name": "t", "keyword": "k"}))
        .await
        .json();
    let path = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let cancelled = app.server.delete(&path).await;
    assert_eq!(cancelled.status_code(), StatusCode::OK);

    let detail: Value = app.server.get(&path).await.json();
    assert_eq!(detail["status"], "failed");
    assert_eq!(detail["error_message"], "cancelled by user");

    let again = app.server.delete(&path).await;
    assert_eq!(again.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_patch_renames_and_rejects_terminal_transition() {
    let app = create_test_app().await;

    let task: Value = app
        .server
        .post("/api/tasks")
        .json(&json!({"task_name": "old", "keyword": "k"}))
        .await
        .json();
    let path = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let renamed: Value = app
        .server
        .patch(&path)
        .json(&json!({"task_name": "new", "status": "completed"}))
        .await
        .json();
    assert_eq!(renamed["task_name"], "new");
    assert_eq!(renamed["status"], "completed");

    let reopen = app
        .server
        .patch(&path)
        .json(&json!({"status": "running"}))
        .await;
    assert_eq!(reopen.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_trigger_crawl_dispatches_to_github() {
    let app = create_test_app().await;

    Mock::given(method("POST"))
        .and(path(DISPATCH_PATH))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "event_type": "search-xhs",
            "client_payload": {
                "query": "露营装备",
                "num": 30,
                "webhook_url": "https://hooks.example.com/api/webhook/xhs-result"
            }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.github)
        .await;

    let response = app
        .server
        .post("/api/tasks/trigger-crawl")
        .json(&json!({
            "task_name": "露营",
            "keyword": "露营装备",
            "target_count": 30,
            "webhook_url": "https://hooks.example.com/api/webhook/xhs-result"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(
        body["github_run_url"],
        "https://github.com/JunJD/xiuer-spider/actions"
    );

    let task: Value = app
        .server
        .get(&format!("/api/tasks/{}", body["task_id"].as_str().unwrap()))
        .await
        .json();
    assert_eq!(task["status"], "running");
    assert!(task["started_at"].is_string());
}

#[tokio::test]
async fn test_rejected_dispatch_fails_task_with_bad_gateway() {
    let app = create_test_app_with(|builder| {
        builder
            .set_override("webhook.public_url", "https://notepulse.example.com")
            .unwrap()
    })
    .await;

    Mock::given(method("POST"))
        .and(path(DISPATCH_PATH))
        .and(body_partial_json(json!({
            "client_payload": {
                "webhook_url": "https://notepulse.example.com/api/webhook/xhs-result"
            }
        })))
        .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
        .mount(&app.github)
        .await;

    let task: Value = app
        .server
        .post("/api/tasks")
        .json(&json!({"task_name": "t", "keyword": "k"}))
        .await
        .json();
    let id = task["id"].as_str().unwrap();

    let response = app.server.post(&format!("/api/tasks/{}/trigger", id)).await;
    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);

    let failed: Value = app.server.get(&format!("/api/tasks/{}", id)).await.json();
    assert_eq!(failed["status"], "failed");
    assert!(failed["error_message"]
        .as_str()
        .unwrap_or("")
        .contains("Bad credentials"));
}

#[tokio::test]
async fn test_missing_token_is_server_error() {
    let app =
        create_test_app_with(|builder| builder.set_override("github.token", "").unwrap()).await;

    let response = app
        .server
        .post("/api/tasks/trigger-crawl")
        .json(&json!({
            "task_name": "t",
            "keyword": "k",
            "webhook_url": "https://hooks.example.com/cb"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json::<Value>()["error"]
        .as_str()
        .unwrap_or("")
        .contains("token"));
}

#[tokio::test]
async fn test_unknown_task_is_not_found() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/api/tasks/00000000-0000-0000-0000-000000000000")
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
