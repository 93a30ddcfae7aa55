// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, wait_for, webhook_payload, NOTE_A};
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_keyword_crud_and_listing_order() {
    let app = create_test_app().await;

    for (keyword, category, weight) in [("链接", "购买", 3), ("多少钱", "价格", 5), ("同款", "购买", 5)] {
        let response = app
            .server
            .post("/api/keywords")
            .json(&json!({"keyword": keyword, "category": category, "weight": weight}))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let list: Value = app.server.get("/api/keywords").await.json();
    assert_eq!(list["total"], 3);
    let order: Vec<&str> = list["keywords"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|k| k["keyword"].as_str())
        .collect();
    assert_eq!(order, vec!["多少钱", "同款", "链接"]);
    assert_eq!(list["categories"], json!(["价格", "购买"]));

    let categories: Value = app.server.get("/api/keywords/categories").await.json();
    assert_eq!(categories, json!(["价格", "购买"]));
}

#[tokio::test]
async fn test_duplicate_keyword_is_bad_request() {
    let app = create_test_app().await;

    app.server
        .post("/api/keywords")
        .json(&json!({"keyword": "链接"}))
        .await
        .assert_status(StatusCode::CREATED);

    let duplicate = app
        .server
        .post("/api/keywords")
        .json(&json!({"keyword": "链接"}))
        .await;

    assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);
    assert!(duplicate.json::<Value>()["error"]
        .as_str()
        .unwrap_or("")
        .contains("链接"));
}

#[tokio::test]
async fn test_invalid_weight_is_bad_request() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/keywords")
        .json(&json!({"keyword": "链接", "weight": 11}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_toggle_delete_and_stats() {
    let app = create_test_app().await;

    let created: Value = app
        .server
        .post("/api/keywords")
        .json(&json!({"keyword": "链接", "category": "购买", "weight": 2}))
        .await
        .json();
    let id = created["id"].as_str().unwrap().to_string();

    let updated: Value = app
        .server
        .put(&format!("/api/keywords/{}", id))
        .json(&json!({"weight": 8}))
        .await
        .json();
    assert_eq!(updated["weight"], 8);
    assert_eq!(updated["category"], "购买");

    let toggled: Value = app
        .server
        .patch(&format!("/api/keywords/{}/toggle", id))
        .await
        .json();
    assert_eq!(toggled["is_active"], false);

    let active_only: Value = app.server.get("/api/keywords").await.json();
    assert_eq!(active_only["total"], 0);
    let everything: Value = app
        .server
        .get("/api/keywords")
        .add_query_param("active_only", false)
        .await
        .json();
    assert_eq!(everything["total"], 1);

    let stats: Value = app.server.get("/api/keywords/stats").await.json();
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["inactive"], 1);

    app.server
        .delete(&format!("/api/keywords/{}", id))
        .await
        .assert_status_ok();
    let missing = app.server.put(&format!("/api/keywords/{}", id)).json(&json!({})).await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_active_keyword_marks_ingested_note_important() {
    let app = create_test_app().await;

    app.server
        .post("/api/keywords")
        .json(&json!({"keyword": "帐篷"}))
        .await
        .assert_status(StatusCode::CREATED);

    app.server
        .post("/api/webhook/xhs-result")
        .json(&webhook_payload(
            "success",
            None,
            Some(json!({"note_id": NOTE_A, "title": "周末露营", "desc": "新买的帐篷", "liked_count": 1})),
        ))
        .await
        .assert_status_ok();

    let server = &app.server;
    let path = format!("/api/notes/{}", NOTE_A);
    let path = path.as_str();
    wait_for(move || async move { server.get(path).await.status_code() == StatusCode::OK }).await;

    let note: Value = app.server.get(path).await.json();
    assert_eq!(note["is_important"], true);
    assert_eq!(note["matched_keywords"], json!(["帐篷"]));
}
