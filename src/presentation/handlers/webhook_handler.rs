// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::{
    application::use_cases::webhook_use_case::{WebhookUseCase, WebhookUseCaseError},
    domain::{
        models::webhook::WebhookPayload,
        repositories::crawl_task_repository::CrawlTaskRepository,
    },
    queue::ingestion_queue::IngestionQueue,
};

/// 接收爬虫回调
///
/// 载荷无法解析时返回 422
pub async fn receive_result<TR, Q>(
    Extension(task_repo): Extension<Arc<TR>>,
    Extension(queue): Extension<Arc<Q>>,
    payload: Result<Json<WebhookPayload>, JsonRejection>,
) -> impl IntoResponse
where
    TR: CrawlTaskRepository + 'static,
    Q: IngestionQueue + 'static,
{
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected malformed webhook payload: {}", rejection.body_text());
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }
    };

    let use_case = WebhookUseCase::new(task_repo, queue);
    match use_case.handle(payload).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

/// 回调连通性测试
pub async fn webhook_test() -> impl IntoResponse {
    Json(json!({ "status": "ok", "message": "webhook endpoint is reachable" }))
}

impl From<WebhookUseCaseError> for (StatusCode, String) {
    fn from(err: WebhookUseCaseError) -> Self {
        match err {
            WebhookUseCaseError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            WebhookUseCaseError::Queue(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
            WebhookUseCaseError::Repository(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}
