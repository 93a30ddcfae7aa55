// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    application::{
        dto::task_dto::{
            TaskActionResponse, TaskCreateDto, TaskListParams, TaskStatsResponse, TaskUpdateDto,
            TriggerCrawlDto,
        },
        use_cases::task_use_case::{TaskUseCase, TaskUseCaseError},
    },
    config::settings::Settings,
    domain::{
        repositories::crawl_task_repository::CrawlTaskRepository,
        services::dispatch_service::{CrawlDispatcher, DispatchError},
    },
    presentation::errors::AppError,
};

/// 爬虫回调的路由路径
pub const WEBHOOK_PATH: &str = "/api/webhook/xhs-result";

/// 根据服务对外地址生成默认回调地址
pub fn default_webhook_url(settings: &Settings) -> Option<String> {
    settings
        .webhook
        .public_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .map(|url| format!("{}{}", url.trim_end_matches('/'), WEBHOOK_PATH))
}

fn use_case<TR, D>(repo: Arc<TR>, dispatcher: Arc<D>, settings: &Settings) -> TaskUseCase<TR, D>
where
    TR: CrawlTaskRepository + 'static,
    D: CrawlDispatcher + 'static,
{
    TaskUseCase::new(repo, dispatcher, default_webhook_url(settings))
}

/// 创建待执行任务
pub async fn create_task<TR, D>(
    Extension(repo): Extension<Arc<TR>>,
    Extension(dispatcher): Extension<Arc<D>>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<TaskCreateDto>,
) -> impl IntoResponse
where
    TR: CrawlTaskRepository + 'static,
    D: CrawlDispatcher + 'static,
{
    match use_case(repo, dispatcher, &settings).create(payload).await {
        Ok(task) => (StatusCode::CREATED, Json(task)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

/// 分页查询任务，最新在前
pub async fn list_tasks<TR, D>(
    Extension(repo): Extension<Arc<TR>>,
    Extension(dispatcher): Extension<Arc<D>>,
    Extension(settings): Extension<Arc<Settings>>,
    Query(params): Query<TaskListParams>,
) -> impl IntoResponse
where
    TR: CrawlTaskRepository + 'static,
    D: CrawlDispatcher + 'static,
{
    match use_case(repo, dispatcher, &settings).list(params).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

pub async fn task_stats<TR, D>(
    Extension(repo): Extension<Arc<TR>>,
    Extension(dispatcher): Extension<Arc<D>>,
    Extension(settings): Extension<Arc<Settings>>,
) -> Result<Json<TaskStatsResponse>, AppError>
where
    TR: CrawlTaskRepository + 'static,
    D: CrawlDispatcher + 'static,
{
    Ok(Json(use_case(repo, dispatcher, &settings).stats().await?))
}

pub async fn get_task<TR, D>(
    Extension(repo): Extension<Arc<TR>>,
    Extension(dispatcher): Extension<Arc<D>>,
    Extension(settings): Extension<Arc<Settings>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse
where
    TR: CrawlTaskRepository + 'static,
    D: CrawlDispatcher + 'static,
{
    match use_case(repo, dispatcher, &settings).get(id).await {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

pub async fn update_task<TR, D>(
    Extension(repo): Extension<Arc<TR>>,
    Extension(dispatcher): Extension<Arc<D>>,
    Extension(settings): Extension<Arc<Settings>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TaskUpdateDto>,
) -> impl IntoResponse
where
    TR: CrawlTaskRepository + 'static,
    D: CrawlDispatcher + 'static,
{
    match use_case(repo, dispatcher, &settings).update(id, payload).await {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

/// 取消任务
pub async fn cancel_task<TR, D>(
    Extension(repo): Extension<Arc<TR>>,
    Extension(dispatcher): Extension<Arc<D>>,
    Extension(settings): Extension<Arc<Settings>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse
where
    TR: CrawlTaskRepository + 'static,
    D: CrawlDispatcher + 'static,
{
    match use_case(repo, dispatcher, &settings).cancel(id).await {
        Ok(task) => {
            let body = TaskActionResponse {
                success: true,
                message: "task cancelled".to_string(),
                task_id: Some(task.id.to_string()),
                github_run_url: None,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

/// 触发已存在的待执行任务
pub async fn trigger_task<TR, D>(
    Extension(repo): Extension<Arc<TR>>,
    Extension(dispatcher): Extension<Arc<D>>,
    Extension(settings): Extension<Arc<Settings>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse
where
    TR: CrawlTaskRepository + 'static,
    D: CrawlDispatcher + 'static,
{
    match use_case(repo, dispatcher, &settings).trigger(id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

/// 创建任务并立即触发爬虫
pub async fn trigger_crawl<TR, D>(
    Extension(repo): Extension<Arc<TR>>,
    Extension(dispatcher): Extension<Arc<D>>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<TriggerCrawlDto>,
) -> impl IntoResponse
where
    TR: CrawlTaskRepository + 'static,
    D: CrawlDispatcher + 'static,
{
    match use_case(repo, dispatcher, &settings)
        .trigger_crawl(payload)
        .await
    {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

impl From<TaskUseCaseError> for (StatusCode, String) {
    fn from(err: TaskUseCaseError) -> Self {
        match err {
            TaskUseCaseError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            TaskUseCaseError::NotFound => (StatusCode::NOT_FOUND, "Task not found".to_string()),
            TaskUseCaseError::Conflict(e) => (StatusCode::CONFLICT, e.to_string()),
            TaskUseCaseError::Repository(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            TaskUseCaseError::Dispatch(e @ DispatchError::MissingToken) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            TaskUseCaseError::Dispatch(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
        }
    }
}
