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
        dto::keyword_dto::{
            KeywordCreateDto, KeywordListParams, KeywordStatsResponse, KeywordToggleResponse,
            KeywordUpdateDto, MessageResponse,
        },
        use_cases::keyword_use_case::{KeywordUseCase, KeywordUseCaseError},
    },
    domain::repositories::keyword_repository::KeywordRepository,
    presentation::errors::AppError,
};

pub async fn list_keywords<KR: KeywordRepository + 'static>(
    Extension(repo): Extension<Arc<KR>>,
    Query(params): Query<KeywordListParams>,
) -> impl IntoResponse {
    let use_case = KeywordUseCase::new(repo);
    match use_case.list(params).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

pub async fn create_keyword<KR: KeywordRepository + 'static>(
    Extension(repo): Extension<Arc<KR>>,
    Json(payload): Json<KeywordCreateDto>,
) -> impl IntoResponse {
    let use_case = KeywordUseCase::new(repo);
    match use_case.create(payload).await {
        Ok(keyword) => (StatusCode::CREATED, Json(keyword)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

pub async fn get_keyword<KR: KeywordRepository + 'static>(
    Extension(repo): Extension<Arc<KR>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let use_case = KeywordUseCase::new(repo);
    match use_case.get(id).await {
        Ok(keyword) => (StatusCode::OK, Json(keyword)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

/// 部分更新关键词
pub async fn update_keyword<KR: KeywordRepository + 'static>(
    Extension(repo): Extension<Arc<KR>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<KeywordUpdateDto>,
) -> impl IntoResponse {
    let use_case = KeywordUseCase::new(repo);
    match use_case.update(id, payload).await {
        Ok(keyword) => (StatusCode::OK, Json(keyword)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

pub async fn delete_keyword<KR: KeywordRepository + 'static>(
    Extension(repo): Extension<Arc<KR>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let use_case = KeywordUseCase::new(repo);
    match use_case.delete(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "keyword deleted".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

/// 切换关键词启用状态
pub async fn toggle_keyword<KR: KeywordRepository + 'static>(
    Extension(repo): Extension<Arc<KR>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let use_case = KeywordUseCase::new(repo);
    match use_case.toggle(id).await {
        Ok(keyword) => {
            let state = if keyword.is_active { "enabled" } else { "disabled" };
            let body = KeywordToggleResponse {
                message: format!("keyword {}", state),
                is_active: keyword.is_active,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

pub async fn list_categories<KR: KeywordRepository + 'static>(
    Extension(repo): Extension<Arc<KR>>,
) -> Result<Json<Vec<String>>, AppError> {
    let use_case = KeywordUseCase::new(repo);
    Ok(Json(use_case.categories().await?))
}

pub async fn keyword_stats<KR: KeywordRepository + 'static>(
    Extension(repo): Extension<Arc<KR>>,
) -> Result<Json<KeywordStatsResponse>, AppError> {
    let use_case = KeywordUseCase::new(repo);
    Ok(Json(use_case.stats().await?))
}

impl From<KeywordUseCaseError> for (StatusCode, String) {
    fn from(err: KeywordUseCaseError) -> Self {
        match err {
            KeywordUseCaseError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            e @ KeywordUseCaseError::Duplicate(_) => (StatusCode::BAD_REQUEST, e.to_string()),
            KeywordUseCaseError::NotFound => {
                (StatusCode::NOT_FOUND, "Keyword not found".to_string())
            }
            KeywordUseCaseError::Repository(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}
