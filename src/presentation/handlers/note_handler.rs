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

use crate::{
    application::{
        dto::note_dto::{CommentPageParams, NoteSearchParams},
        use_cases::note_use_case::{NoteUseCase, NoteUseCaseError},
    },
    domain::repositories::{
        comment_repository::CommentRepository,
        note_repository::{NoteRepository, NoteStats},
    },
    presentation::errors::AppError,
};

/// 搜索笔记
pub async fn search_notes<NR, CR>(
    Extension(note_repo): Extension<Arc<NR>>,
    Extension(comment_repo): Extension<Arc<CR>>,
    Query(params): Query<NoteSearchParams>,
) -> impl IntoResponse
where
    NR: NoteRepository + 'static,
    CR: CommentRepository + 'static,
{
    let use_case = NoteUseCase::new(note_repo, comment_repo);
    match use_case.search(params).await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

/// 笔记统计
pub async fn note_stats<NR, CR>(
    Extension(note_repo): Extension<Arc<NR>>,
    Extension(comment_repo): Extension<Arc<CR>>,
) -> Result<Json<NoteStats>, AppError>
where
    NR: NoteRepository + 'static,
    CR: CommentRepository + 'static,
{
    let use_case = NoteUseCase::new(note_repo, comment_repo);
    Ok(Json(use_case.stats().await?))
}

pub async fn get_note<NR, CR>(
    Extension(note_repo): Extension<Arc<NR>>,
    Extension(comment_repo): Extension<Arc<CR>>,
    Path(note_id): Path<String>,
) -> impl IntoResponse
where
    NR: NoteRepository + 'static,
    CR: CommentRepository + 'static,
{
    let use_case = NoteUseCase::new(note_repo, comment_repo);
    match use_case.get(&note_id).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

/// 软删除笔记
pub async fn delete_note<NR, CR>(
    Extension(note_repo): Extension<Arc<NR>>,
    Extension(comment_repo): Extension<Arc<CR>>,
    Path(note_id): Path<String>,
) -> impl IntoResponse
where
    NR: NoteRepository + 'static,
    CR: CommentRepository + 'static,
{
    let use_case = NoteUseCase::new(note_repo, comment_repo);
    match use_case.delete(&note_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

/// 分页获取笔记评论
pub async fn list_comments<NR, CR>(
    Extension(note_repo): Extension<Arc<NR>>,
    Extension(comment_repo): Extension<Arc<CR>>,
    Path(note_id): Path<String>,
    Query(params): Query<CommentPageParams>,
) -> impl IntoResponse
where
    NR: NoteRepository + 'static,
    CR: CommentRepository + 'static,
{
    let use_case = NoteUseCase::new(note_repo, comment_repo);
    match use_case.comments(&note_id, params).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

/// 笔记的标签变更日志，最新在前
pub async fn list_tag_logs<NR, CR>(
    Extension(note_repo): Extension<Arc<NR>>,
    Extension(comment_repo): Extension<Arc<CR>>,
    Path(note_id): Path<String>,
) -> impl IntoResponse
where
    NR: NoteRepository + 'static,
    CR: CommentRepository + 'static,
{
    let use_case = NoteUseCase::new(note_repo, comment_repo);
    match use_case.tag_logs(&note_id).await {
        Ok(logs) => (StatusCode::OK, Json(logs)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

impl From<NoteUseCaseError> for (StatusCode, String) {
    fn from(err: NoteUseCaseError) -> Self {
        match err {
            NoteUseCaseError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            NoteUseCaseError::NotFound => (StatusCode::NOT_FOUND, "Note not found".to_string()),
            NoteUseCaseError::Repository(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }
}
