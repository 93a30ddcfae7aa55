// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::{
    application::dto::note_dto::{
        CommentPageParams, CommentPageResponse, NoteResponse, NoteSearchParams,
    },
    domain::{
        models::tag_change_log::TagChangeLog,
        repositories::{
            comment_repository::CommentRepository,
            note_repository::{NoteRepository, NoteStats},
            RepositoryError,
        },
    },
};
use chrono::{NaiveTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use validator::Validate;

#[derive(Error, Debug)]
pub enum NoteUseCaseError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Note not found")]
    NotFound,
    #[error("Repository error: {0}")]
    Repository(#[source] RepositoryError),
}

impl From<RepositoryError> for NoteUseCaseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => NoteUseCaseError::NotFound,
            other => NoteUseCaseError::Repository(other),
        }
    }
}

/// 笔记查询与维护
pub struct NoteUseCase<NR, CR> {
    note_repo: Arc<NR>,
    comment_repo: Arc<CR>,
}

impl<NR, CR> NoteUseCase<NR, CR>
where
    NR: NoteRepository + 'static,
    CR: CommentRepository + 'static,
{
    pub fn new(note_repo: Arc<NR>, comment_repo: Arc<CR>) -> Self {
        Self {
            note_repo,
            comment_repo,
        }
    }

    pub async fn search(
        &self,
        params: NoteSearchParams,
    ) -> Result<Vec<NoteResponse>, NoteUseCaseError> {
        params
            .validate()
            .map_err(|e| NoteUseCaseError::ValidationError(e.to_string()))?;
        let query = params
            .into_query()
            .map_err(NoteUseCaseError::ValidationError)?;

        let notes = self.note_repo.search(&query).await?;
        Ok(notes.into_iter().map(NoteResponse::from).collect())
    }

    /// 统计未删除笔记，今日以 UTC 零点为界
    pub async fn stats(&self) -> Result<NoteStats, NoteUseCaseError> {
        let midnight = Utc::now()
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc()
            .fixed_offset();
        Ok(self.note_repo.stats(midnight).await?)
    }

    pub async fn get(&self, note_id: &str) -> Result<NoteResponse, NoteUseCaseError> {
        self.note_repo
            .find_by_note_id(note_id)
            .await?
            .map(NoteResponse::from)
            .ok_or(NoteUseCaseError::NotFound)
    }

    pub async fn delete(&self, note_id: &str) -> Result<(), NoteUseCaseError> {
        self.note_repo.soft_delete(note_id).await?;
        info!("Soft-deleted note {}", note_id);
        Ok(())
    }

    pub async fn comments(
        &self,
        note_id: &str,
        params: CommentPageParams,
    ) -> Result<CommentPageResponse, NoteUseCaseError> {
        params
            .validate()
            .map_err(|e| NoteUseCaseError::ValidationError(e.to_string()))?;

        self.get(note_id).await?;
        let (comments, total) = self
            .comment_repo
            .find_by_note_id(note_id, params.limit.unwrap_or(50), params.offset.unwrap_or(0))
            .await?;
        Ok(CommentPageResponse { comments, total })
    }

    pub async fn tag_logs(&self, note_id: &str) -> Result<Vec<TagChangeLog>, NoteUseCaseError> {
        self.get(note_id).await?;
        Ok(self.note_repo.find_tag_logs(note_id).await?)
    }
}

#[cfg(test)]
#[path = "note_use_case_test.rs"]
mod tests;
