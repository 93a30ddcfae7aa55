// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use metrics::{counter, histogram};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, TransactionTrait,
};
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::comment::{Comment, ScrapedComment};
use crate::domain::models::note::{Note, ScrapedNote};
use crate::domain::models::webhook::IngestionBatch;
use crate::domain::repositories::RepositoryError;
use crate::domain::services::importance::{ImportanceEvaluator, ImportanceThresholds};
use crate::domain::services::ingestion_service::{
    BatchProcessResult, IngestionError, IngestionService, NoteProcessResult,
};
use crate::domain::services::reconciliation::{reconcile, ReconcileOutcome};
use crate::infrastructure::database::entities::{
    comment as comment_entity, note as note_entity, tag_change_log as log_entity,
};
use crate::infrastructure::repositories::keyword_repo_impl::load_active;

/// 事务化的入库服务
///
/// 一批数据在一个事务中处理，每条数据使用独立的保存点
#[derive(Clone)]
pub struct IngestionServiceImpl {
    db: Arc<DatabaseConnection>,
    thresholds: ImportanceThresholds,
}

impl IngestionServiceImpl {
    pub fn new(db: Arc<DatabaseConnection>, thresholds: ImportanceThresholds) -> Self {
        Self { db, thresholds }
    }
}

fn validation_error(errors: validator::ValidationErrors) -> IngestionError {
    IngestionError::Invalid(errors.to_string())
}

impl From<RepositoryError> for IngestionError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(e) => IngestionError::Database(e),
            other => IngestionError::Invalid(other.to_string()),
        }
    }
}

/// 在保存点内对账并写入一条笔记
async fn ingest_note(
    txn: &DatabaseTransaction,
    incoming: &ScrapedNote,
    evaluator: &ImportanceEvaluator,
) -> Result<(ReconcileOutcome, NoteProcessResult), IngestionError> {
    incoming.validate().map_err(validation_error)?;

    let savepoint = txn.begin().await?;

    // 包括已软删除的记录，避免唯一键冲突
    let existing = note_entity::Entity::find()
        .filter(note_entity::Column::NoteId.eq(incoming.note_id.as_str()))
        .one(&savepoint)
        .await?
        .map(Note::from);
    let is_update = existing.is_some();

    let now = Utc::now().fixed_offset();
    let result = reconcile(existing, incoming, evaluator, now);
    let active = note_entity::ActiveModel::from(&result.note);
    if is_update {
        active.update(&savepoint).await?;
    } else {
        active.insert(&savepoint).await?;
    }
    if let Some(log) = &result.tag_log {
        log_entity::ActiveModel::from(log).insert(&savepoint).await?;
    }

    savepoint.commit().await?;

    counter!("notes_ingested_total", "outcome" => result.outcome.as_str()).increment(1);
    debug!(
        note_id = %result.note.note_id,
        outcome = result.outcome.as_str(),
        "Note reconciled"
    );

    let detail = NoteProcessResult {
        outcome: result.outcome.as_str().to_string(),
        is_important: result.note.is_important,
        change_reason: result.note.change_reason,
        matched_keywords: result.note.matched_keywords,
        note_id: result.note.note_id,
    };
    Ok((result.outcome, detail))
}

/// 在保存点内写入一条评论，并把相关评论挂到所属笔记上
async fn ingest_comment(
    txn: &DatabaseTransaction,
    incoming: &ScrapedComment,
    evaluator: &ImportanceEvaluator,
) -> Result<(), IngestionError> {
    incoming.validate().map_err(validation_error)?;

    let savepoint = txn.begin().await?;

    let parent = note_entity::Entity::find()
        .filter(note_entity::Column::NoteId.eq(incoming.note_id.as_str()))
        .one(&savepoint)
        .await?
        .ok_or_else(|| IngestionError::MissingNote(incoming.note_id.clone()))?;

    let relevance = evaluator.evaluate_comment(incoming.content.as_deref());
    let now = Utc::now().fixed_offset();

    let existing = comment_entity::Entity::find()
        .filter(comment_entity::Column::CommentId.eq(incoming.comment_id.as_str()))
        .one(&savepoint)
        .await?;

    let comment = Comment {
        id: existing.as_ref().map(|m| m.id).unwrap_or_else(Uuid::new_v4),
        comment_id: incoming.comment_id.clone(),
        note_id: incoming.note_id.clone(),
        commenter_user_id: incoming.commenter_user_id.clone(),
        commenter_nickname: incoming.commenter_nickname.clone(),
        content: incoming.content.clone(),
        like_count: incoming.like_count,
        upload_time: incoming.upload_time,
        ip_location: incoming.ip_location.clone(),
        parent_comment_id: incoming.parent_comment_id.clone(),
        root_comment_id: incoming.root_comment_id.clone(),
        contains_business_keywords: relevance.is_relevant(),
        business_keywords_found: relevance.keywords_found.clone(),
        importance_score: relevance.score,
        created_at: existing.as_ref().map(|m| m.created_at).unwrap_or(now),
        updated_at: now,
    };

    let active = comment_entity::ActiveModel::from(&comment);
    if existing.is_some() {
        active.update(&savepoint).await?;
    } else {
        active.insert(&savepoint).await?;
    }

    if relevance.is_relevant() {
        let mut note = Note::from(parent);
        if !note.important_comment_ids.contains(&comment.comment_id) {
            note.important_comment_ids.push(comment.comment_id.clone());
            note.updated_at = now;
            note_entity::ActiveModel::from(&note)
                .update(&savepoint)
                .await?;
        }
    }

    savepoint.commit().await?;
    Ok(())
}

fn record_failure(result: &mut BatchProcessResult, id: &str, err: IngestionError) {
    warn!("Failed to ingest item {}: {}", id, err);
    counter!("ingest_item_errors_total").increment(1);
    result.errors.push(format!("{}: {}", id, err));
}

#[async_trait]
impl IngestionService for IngestionServiceImpl {
    async fn ingest(&self, batch: IngestionBatch) -> Result<BatchProcessResult, IngestionError> {
        let started = Instant::now();
        let mut result = BatchProcessResult {
            errors: batch.rejected.clone(),
            ..Default::default()
        };

        let txn = self.db.begin().await?;
        let keywords = load_active(&txn).await?;
        let evaluator = ImportanceEvaluator::new(keywords, self.thresholds);

        for note in &batch.notes {
            match ingest_note(&txn, note, &evaluator).await {
                Ok((outcome, detail)) => {
                    result.total_processed += 1;
                    match outcome {
                        ReconcileOutcome::Created => result.new_notes += 1,
                        ReconcileOutcome::Changed => result.changed_notes += 1,
                        ReconcileOutcome::Unchanged => {}
                    }
                    if detail.is_important {
                        result.important_notes += 1;
                    }
                    result.details.push(detail);
                }
                Err(IngestionError::Database(e)) if is_connection_failure(&e) => {
                    return Err(IngestionError::Database(e));
                }
                Err(err) => record_failure(&mut result, &note.note_id, err),
            }
        }

        for comment in &batch.comments {
            match ingest_comment(&txn, comment, &evaluator).await {
                Ok(()) => result.comments_processed += 1,
                Err(IngestionError::Database(e)) if is_connection_failure(&e) => {
                    return Err(IngestionError::Database(e));
                }
                Err(err) => record_failure(&mut result, &comment.comment_id, err),
            }
        }

        txn.commit().await?;

        histogram!("ingest_batch_duration_seconds").record(started.elapsed().as_secs_f64());
        info!(
            kind = %batch.kind,
            source = batch.source.as_deref().unwrap_or("-"),
            processed = result.total_processed,
            new_notes = result.new_notes,
            changed_notes = result.changed_notes,
            important_notes = result.important_notes,
            comments = result.comments_processed,
            errors = result.errors.len(),
            "Batch ingested"
        );

        Ok(result)
    }
}

/// 连接层面的错误无法被保存点隔离，需要整批回滚
fn is_connection_failure(err: &sea_orm::DbErr) -> bool {
    matches!(
        err,
        sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_)
    )
}

#[cfg(test)]
#[path = "ingestion_service_impl_test.rs"]
mod tests;
