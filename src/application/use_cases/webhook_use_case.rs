// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::{
    application::dto::webhook_dto::WebhookResponse,
    domain::{
        models::{
            crawl_task::{CrawlTask, DomainError},
            webhook::{DataKind, IngestionBatch, WebhookPayload, WebhookStatus},
        },
        repositories::{crawl_task_repository::CrawlTaskRepository, RepositoryError},
    },
    queue::ingestion_queue::{IngestionJob, IngestionQueue, QueueError},
};
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Error, Debug)]
pub enum WebhookUseCaseError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("{0}")]
    Queue(#[from] QueueError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// 爬虫回调处理
///
/// 根据回调状态推进关联任务，结果数据交给后台入库队列
pub struct WebhookUseCase<TR, Q> {
    task_repo: Arc<TR>,
    queue: Arc<Q>,
}

impl<TR, Q> WebhookUseCase<TR, Q>
where
    TR: CrawlTaskRepository + 'static,
    Q: IngestionQueue + 'static,
{
    pub fn new(task_repo: Arc<TR>, queue: Arc<Q>) -> Self {
        Self { task_repo, queue }
    }

    pub async fn handle(
        &self,
        payload: WebhookPayload,
    ) -> Result<WebhookResponse, WebhookUseCaseError> {
        payload
            .validate()
            .map_err(|e| WebhookUseCaseError::ValidationError(e.to_string()))?;

        counter!("webhook_received_total", "status" => payload.status.to_string()).increment(1);
        info!(
            "Webhook received: status={}, run_id={}, task_id={:?}",
            payload.status, payload.run_id, payload.task_id
        );

        let task = self.find_task(payload.task_id.as_deref()).await?;
        let task_id = task.as_ref().map(|t| t.id);

        let response = match payload.status {
            WebhookStatus::Started => {
                let run_id = payload.run_id.clone();
                self.advance(task, move |t| t.start(Some(run_id))).await?;
                WebhookResponse::received("start notification received")
            }
            WebhookStatus::Progress => {
                let progress = payload.progress;
                let run_id = payload.run_id.clone();
                self.advance(task, move |t| match progress {
                    Some(p) => t.report_progress(p),
                    None => t.start(Some(run_id)),
                })
                .await?;
                WebhookResponse::received("progress update received")
            }
            WebhookStatus::Success | WebhookStatus::Completed => match payload.data {
                Some(data) => {
                    let batch = IngestionBatch::classify(data);
                    self.accept_batch(task, task_id, batch).await?
                }
                None => {
                    self.advance(task, CrawlTask::complete).await?;
                    WebhookResponse::received("completion notice received (no data)")
                }
            },
            WebhookStatus::Error | WebhookStatus::Failed => {
                let message = payload.message.clone();
                self.advance(task, move |t| t.fail(message)).await?;
                WebhookResponse::received("error notification received")
            }
        };

        Ok(response)
    }

    async fn accept_batch(
        &self,
        task: Option<CrawlTask>,
        task_id: Option<Uuid>,
        batch: IngestionBatch,
    ) -> Result<WebhookResponse, WebhookUseCaseError> {
        let errors = (!batch.rejected.is_empty()).then(|| batch.rejected.clone());

        if batch.is_empty() {
            if batch.kind == DataKind::Unknown {
                warn!("Unknown webhook data format, nothing to ingest");
            }
            self.advance(task, CrawlTask::complete).await?;
            return Ok(WebhookResponse {
                errors,
                ..WebhookResponse::received("result received, no usable data")
            });
        }

        let count = batch.notes.len() + batch.comments.len();
        let kind = batch.kind;
        self.queue.enqueue(IngestionJob { task_id, batch })?;
        info!("Queued {} {} items for ingestion", count, kind);

        Ok(WebhookResponse {
            processed_count: Some(count),
            errors,
            ..WebhookResponse::received(format!("{} result queued for ingestion", kind))
        })
    }

    async fn find_task(
        &self,
        task_id: Option<&str>,
    ) -> Result<Option<CrawlTask>, WebhookUseCaseError> {
        let Some(raw) = task_id.filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let Ok(id) = Uuid::parse_str(raw) else {
            warn!("Webhook task_id '{}' is not a valid id", raw);
            return Ok(None);
        };

        let task = self.task_repo.find_by_id(id).await?;
        if task.is_none() {
            warn!("Webhook references unknown task {}", id);
        }
        Ok(task)
    }

    /// 应用状态转换并保存；非法转换只记录警告
    async fn advance<F>(&self, task: Option<CrawlTask>, apply: F) -> Result<(), WebhookUseCaseError>
    where
        F: FnOnce(&mut CrawlTask) -> Result<(), DomainError>,
    {
        let Some(mut task) = task else {
            return Ok(());
        };

        match apply(&mut task) {
            Ok(()) => {
                self.task_repo.update(&task).await?;
            }
            Err(e) => warn!("Ignoring webhook transition for task {}: {}", task.id, e),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "webhook_use_case_test.rs"]
mod tests;
