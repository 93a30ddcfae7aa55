// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::crawl_task_repository::CrawlTaskRepository;
use crate::domain::repositories::RepositoryError;
use crate::domain::services::ingestion_service::{
    BatchProcessResult, IngestionError, IngestionService,
};
use crate::queue::ingestion_queue::IngestionJob;
use std::sync::Arc;
use tokio::sync::mpsc::Receiver;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

/// 后台入库工作器
///
/// 按顺序消费入库队列，完成后把结果回写到关联的爬取任务
pub struct IngestionWorker<S, TR>
where
    S: IngestionService + 'static,
    TR: CrawlTaskRepository + 'static,
{
    service: Arc<S>,
    task_repo: Arc<TR>,
    receiver: Receiver<IngestionJob>,
}

impl<S, TR> IngestionWorker<S, TR>
where
    S: IngestionService + 'static,
    TR: CrawlTaskRepository + 'static,
{
    pub fn new(service: Arc<S>, task_repo: Arc<TR>, receiver: Receiver<IngestionJob>) -> Self {
        Self {
            service,
            task_repo,
            receiver,
        }
    }

    /// 运行工作器，所有发送端关闭后退出
    pub async fn run(mut self) {
        info!("Ingestion worker started");

        while let Some(job) = self.receiver.recv().await {
            self.process(job).await;
        }

        info!("Ingestion worker stopped");
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn process(&self, job: IngestionJob) {
        let IngestionJob { task_id, batch } = job;
        let result = self.service.ingest(batch).await;

        match &result {
            Ok(summary) => info!(
                "Ingested batch: {} notes, {} new, {} changed, {} errors",
                summary.total_processed,
                summary.new_notes,
                summary.changed_notes,
                summary.errors.len()
            ),
            Err(e) => error!("Batch ingestion failed: {}", e),
        }

        if let Some(task_id) = task_id {
            if let Err(e) = self.record_result(task_id, &result).await {
                error!("Failed to record ingestion result on task {}: {}", task_id, e);
            }
        }
    }

    /// 累加计数并结束任务，已结束的任务保持不变
    async fn record_result(
        &self,
        task_id: Uuid,
        result: &Result<BatchProcessResult, IngestionError>,
    ) -> Result<(), RepositoryError> {
        let Some(mut task) = self.task_repo.find_by_id(task_id).await? else {
            warn!("Ingested batch references unknown task {}", task_id);
            return Ok(());
        };

        if task.status.is_terminal() {
            warn!(
                "Task {} already {:?}, ingestion result not recorded",
                task_id, task.status
            );
            return Ok(());
        }

        let transition = match result {
            Ok(summary) => task.complete().map(|()| {
                task.accumulate(summary.counters());
                if let Some(first) = summary.errors.first() {
                    task.error_message =
                        Some(format!("{} items failed: {}", summary.errors.len(), first));
                }
            }),
            Err(e) => task.fail(format!("ingestion failed: {}", e)),
        };
        if let Err(e) = transition {
            warn!("Task {} keeps its state after ingestion: {}", task_id, e);
            return Ok(());
        }

        self.task_repo.update(&task).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "ingestion_worker_test.rs"]
mod tests;
