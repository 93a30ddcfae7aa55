// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::{
    application::dto::task_dto::{
        TaskActionResponse, TaskCreateDto, TaskListParams, TaskListResponse, TaskStatsResponse,
        TaskUpdateDto, TriggerCrawlDto,
    },
    domain::{
        models::crawl_task::{CrawlTask, DomainError, TaskStatus},
        repositories::{
            crawl_task_repository::{CrawlTaskQuery, CrawlTaskRepository},
            RepositoryError,
        },
        services::dispatch_service::{CrawlDispatcher, DispatchError, DispatchRequest},
    },
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

#[derive(Error, Debug)]
pub enum TaskUseCaseError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Task not found")]
    NotFound,
    #[error("{0}")]
    Conflict(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repository(#[source] RepositoryError),
    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

impl From<RepositoryError> for TaskUseCaseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => TaskUseCaseError::NotFound,
            other => TaskUseCaseError::Repository(other),
        }
    }
}

/// 爬取任务管理与触发
pub struct TaskUseCase<TR, D> {
    repo: Arc<TR>,
    dispatcher: Arc<D>,
    /// 任务未指定回调地址时使用
    default_webhook_url: Option<String>,
}

impl<TR, D> TaskUseCase<TR, D>
where
    TR: CrawlTaskRepository + 'static,
    D: CrawlDispatcher + 'static,
{
    pub fn new(repo: Arc<TR>, dispatcher: Arc<D>, default_webhook_url: Option<String>) -> Self {
        Self {
            repo,
            dispatcher,
            default_webhook_url,
        }
    }

    pub async fn create(&self, dto: TaskCreateDto) -> Result<CrawlTask, TaskUseCaseError> {
        dto.validate()
            .map_err(|e| TaskUseCaseError::ValidationError(e.to_string()))?;

        let mut task = CrawlTask::new(dto.task_name, dto.keyword, dto.target_count, dto.sort_type);
        task.cookies = dto.cookies;
        task.webhook_url = dto.webhook_url;
        task.scheduled_time = dto.scheduled_time;

        let created = self.repo.create(&task).await?;
        info!("Created crawl task {} for '{}'", created.id, created.keyword);
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<CrawlTask, TaskUseCaseError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(TaskUseCaseError::NotFound)
    }

    pub async fn list(&self, params: TaskListParams) -> Result<TaskListResponse, TaskUseCaseError> {
        params
            .validate()
            .map_err(|e| TaskUseCaseError::ValidationError(e.to_string()))?;

        let page = params.page.unwrap_or(1);
        let size = params.size.unwrap_or(10);
        let query = CrawlTaskQuery {
            status: params.status,
            keyword: params.keyword,
            limit: size,
            offset: (page - 1) * size,
        };

        let (tasks, total) = self.repo.query(&query).await?;
        Ok(TaskListResponse {
            tasks,
            total,
            page,
            size,
        })
    }

    pub async fn stats(&self) -> Result<TaskStatsResponse, TaskUseCaseError> {
        let counts = self.repo.count_by_status().await?;
        let count = |status| counts.get(&status).copied().unwrap_or(0);

        Ok(TaskStatsResponse {
            total_tasks: counts.values().sum(),
            pending_tasks: count(TaskStatus::Pending),
            running_tasks: count(TaskStatus::Running),
            completed_tasks: count(TaskStatus::Completed),
            failed_tasks: count(TaskStatus::Failed),
        })
    }

    /// 重命名、推进状态或记录错误信息
    pub async fn update(
        &self,
        id: Uuid,
        dto: TaskUpdateDto,
    ) -> Result<CrawlTask, TaskUseCaseError> {
        dto.validate()
            .map_err(|e| TaskUseCaseError::ValidationError(e.to_string()))?;

        let mut task = self.get(id).await?;
        if let Some(name) = dto.task_name {
            task.task_name = name;
        }
        if let Some(message) = dto.error_message {
            task.error_message = Some(message);
        }
        if let Some(status) = dto.status {
            if status != task.status {
                task.transition_to(status)?;
            }
        }
        task.updated_at = chrono::Utc::now().into();

        Ok(self.repo.update(&task).await?)
    }

    /// 取消未结束的任务
    pub async fn cancel(&self, id: Uuid) -> Result<CrawlTask, TaskUseCaseError> {
        let mut task = self.get(id).await?;
        task.cancel()?;
        let task = self.repo.update(&task).await?;
        info!("Cancelled crawl task {}", id);
        Ok(task)
    }

    /// 触发一个已存在的 pending 任务
    pub async fn trigger(&self, id: Uuid) -> Result<TaskActionResponse, TaskUseCaseError> {
        let task = self.get(id).await?;
        if task.status != TaskStatus::Pending {
            return Err(DomainError::InvalidStateTransition {
                from: task.status,
                to: TaskStatus::Running,
            }
            .into());
        }
        self.dispatch(task).await
    }

    /// 创建任务并立即触发
    pub async fn trigger_crawl(
        &self,
        dto: TriggerCrawlDto,
    ) -> Result<TaskActionResponse, TaskUseCaseError> {
        dto.validate()
            .map_err(|e| TaskUseCaseError::ValidationError(e.to_string()))?;

        let mut task = CrawlTask::new(dto.task_name, dto.keyword, dto.target_count, dto.sort_type);
        task.cookies = dto.cookies;
        task.webhook_url = Some(dto.webhook_url);

        let task = self.repo.create(&task).await?;
        self.dispatch(task).await
    }

    async fn dispatch(&self, mut task: CrawlTask) -> Result<TaskActionResponse, TaskUseCaseError> {
        let webhook_url = task
            .webhook_url
            .clone()
            .or_else(|| self.default_webhook_url.clone())
            .ok_or_else(|| {
                TaskUseCaseError::ValidationError(
                    "webhook_url is required when no public webhook URL is configured".to_string(),
                )
            })?;

        let request = DispatchRequest {
            task_id: task.id,
            query: task.keyword.clone(),
            num: task.target_count,
            sort_type: task.sort_type,
            cookies: task.cookies.clone(),
            webhook_url,
        };

        match self.dispatcher.dispatch(&request).await {
            Ok(receipt) => {
                task.start(None)?;
                self.repo.update(&task).await?;
                info!("Crawl task {} dispatched", task.id);
                Ok(TaskActionResponse {
                    success: true,
                    message: "crawl task dispatched".to_string(),
                    task_id: Some(task.id.to_string()),
                    github_run_url: Some(receipt.run_url),
                })
            }
            Err(err) => {
                error!("Failed to dispatch crawl task {}: {}", task.id, err);
                task.fail(err.to_string())?;
                self.repo.update(&task).await?;
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "task_use_case_test.rs"]
mod tests;
