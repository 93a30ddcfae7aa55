// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::crawl_task::{CrawlTask, TaskStatus};
use crate::domain::repositories::crawl_task_repository::{CrawlTaskQuery, CrawlTaskRepository};
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::crawl_task as task_entity;
use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// 爬取任务仓库实现
#[derive(Clone)]
pub struct CrawlTaskRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl CrawlTaskRepositoryImpl {
    /// 创建新的任务仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<task_entity::Model> for CrawlTask {
    fn from(model: task_entity::Model) -> Self {
        Self {
            id: model.id,
            task_name: model.task_name,
            keyword: model.keyword,
            status: model.status.parse().unwrap_or_default(),
            target_count: model.target_count,
            sort_type: model.sort_type,
            cookies: model.cookies,
            webhook_url: model.webhook_url,
            progress: model.progress,
            run_id: model.run_id,
            total_crawled: model.total_crawled,
            new_notes: model.new_notes,
            changed_notes: model.changed_notes,
            important_notes: model.important_notes,
            error_message: model.error_message,
            scheduled_time: model.scheduled_time,
            started_at: model.started_at,
            finished_at: model.finished_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&CrawlTask> for task_entity::ActiveModel {
    fn from(task: &CrawlTask) -> Self {
        Self {
            id: Set(task.id),
            task_name: Set(task.task_name.clone()),
            keyword: Set(task.keyword.clone()),
            target_count: Set(task.target_count),
            sort_type: Set(task.sort_type),
            cookies: Set(task.cookies.clone()),
            status: Set(task.status.to_string()),
            progress: Set(task.progress),
            run_id: Set(task.run_id.clone()),
            webhook_url: Set(task.webhook_url.clone()),
            scheduled_time: Set(task.scheduled_time),
            started_at: Set(task.started_at),
            finished_at: Set(task.finished_at),
            total_crawled: Set(task.total_crawled),
            new_notes: Set(task.new_notes),
            changed_notes: Set(task.changed_notes),
            important_notes: Set(task.important_notes),
            error_message: Set(task.error_message.clone()),
            created_at: Set(task.created_at),
            updated_at: Set(task.updated_at),
        }
    }
}

#[async_trait]
impl CrawlTaskRepository for CrawlTaskRepositoryImpl {
    async fn create(&self, task: &CrawlTask) -> Result<CrawlTask, RepositoryError> {
        let model = task_entity::ActiveModel::from(task)
            .insert(self.db.as_ref())
            .await?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CrawlTask>, RepositoryError> {
        let model = task_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, task: &CrawlTask) -> Result<CrawlTask, RepositoryError> {
        task_entity::Entity::find_by_id(task.id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let model = task_entity::ActiveModel::from(task)
            .update(self.db.as_ref())
            .await?;
        Ok(model.into())
    }

    async fn query(
        &self,
        query: &CrawlTaskQuery,
    ) -> Result<(Vec<CrawlTask>, u64), RepositoryError> {
        let mut select = task_entity::Entity::find();

        if let Some(status) = query.status {
            select = select.filter(task_entity::Column::Status.eq(status.to_string()));
        }
        if let Some(keyword) = query.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(task_entity::Column::Keyword)))
                    .like(format!("%{}%", keyword.to_lowercase())),
            );
        }

        let total = select.clone().count(self.db.as_ref()).await?;
        let models = select
            .order_by_desc(task_entity::Column::CreatedAt)
            .offset(query.offset)
            .limit(query.limit)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(CrawlTask::from).collect(), total))
    }

    async fn count_by_status(&self) -> Result<BTreeMap<TaskStatus, u64>, RepositoryError> {
        let mut counts = BTreeMap::new();
        for status in TaskStatus::all() {
            let count = task_entity::Entity::find()
                .filter(task_entity::Column::Status.eq(status.to_string()))
                .count(self.db.as_ref())
                .await?;
            counts.insert(status, count);
        }
        Ok(counts)
    }
}
