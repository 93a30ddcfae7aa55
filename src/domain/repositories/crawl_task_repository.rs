// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_task::{CrawlTask, TaskStatus};
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use uuid::Uuid;

/// 任务查询参数
#[derive(Debug, Default, Clone)]
pub struct CrawlTaskQuery {
    pub status: Option<TaskStatus>,
    /// 关键词模糊匹配
    pub keyword: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

/// 爬取任务仓库特质
///
/// 定义任务数据访问接口
#[async_trait]
pub trait CrawlTaskRepository: Send + Sync {
    /// 创建新任务
    async fn create(&self, task: &CrawlTask) -> Result<CrawlTask, RepositoryError>;
    /// 根据ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CrawlTask>, RepositoryError>;
    /// 更新任务
    async fn update(&self, task: &CrawlTask) -> Result<CrawlTask, RepositoryError>;
    /// 分页查询，最新创建的在前
    async fn query(&self, query: &CrawlTaskQuery) -> Result<(Vec<CrawlTask>, u64), RepositoryError>;
    /// 按状态计数
    async fn count_by_status(&self) -> Result<BTreeMap<TaskStatus, u64>, RepositoryError>;
}
