// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::keyword::Keyword;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use uuid::Uuid;

/// 关键词列表查询参数
#[derive(Debug, Clone)]
pub struct KeywordQuery {
    pub skip: u64,
    pub limit: u64,
    pub category: Option<String>,
    pub active_only: bool,
    /// 关键词文本模糊匹配
    pub search: Option<String>,
}

impl Default for KeywordQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
            category: None,
            active_only: true,
            search: None,
        }
    }
}

/// 关键词统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordStats {
    pub total: u64,
    pub active: u64,
    pub category_stats: BTreeMap<String, u64>,
    /// 权重 -> 数量，只包含数量大于 0 的权重
    pub weight_stats: BTreeMap<i32, u64>,
}

/// 关键词仓库特质
#[async_trait]
pub trait KeywordRepository: Send + Sync {
    /// 创建关键词，文本重复时返回 `AlreadyExists`
    async fn create(&self, keyword: &Keyword) -> Result<Keyword, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Keyword>, RepositoryError>;
    /// 按文本精确查找
    async fn find_by_text(&self, text: &str) -> Result<Option<Keyword>, RepositoryError>;
    async fn update(&self, keyword: &Keyword) -> Result<Keyword, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
    /// 列表查询，按权重倒序、分类、关键词排序，返回当前页和总数
    async fn list(&self, query: &KeywordQuery) -> Result<(Vec<Keyword>, u64), RepositoryError>;
    /// 所有非空分类
    async fn categories(&self) -> Result<Vec<String>, RepositoryError>;
    /// 所有启用的关键词
    async fn find_active(&self) -> Result<Vec<Keyword>, RepositoryError>;
    async fn stats(&self) -> Result<KeywordStats, RepositoryError>;
}
