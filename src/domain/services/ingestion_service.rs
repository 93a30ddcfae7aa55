// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

use crate::domain::models::crawl_task::TaskCounters;
use crate::domain::models::webhook::IngestionBatch;

/// 单条笔记的入库结果
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NoteProcessResult {
    pub note_id: String,
    /// created / changed / unchanged
    pub outcome: String,
    pub is_important: bool,
    pub change_reason: Option<String>,
    pub matched_keywords: Vec<String>,
}

/// 批量入库结果
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BatchProcessResult {
    pub total_processed: usize,
    pub new_notes: usize,
    pub changed_notes: usize,
    pub important_notes: usize,
    pub comments_processed: usize,
    /// 单条失败的描述，不影响其余条目提交
    pub errors: Vec<String>,
    pub details: Vec<NoteProcessResult>,
}

impl BatchProcessResult {
    /// 转换为任务计数
    pub fn counters(&self) -> TaskCounters {
        TaskCounters {
            total_crawled: self.total_processed as i32,
            new_notes: self.new_notes as i32,
            changed_notes: self.changed_notes as i32,
            important_notes: self.important_notes as i32,
        }
    }
}

/// 入库错误类型
#[derive(Error, Debug)]
pub enum IngestionError {
    /// 数据库错误，连接类错误会中止整批
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// 评论所属笔记不存在
    #[error("Parent note not found: {0}")]
    MissingNote(String),

    /// 单条数据校验失败
    #[error("Invalid item: {0}")]
    Invalid(String),
}

/// 入库服务特质
///
/// 一批数据在单个事务内处理，每条数据使用独立的保存点
#[async_trait]
pub trait IngestionService: Send + Sync {
    /// 入库一批笔记及评论
    ///
    /// 单条失败记录在结果的 `errors` 中；只有事务级错误才返回 `Err`
    async fn ingest(&self, batch: IngestionBatch) -> Result<BatchProcessResult, IngestionError>;
}
