// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::note::Note;
use crate::domain::models::tag_change_log::TagChangeLog;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 可用于高级筛选和排序的笔记字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    NoteId,
    NoteType,
    Title,
    Description,
    AuthorUserId,
    AuthorNickname,
    IpLocation,
    LikedCount,
    CollectedCount,
    CommentCount,
    ShareCount,
    CrawlCount,
    IsNew,
    IsChanged,
    IsImportant,
    UploadTime,
    FirstCrawlTime,
    LastCrawlTime,
    CreatedAt,
    UpdatedAt,
}

impl NoteField {
    /// 按线上字段名解析，未知字段返回 None
    pub fn parse(id: &str) -> Option<Self> {
        let field = match id {
            "note_id" => NoteField::NoteId,
            "note_type" => NoteField::NoteType,
            "title" => NoteField::Title,
            "desc" | "description" => NoteField::Description,
            "author_user_id" => NoteField::AuthorUserId,
            "author_nickname" => NoteField::AuthorNickname,
            "ip_location" => NoteField::IpLocation,
            "liked_count" => NoteField::LikedCount,
            "collected_count" => NoteField::CollectedCount,
            "comment_count" => NoteField::CommentCount,
            "share_count" => NoteField::ShareCount,
            "crawl_count" => NoteField::CrawlCount,
            "is_new" => NoteField::IsNew,
            "is_changed" => NoteField::IsChanged,
            "is_important" => NoteField::IsImportant,
            "upload_time" => NoteField::UploadTime,
            "first_crawl_time" => NoteField::FirstCrawlTime,
            "last_crawl_time" => NoteField::LastCrawlTime,
            "created_at" => NoteField::CreatedAt,
            "updated_at" => NoteField::UpdatedAt,
            _ => return None,
        };
        Some(field)
    }
}

/// 筛选操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "eq")]
    Eq,
    #[serde(rename = "ne")]
    Ne,
    #[serde(rename = "iLike")]
    ILike,
    #[serde(rename = "notILike")]
    NotILike,
    #[serde(rename = "gt")]
    Gt,
    #[serde(rename = "gte")]
    Gte,
    #[serde(rename = "lt")]
    Lt,
    #[serde(rename = "lte")]
    Lte,
    #[serde(rename = "isEmpty")]
    IsEmpty,
    #[serde(rename = "isNotEmpty")]
    IsNotEmpty,
    #[serde(rename = "inArray")]
    InArray,
    #[serde(rename = "notInArray")]
    NotInArray,
}

/// 单个筛选条件
#[derive(Debug, Clone, PartialEq)]
pub struct NoteFilter {
    pub field: NoteField,
    pub operator: FilterOperator,
    pub value: Value,
}

/// 排序条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteSort {
    pub field: NoteField,
    pub desc: bool,
}

/// 笔记查询参数
#[derive(Debug, Clone, Default)]
pub struct NoteQuery {
    /// 在标题和描述中大小写不敏感搜索
    pub keyword: Option<String>,
    pub is_new: Option<bool>,
    pub is_changed: Option<bool>,
    pub is_important: Option<bool>,
    pub author_user_id: Option<String>,
    /// 首次爬取时间下界
    pub date_from: Option<DateTime<FixedOffset>>,
    pub date_to: Option<DateTime<FixedOffset>>,
    pub filters: Vec<NoteFilter>,
    /// 为空时按 last_crawl_time 倒序
    pub sorts: Vec<NoteSort>,
    pub limit: u64,
    pub offset: u64,
}

/// 笔记统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteStats {
    pub total_notes: u64,
    pub new_notes: u64,
    pub changed_notes: u64,
    pub important_notes: u64,
    pub today_crawled: u64,
}

/// 笔记仓库特质
///
/// 所有查询均排除已软删除的笔记。笔记的写入由入库服务在事务中完成。
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// 根据外部ID查找笔记
    async fn find_by_note_id(&self, note_id: &str) -> Result<Option<Note>, RepositoryError>;
    /// 条件搜索
    async fn search(&self, query: &NoteQuery) -> Result<Vec<Note>, RepositoryError>;
    /// 汇总统计，`today_start` 为当日零点
    async fn stats(&self, today_start: DateTime<FixedOffset>) -> Result<NoteStats, RepositoryError>;
    /// 软删除
    async fn soft_delete(&self, note_id: &str) -> Result<(), RepositoryError>;
    /// 标签变更日志，最新在前
    async fn find_tag_logs(&self, note_id: &str) -> Result<Vec<TagChangeLog>, RepositoryError>;
}
