// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::comment::Comment;
use crate::domain::models::note::{lenient::parse_time_text, EngagementStats, Note, NoteTag};
use crate::domain::repositories::note_repository::{
    FilterOperator, NoteField, NoteFilter, NoteQuery, NoteSort,
};

/// 笔记搜索参数
#[derive(Debug, Default, Deserialize, Validate)]
pub struct NoteSearchParams {
    /// 标题和描述中的关键词
    pub keyword: Option<String>,
    pub is_new: Option<bool>,
    pub is_changed: Option<bool>,
    pub is_important: Option<bool>,
    pub author_user_id: Option<String>,
    /// 首次爬取时间下界，RFC3339 或 `YYYY-MM-DD`
    pub date_from: Option<String>,
    /// 首次爬取时间上界，只有日期时包含当天
    pub date_to: Option<String>,
    /// JSON 编码的筛选列表 `[{id, value, operator, variant}]`
    pub filters: Option<String>,
    /// JSON 编码的排序列表 `[{id, desc}]`
    pub sort: Option<String>,
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawFilter {
    id: String,
    #[serde(default)]
    value: Value,
    operator: String,
}

#[derive(Debug, Deserialize)]
struct RawSort {
    id: String,
    #[serde(default)]
    desc: bool,
}

/// 解析筛选条件
///
/// JSON 格式错误时整体忽略；未知字段或操作符的条目单独忽略
pub fn parse_filters(raw: &str) -> Vec<NoteFilter> {
    let entries: Vec<Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Ignoring malformed filters: {}", e);
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RawFilter>(entry).ok())
        .filter_map(|raw| {
            let field = NoteField::parse(&raw.id)?;
            let operator: FilterOperator =
                serde_json::from_value(Value::String(raw.operator)).ok()?;
            Some(NoteFilter {
                field,
                operator,
                value: raw.value,
            })
        })
        .collect()
}

/// 解析排序条件，规则同 [`parse_filters`]
pub fn parse_sorts(raw: &str) -> Vec<NoteSort> {
    let entries: Vec<Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Ignoring malformed sort: {}", e);
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RawSort>(entry).ok())
        .filter_map(|raw| {
            NoteField::parse(&raw.id).map(|field| NoteSort {
                field,
                desc: raw.desc,
            })
        })
        .collect()
}

fn parse_bound(text: &str, end_of_day: bool) -> Result<DateTime<FixedOffset>, String> {
    let text = text.trim();
    let parsed = parse_time_text(text).ok_or_else(|| format!("invalid date: {}", text))?;
    let date_only = NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok();
    if date_only && end_of_day {
        Ok(parsed + Duration::days(1) - Duration::microseconds(1))
    } else {
        Ok(parsed)
    }
}

impl NoteSearchParams {
    pub const DEFAULT_LIMIT: u64 = 50;

    /// 转换为仓库查询，日期格式错误时返回描述
    pub fn into_query(self) -> Result<NoteQuery, String> {
        let date_from = self
            .date_from
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_bound(s, false))
            .transpose()?;
        let date_to = self
            .date_to
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_bound(s, true))
            .transpose()?;

        Ok(NoteQuery {
            keyword: self.keyword,
            is_new: self.is_new,
            is_changed: self.is_changed,
            is_important: self.is_important,
            author_user_id: self.author_user_id.filter(|a| !a.is_empty()),
            date_from,
            date_to,
            filters: self.filters.as_deref().map(parse_filters).unwrap_or_default(),
            sorts: self.sort.as_deref().map(parse_sorts).unwrap_or_default(),
            limit: self.limit.unwrap_or(Self::DEFAULT_LIMIT),
            offset: self.offset.unwrap_or(0),
        })
    }
}

/// 笔记响应，描述字段在线上格式中叫 `desc`
#[derive(Debug, Clone, Serialize)]
pub struct NoteResponse {
    pub id: Uuid,
    pub note_id: String,
    pub note_url: Option<String>,
    pub note_type: Option<String>,
    pub author_user_id: Option<String>,
    pub author_nickname: Option<String>,
    pub author_avatar: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "desc")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub upload_time: Option<DateTime<FixedOffset>>,
    pub ip_location: Option<String>,
    pub liked_count: i32,
    pub collected_count: i32,
    pub comment_count: i32,
    pub share_count: i32,
    pub video_cover: Option<String>,
    pub video_addr: Option<String>,
    pub image_list: Vec<String>,
    pub is_new: bool,
    pub is_changed: bool,
    pub is_important: bool,
    pub current_tags: Vec<NoteTag>,
    pub change_reason: Option<String>,
    pub matched_keywords: Vec<String>,
    pub important_comment_ids: Vec<String>,
    pub previous_stats: Option<EngagementStats>,
    pub first_crawl_time: DateTime<FixedOffset>,
    pub last_crawl_time: DateTime<FixedOffset>,
    pub crawl_count: i32,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            note_id: note.note_id,
            note_url: note.note_url,
            note_type: note.note_type,
            author_user_id: note.author_user_id,
            author_nickname: note.author_nickname,
            author_avatar: note.author_avatar,
            title: note.title,
            description: note.description,
            tags: note.tags,
            upload_time: note.upload_time,
            ip_location: note.ip_location,
            liked_count: note.liked_count,
            collected_count: note.collected_count,
            comment_count: note.comment_count,
            share_count: note.share_count,
            video_cover: note.video_cover,
            video_addr: note.video_addr,
            image_list: note.image_list,
            is_new: note.is_new,
            is_changed: note.is_changed,
            is_important: note.is_important,
            current_tags: note.current_tags,
            change_reason: note.change_reason,
            matched_keywords: note.matched_keywords,
            important_comment_ids: note.important_comment_ids,
            previous_stats: note.previous_stats,
            first_crawl_time: note.first_crawl_time,
            last_crawl_time: note.last_crawl_time,
            crawl_count: note.crawl_count,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// 评论分页参数
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CommentPageParams {
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct CommentPageResponse {
    pub comments: Vec<Comment>,
    pub total: u64,
}
