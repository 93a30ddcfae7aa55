// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// 笔记实体
///
/// 以外部内容 ID (`note_id`) 唯一标识的一条爬取内容。
/// 每次重新入库都会在同一行上合并，而不是新增记录。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    /// 内部主键
    pub id: Uuid,
    /// 外部内容ID
    pub note_id: String,
    pub note_url: Option<String>,
    /// "video" 或 "normal"
    pub note_type: Option<String>,
    pub author_user_id: Option<String>,
    pub author_nickname: Option<String>,
    pub author_avatar: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// 来源标签（爬虫提供）
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
    /// 是否为首次入库
    pub is_new: bool,
    /// 仅反映最近一次对账结果
    pub is_changed: bool,
    pub is_important: bool,
    /// 软删除标记
    pub is_deleted: bool,
    /// 当前标签集合
    pub current_tags: Vec<NoteTag>,
    pub change_reason: Option<String>,
    /// 命中的业务关键词
    pub matched_keywords: Vec<String>,
    /// 命中业务关键词的评论ID
    pub important_comment_ids: Vec<String>,
    /// 上一次变更前的互动数据快照
    pub previous_stats: Option<EngagementStats>,
    pub first_crawl_time: DateTime<FixedOffset>,
    pub last_crawl_time: DateTime<FixedOffset>,
    pub crawl_count: i32,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl Note {
    /// 当前互动数据
    pub fn stats(&self) -> EngagementStats {
        EngagementStats {
            liked_count: self.liked_count,
            collected_count: self.collected_count,
            comment_count: self.comment_count,
            share_count: self.share_count,
        }
    }

    /// 用于关键词匹配的文本：标题、描述和来源标签
    pub fn searchable_text(&self) -> String {
        join_searchable(
            self.title.as_deref(),
            self.description.as_deref(),
            &self.tags,
        )
    }
}

/// 笔记标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteTag {
    /// 首次入库
    New,
    /// 互动数据发生过变化
    Changed,
}

impl fmt::Display for NoteTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NoteTag::New => write!(f, "new"),
            NoteTag::Changed => write!(f, "changed"),
        }
    }
}

impl FromStr for NoteTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(NoteTag::New),
            "changed" => Ok(NoteTag::Changed),
            _ => Err(()),
        }
    }
}

/// 互动数据（点赞、收藏、评论、分享）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementStats {
    pub liked_count: i32,
    pub collected_count: i32,
    pub comment_count: i32,
    pub share_count: i32,
}

impl EngagementStats {
    /// 与新数据逐项比较，返回形如 `liked_count: 5 -> 9` 的差异描述
    ///
    /// 顺序固定为点赞、收藏、评论、分享；没有差异时返回空列表
    pub fn diff(&self, incoming: &EngagementStats) -> Vec<String> {
        let pairs = [
            ("liked_count", self.liked_count, incoming.liked_count),
            ("collected_count", self.collected_count, incoming.collected_count),
            ("comment_count", self.comment_count, incoming.comment_count),
            ("share_count", self.share_count, incoming.share_count),
        ];

        pairs
            .iter()
            .filter(|(_, old, new)| old != new)
            .map(|(name, old, new)| format!("{}: {} -> {}", name, old, new))
            .collect()
    }
}

/// 爬虫回传的一条笔记
///
/// 线上字段名 `desc` 对应 `description`。互动数据容忍字符串形式
/// （如 `"1.2万"`），上传时间容忍 RFC3339、无时区时间和毫秒时间戳。
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ScrapedNote {
    #[validate(length(min = 10, max = 100, message = "note_id 无效"))]
    pub note_id: String,
    #[serde(default)]
    pub note_url: Option<String>,
    #[serde(default)]
    pub note_type: Option<String>,
    #[serde(default)]
    pub author_user_id: Option<String>,
    #[serde(default)]
    pub author_nickname: Option<String>,
    #[serde(default)]
    pub author_avatar: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "desc")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub upload_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub ip_location: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub liked_count: i32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub collected_count: i32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub comment_count: i32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub share_count: i32,
    #[serde(default)]
    pub video_cover: Option<String>,
    #[serde(default)]
    pub video_addr: Option<String>,
    #[serde(default)]
    pub image_list: Option<Vec<String>>,
    #[serde(default)]
    pub xsec_token: Option<String>,
}

impl ScrapedNote {
    pub fn stats(&self) -> EngagementStats {
        EngagementStats {
            liked_count: self.liked_count,
            collected_count: self.collected_count,
            comment_count: self.comment_count,
            share_count: self.share_count,
        }
    }

    pub fn searchable_text(&self) -> String {
        join_searchable(
            self.title.as_deref(),
            self.description.as_deref(),
            self.tags.as_deref().unwrap_or_default(),
        )
    }
}

fn join_searchable(title: Option<&str>, description: Option<&str>, tags: &[String]) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(tags.len() + 2);
    parts.extend(title);
    parts.extend(description);
    parts.extend(tags.iter().map(String::as_str));
    parts.join(" ")
}

/// 爬虫数据的宽松反序列化
pub(crate) mod lenient {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Int(i64),
        Float(f64),
        Text(String),
    }

    /// 互动计数：数字、数字字符串或带 `万` 后缀的字符串，null 视为 0
    pub fn count<'de, D>(deserializer: D) -> Result<i32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawCount>::deserialize(deserializer)?;
        let value = match raw {
            None => 0,
            Some(RawCount::Int(v)) => v,
            Some(RawCount::Float(v)) => v.round() as i64,
            Some(RawCount::Text(text)) => parse_count_text(&text)
                .ok_or_else(|| D::Error::custom(format!("invalid count: {}", text)))?,
        };
        Ok(value.clamp(0, i32::MAX as i64) as i32)
    }

    fn parse_count_text(text: &str) -> Option<i64> {
        let trimmed = text.trim().trim_end_matches('+');
        if trimmed.is_empty() {
            return Some(0);
        }
        if let Some(number) = trimmed.strip_suffix('万') {
            return number
                .trim()
                .parse::<f64>()
                .ok()
                .map(|v| (v * 10_000.0).round() as i64);
        }
        trimmed.parse::<i64>().ok()
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTime {
        Millis(i64),
        Text(String),
    }

    /// 上传时间：RFC3339、`%Y-%m-%dT%H:%M:%S`、`%Y-%m-%d %H:%M:%S`（按 UTC）或毫秒时间戳
    pub fn datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawTime>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawTime::Millis(ms)) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .map(|t| Some(t.fixed_offset()))
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", ms))),
            Some(RawTime::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(RawTime::Text(text)) => parse_time_text(text.trim())
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid datetime: {}", text))),
        }
    }

    /// 必填时间，格式同 [`datetime`]
    pub fn required_datetime<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        datetime(deserializer)?.ok_or_else(|| D::Error::custom("missing datetime"))
    }

    pub(crate) fn parse_time_text(text: &str) -> Option<DateTime<FixedOffset>> {
        if let Ok(t) = DateTime::parse_from_rfc3339(text) {
            return Some(t);
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
    }
}
