// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::note::lenient;

/// 评论实体
///
/// 隶属于唯一一条笔记，按 `comment_id` 去重
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub comment_id: String,
    /// 所属笔记的外部ID
    pub note_id: String,
    pub commenter_user_id: Option<String>,
    pub commenter_nickname: Option<String>,
    pub content: Option<String>,
    pub like_count: i32,
    pub upload_time: Option<DateTime<FixedOffset>>,
    pub ip_location: Option<String>,
    pub parent_comment_id: Option<String>,
    pub root_comment_id: Option<String>,
    /// 是否包含业务关键词
    pub contains_business_keywords: bool,
    pub business_keywords_found: Vec<String>,
    /// 命中关键词的权重之和
    pub importance_score: i32,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// 爬虫回传的一条评论
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ScrapedComment {
    #[validate(length(min = 10, max = 100, message = "comment_id 无效"))]
    pub comment_id: String,
    #[validate(length(min = 10, max = 100, message = "note_id 无效"))]
    pub note_id: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub like_count: i32,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub upload_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub ip_location: Option<String>,
    #[serde(default)]
    pub commenter_user_id: Option<String>,
    #[serde(default)]
    pub commenter_nickname: Option<String>,
    #[serde(default)]
    pub parent_comment_id: Option<String>,
    #[serde(default)]
    pub root_comment_id: Option<String>,
}
