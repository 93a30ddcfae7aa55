// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 业务关键词
///
/// 用于判定笔记重要性和评论相关性，独立维护
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Keyword {
    pub id: Uuid,
    /// 关键词文本，全局唯一
    pub keyword: String,
    pub category: Option<String>,
    /// 权重 1-10
    pub weight: i32,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl Keyword {
    /// 创建一个启用状态的关键词
    pub fn new(
        keyword: String,
        category: Option<String>,
        weight: i32,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            keyword,
            category,
            weight,
            is_active: true,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// 大小写不敏感的子串匹配
    pub fn matches(&self, text_lower: &str) -> bool {
        let needle = self.keyword.trim().to_lowercase();
        !needle.is_empty() && text_lower.contains(&needle)
    }
}
