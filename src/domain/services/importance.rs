// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ImportanceSettings;
use crate::domain::models::keyword::Keyword;
use crate::domain::models::note::EngagementStats;

/// 互动数据阈值，超过任一阈值即视为重要
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportanceThresholds {
    pub liked: i32,
    pub comment: i32,
    pub collected: i32,
}

impl Default for ImportanceThresholds {
    fn default() -> Self {
        Self {
            liked: 1000,
            comment: 100,
            collected: 500,
        }
    }
}

impl From<&ImportanceSettings> for ImportanceThresholds {
    fn from(settings: &ImportanceSettings) -> Self {
        Self {
            liked: settings.liked_threshold,
            comment: settings.comment_threshold,
            collected: settings.collected_threshold,
        }
    }
}

/// 笔记重要性判定结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportanceVerdict {
    pub is_important: bool,
    /// 命中的关键词原文
    pub matched_keywords: Vec<String>,
}

/// 评论相关性判定结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentRelevance {
    pub keywords_found: Vec<String>,
    /// 命中关键词权重之和
    pub score: i32,
}

impl CommentRelevance {
    pub fn is_relevant(&self) -> bool {
        !self.keywords_found.is_empty()
    }
}

/// 重要性判定器
///
/// 持有一份启用关键词的快照，判定过程不访问数据库
#[derive(Debug, Clone, Default)]
pub struct ImportanceEvaluator {
    keywords: Vec<Keyword>,
    thresholds: ImportanceThresholds,
}

impl ImportanceEvaluator {
    /// 创建判定器，未启用的关键词会被忽略
    pub fn new(keywords: Vec<Keyword>, thresholds: ImportanceThresholds) -> Self {
        let keywords = keywords.into_iter().filter(|k| k.is_active).collect();
        Self {
            keywords,
            thresholds,
        }
    }

    /// 判定笔记是否重要
    ///
    /// # 参数
    ///
    /// * `text` - 标题、描述和来源标签拼接的文本
    /// * `stats` - 互动数据
    pub fn evaluate_note(&self, text: &str, stats: &EngagementStats) -> ImportanceVerdict {
        let matched_keywords = self.matching_keywords(text);
        let engagement_hit = stats.liked_count > self.thresholds.liked
            || stats.comment_count > self.thresholds.comment
            || stats.collected_count > self.thresholds.collected;

        ImportanceVerdict {
            is_important: !matched_keywords.is_empty() || engagement_hit,
            matched_keywords: matched_keywords
                .into_iter()
                .map(|k| k.keyword.clone())
                .collect(),
        }
    }

    /// 判定评论与业务的相关性
    pub fn evaluate_comment(&self, content: Option<&str>) -> CommentRelevance {
        let matched = self.matching_keywords(content.unwrap_or_default());
        CommentRelevance {
            score: matched.iter().map(|k| k.weight).sum(),
            keywords_found: matched.into_iter().map(|k| k.keyword.clone()).collect(),
        }
    }

    fn matching_keywords(&self, text: &str) -> Vec<&Keyword> {
        if text.is_empty() {
            return Vec::new();
        }
        let lowered = text.to_lowercase();
        self.keywords.iter().filter(|k| k.matches(&lowered)).collect()
    }
}

#[cfg(test)]
#[path = "importance_test.rs"]
mod tests;
