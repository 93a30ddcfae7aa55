// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use validator::Validate;

use super::comment::ScrapedComment;
use super::note::{lenient, ScrapedNote};

/// 爬虫回调状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookStatus {
    Started,
    Progress,
    Success,
    Completed,
    Error,
    Failed,
}

impl WebhookStatus {
    /// 携带最终结果的状态
    pub fn is_success(&self) -> bool {
        matches!(self, WebhookStatus::Success | WebhookStatus::Completed)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, WebhookStatus::Error | WebhookStatus::Failed)
    }
}

impl fmt::Display for WebhookStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            WebhookStatus::Started => "started",
            WebhookStatus::Progress => "progress",
            WebhookStatus::Success => "success",
            WebhookStatus::Completed => "completed",
            WebhookStatus::Error => "error",
            WebhookStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// 爬虫回调载荷
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WebhookPayload {
    pub status: WebhookStatus,
    pub message: String,
    #[serde(deserialize_with = "lenient::required_datetime")]
    pub timestamp: DateTime<FixedOffset>,
    pub run_id: String,
    /// 关联的爬取任务
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub elapsed_time: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i32>,
    /// 原始结果数据，形状见 [`IngestionBatch::classify`]
    #[serde(default)]
    pub data: Option<Value>,
}

/// 回调数据的形状
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// `{query, notes, comments?}`
    Search,
    /// 单条笔记 `{note_id, ...}`
    Note,
    /// `{user_url, notes}`
    User,
    /// 笔记数组
    List,
    Unknown,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            DataKind::Search => "search",
            DataKind::Note => "note",
            DataKind::User => "user",
            DataKind::List => "list",
            DataKind::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// 待入库的一批数据
#[derive(Debug, Clone)]
pub struct IngestionBatch {
    pub kind: DataKind,
    /// 搜索关键词或用户主页地址
    pub source: Option<String>,
    pub notes: Vec<ScrapedNote>,
    pub comments: Vec<ScrapedComment>,
    /// 无法解析的条目
    pub rejected: Vec<String>,
}

impl IngestionBatch {
    /// 根据数据形状分类并逐条解析
    ///
    /// 单条解析失败只记录到 `rejected`，不影响同批其他条目
    pub fn classify(data: Value) -> Self {
        let mut batch = IngestionBatch {
            kind: DataKind::Unknown,
            source: None,
            notes: Vec::new(),
            comments: Vec::new(),
            rejected: Vec::new(),
        };

        match data {
            Value::Array(items) => {
                batch.kind = DataKind::List;
                batch.parse_notes(items);
            }
            Value::Object(mut map) => {
                if map.contains_key("query") && map.contains_key("notes") {
                    batch.kind = DataKind::Search;
                    batch.source = map.get("query").and_then(Value::as_str).map(str::to_owned);
                    if let Some(Value::Array(items)) = map.remove("notes") {
                        batch.parse_notes(items);
                    }
                    if let Some(Value::Array(items)) = map.remove("comments") {
                        batch.parse_comments(items);
                    }
                } else if map.contains_key("note_id") {
                    batch.kind = DataKind::Note;
                    batch.parse_notes(vec![Value::Object(map)]);
                } else if map.contains_key("user_url") && map.contains_key("notes") {
                    batch.kind = DataKind::User;
                    batch.source = map
                        .get("user_url")
                        .and_then(Value::as_str)
                        .map(str::to_owned);
                    if let Some(Value::Array(items)) = map.remove("notes") {
                        batch.parse_notes(items);
                    }
                }
            }
            _ => {}
        }

        batch
    }

    fn parse_notes(&mut self, items: Vec<Value>) {
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<ScrapedNote>(item) {
                Ok(note) => self.notes.push(note),
                Err(e) => {
                    tracing::warn!("Skipping unparseable note #{}: {}", index, e);
                    self.rejected.push(format!("note #{}: {}", index, e));
                }
            }
        }
    }

    fn parse_comments(&mut self, items: Vec<Value>) {
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<ScrapedComment>(item) {
                Ok(comment) => self.comments.push(comment),
                Err(e) => {
                    tracing::warn!("Skipping unparseable comment #{}: {}", index, e);
                    self.rejected.push(format!("comment #{}: {}", index, e));
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.comments.is_empty()
    }
}

#[cfg(test)]
#[path = "webhook_test.rs"]
mod tests;
