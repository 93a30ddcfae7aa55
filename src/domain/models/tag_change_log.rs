// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::note::{EngagementStats, NoteTag};

/// 互动数据变化对应的变更类型
pub const CHANGE_TYPE_STATS: &str = "stats_changed";

/// 笔记标签变更日志，只追加不修改
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagChangeLog {
    pub id: Uuid,
    pub note_id: String,
    pub old_tags: Vec<NoteTag>,
    pub new_tags: Vec<NoteTag>,
    pub change_type: String,
    pub change_reason: Option<String>,
    pub old_stats: Option<EngagementStats>,
    pub new_stats: Option<EngagementStats>,
    pub related_comment_ids: Vec<String>,
    pub created_at: DateTime<FixedOffset>,
}
