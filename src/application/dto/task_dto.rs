// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::crawl_task::{CrawlTask, TaskStatus};

fn default_target_count() -> i32 {
    200
}

fn default_trigger_count() -> i32 {
    50
}

fn default_sort_type() -> i32 {
    1
}

/// 创建任务请求，任务创建后处于 pending 状态
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct TaskCreateDto {
    #[validate(length(min = 1, max = 200))]
    pub task_name: String,
    #[validate(length(min = 1, max = 200))]
    pub keyword: String,
    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_target_count")]
    pub target_count: i32,
    /// 0 综合 / 1 最新 / 2 最多点赞 / 3 最多评论 / 4 最多收藏
    #[validate(range(min = 0, max = 4))]
    #[serde(default = "default_sort_type")]
    pub sort_type: i32,
    pub cookies: Option<String>,
    #[validate(url)]
    pub webhook_url: Option<String>,
    pub scheduled_time: Option<DateTime<FixedOffset>>,
}

/// 更新任务请求
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct TaskUpdateDto {
    #[validate(length(min = 1, max = 200))]
    pub task_name: Option<String>,
    pub status: Option<TaskStatus>,
    pub error_message: Option<String>,
}

/// 创建并立即触发爬取
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct TriggerCrawlDto {
    #[validate(length(min = 1, max = 200))]
    pub task_name: String,
    #[validate(length(min = 1, max = 200))]
    pub keyword: String,
    #[validate(range(min = 1, max = 500))]
    #[serde(default = "default_trigger_count")]
    pub target_count: i32,
    #[validate(range(min = 0, max = 4))]
    #[serde(default = "default_sort_type")]
    pub sort_type: i32,
    pub cookies: Option<String>,
    #[validate(url)]
    pub webhook_url: String,
}

/// 任务列表查询参数
#[derive(Debug, Deserialize, Validate)]
pub struct TaskListParams {
    #[validate(range(min = 1))]
    pub page: Option<u64>,
    #[validate(range(min = 1, max = 100))]
    pub size: Option<u64>,
    pub status: Option<TaskStatus>,
    pub keyword: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<CrawlTask>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct TaskStatsResponse {
    pub total_tasks: u64,
    pub pending_tasks: u64,
    pub running_tasks: u64,
    pub completed_tasks: u64,
    pub failed_tasks: u64,
}

/// 触发和取消操作的响应
#[derive(Debug, Serialize)]
pub struct TaskActionResponse {
    pub success: bool,
    pub message: String,
    pub task_id: Option<String>,
    pub github_run_url: Option<String>,
}
