// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 用户取消任务时记录的错误信息
pub const CANCELLED_MESSAGE: &str = "cancelled by user";

/// 爬取任务
///
/// 对应一次由 CI 执行的爬虫运行。任务的状态由触发接口和
/// Webhook 回调共同推进，结果计数在入库完成后累加。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrawlTask {
    /// 任务唯一标识符
    pub id: Uuid,
    pub task_name: String,
    /// 搜索关键词
    pub keyword: String,
    /// 任务状态
    pub status: TaskStatus,
    /// 目标爬取数量
    pub target_count: i32,
    /// 排序方式 0-4
    pub sort_type: i32,
    pub cookies: Option<String>,
    /// 结果回调地址
    pub webhook_url: Option<String>,
    /// 进度 0-100
    pub progress: i32,
    /// CI 运行ID
    pub run_id: Option<String>,
    pub total_crawled: i32,
    pub new_notes: i32,
    pub changed_notes: i32,
    pub important_notes: i32,
    pub error_message: Option<String>,
    pub scheduled_time: Option<DateTime<FixedOffset>>,
    pub started_at: Option<DateTime<FixedOffset>>,
    pub finished_at: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// 任务状态枚举
///
/// 状态转换遵循以下流程：
/// Pending → Running → Completed/Failed，Pending 也可直接结束
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// 已创建，尚未触发
    #[default]
    Pending,
    /// 已触发，爬虫运行中
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    pub fn all() -> [TaskStatus; 4] {
        [
            TaskStatus::Pending,
            TaskStatus::Running,
            TaskStatus::Completed,
            TaskStatus::Failed,
        ]
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "running" => Ok(TaskStatus::Running),
            "completed" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug, PartialEq)]
pub enum DomainError {
    /// 无效的状态转换，例如从终态再次变更
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: TaskStatus, to: TaskStatus },

    /// 验证错误，当输入数据不符合领域规则时发生
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// 一次入库批次对任务计数的贡献
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounters {
    pub total_crawled: i32,
    pub new_notes: i32,
    pub changed_notes: i32,
    pub important_notes: i32,
}

impl CrawlTask {
    /// 创建一个新的待执行任务
    ///
    /// # 参数
    ///
    /// * `task_name` - 任务名称
    /// * `keyword` - 搜索关键词
    /// * `target_count` - 目标爬取数量
    /// * `sort_type` - 排序方式
    ///
    /// # 返回值
    ///
    /// 返回状态为 Pending 的任务
    pub fn new(task_name: String, keyword: String, target_count: i32, sort_type: i32) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            task_name,
            keyword,
            status: TaskStatus::Pending,
            target_count,
            sort_type,
            cookies: None,
            webhook_url: None,
            progress: 0,
            run_id: None,
            total_crawled: 0,
            new_notes: 0,
            changed_notes: 0,
            important_notes: 0,
            error_message: None,
            scheduled_time: None,
            started_at: None,
            finished_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 检查状态转换是否合法
    ///
    /// 终态不可再转换；非终态到自身的转换视为幂等
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        match (self.status, next) {
            (from, _) if from.is_terminal() => false,
            (TaskStatus::Running, TaskStatus::Pending) => false,
            _ => true,
        }
    }

    fn transition(&mut self, next: TaskStatus) -> Result<(), DomainError> {
        if !self.can_transition_to(next) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now().into();
        Ok(())
    }

    /// 标记任务开始运行
    pub fn start(&mut self, run_id: Option<String>) -> Result<(), DomainError> {
        let was_running = self.status == TaskStatus::Running;
        self.transition(TaskStatus::Running)?;
        if !was_running || self.started_at.is_none() {
            self.started_at = Some(Utc::now().into());
        }
        if run_id.is_some() {
            self.run_id = run_id;
        }
        Ok(())
    }

    /// 更新进度，必要时从 Pending 进入 Running
    pub fn report_progress(&mut self, progress: i32) -> Result<(), DomainError> {
        if self.status == TaskStatus::Pending {
            self.start(None)?;
        } else if self.status.is_terminal() {
            return Err(DomainError::InvalidStateTransition {
                from: self.status,
                to: TaskStatus::Running,
            });
        }
        self.progress = progress.clamp(0, 100);
        self.updated_at = Utc::now().into();
        Ok(())
    }

    /// 标记任务完成
    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.transition(TaskStatus::Completed)?;
        self.progress = 100;
        self.finished_at = Some(Utc::now().into());
        Ok(())
    }

    /// 标记任务失败并记录原因
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), DomainError> {
        self.transition(TaskStatus::Failed)?;
        self.error_message = Some(message.into());
        self.finished_at = Some(Utc::now().into());
        Ok(())
    }

    /// 用户取消：未结束的任务转为失败
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.fail(CANCELLED_MESSAGE)
    }

    /// 按目标状态分派转换，供通用更新接口使用
    pub fn transition_to(&mut self, next: TaskStatus) -> Result<(), DomainError> {
        match next {
            TaskStatus::Pending => self.transition(TaskStatus::Pending),
            TaskStatus::Running => self.start(None),
            TaskStatus::Completed => self.complete(),
            TaskStatus::Failed => {
                let message = self.error_message.clone().unwrap_or_default();
                self.fail(message)
            }
        }
    }

    /// 累加一次入库批次的结果
    pub fn accumulate(&mut self, counters: TaskCounters) {
        self.total_crawled += counters.total_crawled;
        self.new_notes += counters.new_notes;
        self.changed_notes += counters.changed_notes;
        self.important_notes += counters.important_notes;
        self.updated_at = Utc::now().into();
    }
}

#[cfg(test)]
#[path = "crawl_task_test.rs"]
mod tests;
