// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// 触发一次 CI 爬虫运行所需的参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchRequest {
    pub task_id: Uuid,
    /// 搜索关键词
    pub query: String,
    /// 目标数量
    pub num: i32,
    pub sort_type: i32,
    pub cookies: Option<String>,
    /// 爬虫结果回调地址
    pub webhook_url: String,
}

/// 触发成功后的回执
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    /// CI 运行列表页面
    pub run_url: String,
}

/// 调度错误类型
#[derive(Error, Debug)]
pub enum DispatchError {
    /// 未配置访问令牌
    #[error("GitHub token is not configured")]
    MissingToken,

    /// CI 接口返回非 2xx
    #[error("GitHub API returned {status}: {body}")]
    Rejected { status: u16, body: String },

    /// 网络或请求构造错误
    #[error("GitHub API request failed: {0}")]
    Transport(String),
}

/// 爬取调度器特质
#[async_trait]
pub trait CrawlDispatcher: Send + Sync {
    /// 触发一次爬虫运行
    async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError>;
}
