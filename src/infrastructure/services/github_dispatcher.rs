// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use reqwest::{header, Client};
use serde_json::json;
use tracing::{error, info};

use crate::config::settings::GithubSettings;
use crate::domain::services::dispatch_service::{
    CrawlDispatcher, DispatchError, DispatchReceipt, DispatchRequest,
};

/// 通过 GitHub repository_dispatch 触发爬虫工作流
#[derive(Clone)]
pub struct GithubDispatcher {
    settings: GithubSettings,
    /// HTTP客户端
    client: Client,
}

impl GithubDispatcher {
    /// 创建新的调度器
    ///
    /// # 参数
    ///
    /// * `settings` - GitHub 配置
    ///
    /// # 返回值
    ///
    /// * `Ok(GithubDispatcher)` - 调度器实例
    /// * `Err(DispatchError)` - HTTP客户端构造失败
    pub fn new(settings: GithubSettings) -> Result<Self, DispatchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("notepulse/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        Ok(Self { settings, client })
    }

    fn dispatch_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/dispatches",
            self.settings.api_base_url.trim_end_matches('/'),
            self.settings.repo_owner,
            self.settings.repo_name
        )
    }

    fn run_url(&self) -> String {
        format!(
            "https://github.com/{}/{}/actions",
            self.settings.repo_owner, self.settings.repo_name
        )
    }
}

#[async_trait]
impl CrawlDispatcher for GithubDispatcher {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError> {
        let token = self
            .settings
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(DispatchError::MissingToken)?;

        let body = json!({
            "event_type": self.settings.event_type,
            "client_payload": {
                "query": request.query,
                "num": request.num,
                "sort_type": request.sort_type,
                "cookies": request.cookies.as_deref().unwrap_or(""),
                "webhook_url": request.webhook_url,
                "get_comments": false,
                "no_delay": false,
                "task_id": request.task_id.to_string(),
            }
        });

        info!(task_id = %request.task_id, query = %request.query, "Dispatching crawl run");

        let response = self
            .client
            .post(self.dispatch_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                counter!("crawl_dispatch_total", "result" => "error").increment(1);
                error!("Dispatch request failed: {}", e);
                DispatchError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            counter!("crawl_dispatch_total", "result" => "rejected").increment(1);
            error!("Dispatch rejected with {}: {}", status, body);
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        counter!("crawl_dispatch_total", "result" => "success").increment(1);
        Ok(DispatchReceipt {
            run_url: self.run_url(),
        })
    }
}
