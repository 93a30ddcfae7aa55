// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、数据库、GitHub 调度、Webhook、重要性阈值、日志、指标和跨域等配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// GitHub Actions 调度配置
    pub github: GithubSettings,
    /// Webhook 配置
    pub webhook: WebhookSettings,
    /// 重要性判定阈值
    pub importance: ImportanceSettings,
    /// 日志配置
    pub logging: LoggingSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
    /// 跨域配置
    pub cors: CorsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
    /// 启动时是否自动执行迁移
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
}

/// GitHub Actions 调度配置
#[derive(Debug, Clone, Deserialize)]
pub struct GithubSettings {
    /// 访问令牌，未配置时无法触发爬取
    pub token: Option<String>,
    pub repo_owner: String,
    pub repo_name: String,
    /// API 根地址，测试时可指向本地模拟服务
    pub api_base_url: String,
    /// repository_dispatch 事件类型
    pub event_type: String,
}

/// Webhook配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookSettings {
    /// 签名密钥，配置后校验 `X-Hub-Signature-256`
    pub secret: Option<String>,
    /// 服务对外的根地址，触发任务时据此生成默认 webhook_url
    pub public_url: Option<String>,
    /// 后台入库队列容量
    pub queue_capacity: usize,
}

/// 重要性判定阈值
#[derive(Debug, Clone, Deserialize)]
pub struct ImportanceSettings {
    pub liked_threshold: i32,
    pub comment_threshold: i32,
    pub collected_threshold: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// 是否输出 JSON 格式日志
    pub json: bool,
}

/// Prometheus 指标配置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
    pub listen_addr: String,
}

/// 跨域配置
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// 允许的来源列表，包含 `*` 时允许任意来源
    pub origins: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从默认值、配置文件和环境变量加载配置
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("NOTEPULSE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 带有全部默认值的配置构建器
    ///
    /// 测试中可在此基础上通过 `set_override` 覆盖个别配置
    pub fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("database.url", "sqlite://notepulse.db?mode=rwc")?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("database.auto_migrate", true)?
            .set_default("github.repo_owner", "JunJD")?
            .set_default("github.repo_name", "xiuer-spider")?
            .set_default("github.api_base_url", "https://api.github.com")?
            .set_default("github.event_type", "search-xhs")?
            .set_default("webhook.queue_capacity", 64)?
            .set_default("importance.liked_threshold", 1000)?
            .set_default("importance.comment_threshold", 100)?
            .set_default("importance.collected_threshold", 500)?
            .set_default("logging.json", false)?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .set_default("cors.origins", vec!["*"])
    }

    /// 从构建器直接反序列化
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
