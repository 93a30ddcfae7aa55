// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum_test::TestServer;
use config::builder::DefaultState;
use config::ConfigBuilder;
use notepulse::config::settings::Settings;
use notepulse::domain::services::importance::ImportanceThresholds;
use notepulse::infrastructure::database::connection;
use notepulse::infrastructure::repositories::crawl_task_repo_impl::CrawlTaskRepositoryImpl;
use notepulse::infrastructure::services::github_dispatcher::GithubDispatcher;
use notepulse::infrastructure::services::ingestion_service_impl::IngestionServiceImpl;
use notepulse::presentation::routes;
use notepulse::queue::ingestion_queue::ChannelIngestionQueue;
use notepulse::workers::ingestion_worker::IngestionWorker;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub const NOTE_A: &str = "64f1a2b3c4d5e6f7a8b9c0d1";
pub const NOTE_B: &str = "64f1a2b3c4d5e6f7a8b9c0d2";

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<DatabaseConnection>,
    pub github: MockServer,
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with(|builder| builder).await
}

/// 以内存 SQLite 和模拟 GitHub API 启动完整应用，包括后台入库工作器
pub async fn create_test_app_with<F>(configure: F) -> TestApp
where
    F: FnOnce(ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState>,
{
    let github = MockServer::start().await;

    let builder = Settings::builder()
        .unwrap()
        .set_override("database.url", "sqlite::memory:")
        .unwrap()
        .set_override("github.token", "test-token")
        .unwrap()
        .set_override("github.api_base_url", github.uri())
        .unwrap();
    let settings = Arc::new(Settings::from_builder(configure(builder)).unwrap());

    let db = Arc::new(connection::create_pool(&settings.database).await.unwrap());
    connection::run_migrations(db.as_ref()).await.unwrap();

    let dispatcher = Arc::new(GithubDispatcher::new(settings.github.clone()).unwrap());
    let ingestion = Arc::new(IngestionServiceImpl::new(
        db.clone(),
        ImportanceThresholds::from(&settings.importance),
    ));
    let task_repo = Arc::new(CrawlTaskRepositoryImpl::new(db.clone()));

    let (queue, receiver) = ChannelIngestionQueue::new(settings.webhook.queue_capacity);
    IngestionWorker::new(ingestion, task_repo, receiver).start();

    let app = routes::routes(settings, db.clone(), Arc::new(queue), dispatcher);
    let server = TestServer::new(app).unwrap();

    TestApp { server, db, github }
}

/// 爬虫回调载荷
pub fn webhook_payload(status: &str, task_id: Option<&str>, data: Option<Value>) -> Value {
    let mut payload = serde_json::json!({
        "status": status,
        "message": format!("crawler {}", status),
        "timestamp": "2025-06-01T08:00:00Z",
        "run_id": "1234567890",
    });
    if let Some(task_id) = task_id {
        payload["task_id"] = Value::String(task_id.to_string());
    }
    if let Some(data) = data {
        payload["data"] = data;
    }
    payload
}

/// 轮询直到后台入库完成
pub async fn wait_for<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not met before timeout");
}
