// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use notepulse::config::settings::Settings;
use notepulse::domain::services::importance::ImportanceThresholds;
use notepulse::infrastructure::database::connection;
use notepulse::infrastructure::metrics;
use notepulse::infrastructure::repositories::crawl_task_repo_impl::CrawlTaskRepositoryImpl;
use notepulse::infrastructure::services::github_dispatcher::GithubDispatcher;
use notepulse::infrastructure::services::ingestion_service_impl::IngestionServiceImpl;
use notepulse::presentation::routes;
use notepulse::queue::ingestion_queue::ChannelIngestionQueue;
use notepulse::utils::telemetry;
use notepulse::workers::ingestion_worker::IngestionWorker;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Arc::new(Settings::new()?);

    telemetry::init_telemetry(&settings.logging);
    info!("Starting notepulse {}...", env!("CARGO_PKG_VERSION"));

    metrics::init_metrics(&settings.metrics);

    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    if settings.database.auto_migrate {
        connection::run_migrations(db.as_ref()).await?;
    }

    if settings.github.token.is_none() {
        warn!("GitHub token is not configured, crawl dispatch will fail");
    }
    let dispatcher = Arc::new(GithubDispatcher::new(settings.github.clone())?);

    let task_repo = Arc::new(CrawlTaskRepositoryImpl::new(db.clone()));
    let ingestion_service = Arc::new(IngestionServiceImpl::new(
        db.clone(),
        ImportanceThresholds::from(&settings.importance),
    ));

    let (queue, receiver) = ChannelIngestionQueue::new(settings.webhook.queue_capacity);
    let worker = IngestionWorker::new(ingestion_service, task_repo, receiver).start();

    let app = routes::routes(settings.clone(), db, Arc::new(queue), dispatcher);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 路由释放后发送端关闭，等待队列中的批次处理完毕
    worker.await?;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
