// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{CorsSettings, Settings};
use crate::infrastructure::repositories::comment_repo_impl::CommentRepositoryImpl;
use crate::infrastructure::repositories::crawl_task_repo_impl::CrawlTaskRepositoryImpl;
use crate::infrastructure::repositories::keyword_repo_impl::KeywordRepositoryImpl;
use crate::infrastructure::repositories::note_repo_impl::NoteRepositoryImpl;
use crate::infrastructure::services::github_dispatcher::GithubDispatcher;
use crate::presentation::handlers::task_handler::WEBHOOK_PATH;
use crate::presentation::handlers::{
    keyword_handler, note_handler, task_handler, webhook_handler,
};
use crate::presentation::middleware::signature_middleware::{
    signature_middleware, SignatureState,
};
use crate::queue::ingestion_queue::ChannelIngestionQueue;
use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, patch, post},
    Extension, Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

type Notes = NoteRepositoryImpl;
type Comments = CommentRepositoryImpl;
type Keywords = KeywordRepositoryImpl;
type Tasks = CrawlTaskRepositoryImpl;

/// 创建应用路由
///
/// # 参数
///
/// * `settings` - 应用配置
/// * `db` - 数据库连接池
/// * `queue` - 后台入库队列
/// * `dispatcher` - 爬虫调度器
///
/// # 返回值
///
/// 返回挂载了全部接口、签名校验、请求追踪和跨域的路由
pub fn routes(
    settings: Arc<Settings>,
    db: Arc<DatabaseConnection>,
    queue: Arc<ChannelIngestionQueue>,
    dispatcher: Arc<GithubDispatcher>,
) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/version", get(version))
        .route("/api/webhook/test", post(webhook_handler::webhook_test));

    let webhook_routes = Router::new()
        .route(
            WEBHOOK_PATH,
            post(webhook_handler::receive_result::<Tasks, ChannelIngestionQueue>),
        )
        .route_layer(middleware::from_fn_with_state(
            SignatureState::new(settings.webhook.secret.clone()),
            signature_middleware,
        ));

    let note_routes = Router::new()
        .route("/api/notes", get(note_handler::search_notes::<Notes, Comments>))
        .route("/api/notes/stats", get(note_handler::note_stats::<Notes, Comments>))
        .route(
            "/api/notes/{note_id}",
            get(note_handler::get_note::<Notes, Comments>)
                .delete(note_handler::delete_note::<Notes, Comments>),
        )
        .route(
            "/api/notes/{note_id}/comments",
            get(note_handler::list_comments::<Notes, Comments>),
        )
        .route(
            "/api/notes/{note_id}/tag-logs",
            get(note_handler::list_tag_logs::<Notes, Comments>),
        );

    let keyword_routes = Router::new()
        .route(
            "/api/keywords",
            get(keyword_handler::list_keywords::<Keywords>)
                .post(keyword_handler::create_keyword::<Keywords>),
        )
        .route(
            "/api/keywords/categories",
            get(keyword_handler::list_categories::<Keywords>),
        )
        .route("/api/keywords/stats", get(keyword_handler::keyword_stats::<Keywords>))
        .route(
            "/api/keywords/{id}",
            get(keyword_handler::get_keyword::<Keywords>)
                .put(keyword_handler::update_keyword::<Keywords>)
                .delete(keyword_handler::delete_keyword::<Keywords>),
        )
        .route(
            "/api/keywords/{id}/toggle",
            patch(keyword_handler::toggle_keyword::<Keywords>),
        );

    let task_routes = Router::new()
        .route(
            "/api/tasks",
            get(task_handler::list_tasks::<Tasks, GithubDispatcher>)
                .post(task_handler::create_task::<Tasks, GithubDispatcher>),
        )
        .route(
            "/api/tasks/stats",
            get(task_handler::task_stats::<Tasks, GithubDispatcher>),
        )
        .route(
            "/api/tasks/trigger-crawl",
            post(task_handler::trigger_crawl::<Tasks, GithubDispatcher>),
        )
        .route(
            "/api/tasks/{id}",
            get(task_handler::get_task::<Tasks, GithubDispatcher>)
                .patch(task_handler::update_task::<Tasks, GithubDispatcher>)
                .delete(task_handler::cancel_task::<Tasks, GithubDispatcher>),
        )
        .route(
            "/api/tasks/{id}/trigger",
            post(task_handler::trigger_task::<Tasks, GithubDispatcher>),
        );

    Router::new()
        .merge(public_routes)
        .merge(webhook_routes)
        .merge(note_routes)
        .merge(keyword_routes)
        .merge(task_routes)
        .layer(Extension(Arc::new(NoteRepositoryImpl::new(db.clone()))))
        .layer(Extension(Arc::new(CommentRepositoryImpl::new(db.clone()))))
        .layer(Extension(Arc::new(KeywordRepositoryImpl::new(db.clone()))))
        .layer(Extension(Arc::new(CrawlTaskRepositoryImpl::new(db))))
        .layer(Extension(queue))
        .layer(Extension(dispatcher))
        .layer(Extension(settings.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&settings.cors))
}

/// 按配置构建跨域层，包含 `*` 时允许任意来源
fn cors_layer(cors: &CorsSettings) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if cors.origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cors
        .origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
