// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化指标系统
///
/// 未启用时不安装 recorder，`metrics` 宏调用成为空操作
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address '{}': {}", settings.listen_addr, e);
            return;
        }
    };

    // 端口被占用时只告警，不影响主服务
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}", e);
        return;
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
}

fn describe_metrics() {
    describe_counter!(
        "webhook_received_total",
        "Webhook callbacks received, labelled by status"
    );
    describe_counter!(
        "notes_ingested_total",
        "Notes reconciled, labelled by outcome"
    );
    describe_counter!(
        "ingest_item_errors_total",
        "Batch items that failed and were rolled back to their savepoint"
    );
    describe_histogram!(
        "ingest_batch_duration_seconds",
        "Duration of one ingestion transaction in seconds"
    );
    describe_counter!(
        "crawl_dispatch_total",
        "Repository dispatch calls, labelled by result"
    );
}
