// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 重要性判定（importance）：关键词和互动阈值
/// - 对账（reconciliation）：新数据与已存储笔记的合并
/// - 入库服务（ingestion_service）：批量事务入库的抽象
/// - 调度服务（dispatch_service）：触发 CI 爬虫的抽象
pub mod dispatch_service;
pub mod importance;
pub mod ingestion_service;
pub mod reconciliation;
