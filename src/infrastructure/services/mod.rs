// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施服务模块
///
/// 提供领域服务接口的具体实现
/// 包括事务化入库和 GitHub 爬虫调度
pub mod github_dispatcher;
pub mod ingestion_service_impl;
