// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 笔记仓库（note_repository）：笔记查询、统计、软删除和审计日志
/// - 评论仓库（comment_repository）：按笔记分页查询评论
/// - 关键词仓库（keyword_repository）：业务关键词的增删改查
/// - 爬取任务仓库（crawl_task_repository）：任务的持久化和统计
pub mod comment_repository;
pub mod crawl_task_repository;
pub mod keyword_repository;
pub mod note_repository;

pub use crate::utils::errors::RepositoryError;
