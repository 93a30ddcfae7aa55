// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供领域仓库接口的具体实现
/// 笔记、评论、关键词和爬取任务的 SeaORM 实现
pub mod comment_repo_impl;
pub mod crawl_task_repo_impl;
pub mod keyword_repo_impl;
pub mod note_repo_impl;
