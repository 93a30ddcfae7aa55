// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 笔记（note）：爬取到的内容及其对账状态
/// - 评论（comment）：隶属于笔记的评论
/// - 标签变更日志（tag_change_log）：笔记的审计轨迹
/// - 业务关键词（keyword）：重要性判定依据
/// - 爬取任务（crawl_task）：一次 CI 爬虫运行
/// - 回调（webhook）：爬虫回调载荷及数据分类
pub mod comment;
pub mod crawl_task;
pub mod keyword;
pub mod note;
pub mod tag_change_log;
pub mod webhook;
