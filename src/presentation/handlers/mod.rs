// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 每个处理器对具体仓库类型泛型，由路由层实例化
pub mod keyword_handler;
pub mod note_handler;
pub mod task_handler;
pub mod webhook_handler;
