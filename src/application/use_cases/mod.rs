// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// 每个用例对应一组 HTTP 接口背后的业务流程
pub mod keyword_use_case;
pub mod note_use_case;
pub mod task_use_case;
pub mod webhook_use_case;
