// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义 API 请求参数和响应体，请求参数通过 validator 校验
pub mod keyword_dto;
pub mod note_dto;
pub mod task_dto;
pub mod webhook_dto;
