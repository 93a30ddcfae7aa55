// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含请求 DTO 和用例实现，依赖领域层的仓库与服务特质
pub mod dto;
pub mod use_cases;
