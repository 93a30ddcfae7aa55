// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 从默认值、配置文件和 `NOTEPULSE__` 环境变量加载配置
pub mod settings;
