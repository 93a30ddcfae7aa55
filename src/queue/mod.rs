// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 回调数据经有界通道交给后台入库工作器
pub mod ingestion_queue;
