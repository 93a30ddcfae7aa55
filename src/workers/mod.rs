// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 后台入库工作器，消费 webhook 接收的结果数据
pub mod ingestion_worker;
