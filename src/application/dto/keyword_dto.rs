// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::domain::models::keyword::Keyword;

fn default_weight() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

/// 创建关键词请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct KeywordCreateDto {
    #[validate(length(min = 1, max = 100))]
    pub keyword: String,
    #[validate(length(max = 50))]
    pub category: Option<String>,
    #[validate(range(min = 1, max = 10))]
    #[serde(default = "default_weight")]
    pub weight: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[validate(length(max = 200))]
    pub description: Option<String>,
}

/// 部分更新关键词，未提供的字段保持不变
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct KeywordUpdateDto {
    #[validate(length(min = 1, max = 100))]
    pub keyword: Option<String>,
    #[validate(length(max = 50))]
    pub category: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub weight: Option<i32>,
    pub is_active: Option<bool>,
    #[validate(length(max = 200))]
    pub description: Option<String>,
}

/// 关键词列表查询参数
#[derive(Debug, Deserialize, Validate)]
pub struct KeywordListParams {
    pub skip: Option<u64>,
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    pub category: Option<String>,
    pub active_only: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct KeywordListResponse {
    pub keywords: Vec<Keyword>,
    pub total: u64,
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct KeywordStatsResponse {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub category_stats: BTreeMap<String, u64>,
    /// 以权重为键
    pub weight_stats: BTreeMap<i32, u64>,
}

#[derive(Debug, Serialize)]
pub struct KeywordToggleResponse {
    pub message: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
