// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

/// Webhook 回调响应
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WebhookResponse {
    /// 固定为 `received`
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl WebhookResponse {
    pub fn received(message: impl Into<String>) -> Self {
        Self {
            status: "received".to_string(),
            message: message.into(),
            processed_count: None,
            errors: None,
        }
    }
}
