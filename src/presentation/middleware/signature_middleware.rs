// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    body::{self, Body},
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// 签名请求头
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// 回调请求体的大小上限
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// 回调签名校验状态
#[derive(Clone, Default)]
pub struct SignatureState {
    /// 未配置时跳过校验
    pub secret: Option<Arc<str>>,
}

impl SignatureState {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()).map(Arc::from),
        }
    }
}

/// 计算 `sha256=<hex>` 格式的签名
pub fn sign(secret: &str, body: &[u8]) -> Result<String, StatusCode> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    mac.update(body);
    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

fn verify(secret: &str, body: &[u8], header: &str) -> Result<bool, StatusCode> {
    let Some(expected) = header
        .strip_prefix("sha256=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
    else {
        return Ok(false);
    };

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    mac.update(body);
    Ok(mac.verify_slice(&expected).is_ok())
}

/// 校验 `X-Hub-Signature-256`，不匹配时返回 401
pub async fn signature_middleware(
    State(state): State<SignatureState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(secret) = state.secret.clone() else {
        return Ok(next.run(req).await);
    };

    let (parts, body) = req.into_parts();
    let header = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let Some(header) = header else {
        warn!("Webhook request without {} header", SIGNATURE_HEADER);
        return Err(StatusCode::UNAUTHORIZED);
    };

    let bytes = body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;

    if !verify(&secret, &bytes, &header)? {
        warn!("Webhook signature mismatch");
        return Err(StatusCode::UNAUTHORIZED);
    }
    debug!("Webhook signature verified");

    let req = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(req).await)
}

#[cfg(test)]
#[path = "signature_middleware_test.rs"]
mod tests;
