use crate::api::{ApiCall, Host, Method};
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;

/// 向节点发起一次 API 调用并返回解析后的 JSON
#[async_trait]
pub trait NodeApi: Send + Sync {
    async fn request(&self, host: &Host, call: &ApiCall) -> ClientResult<Value>;
}

/// 基于 reqwest 的 HTTP 调度器，不重试，超时使用默认值
#[derive(Clone, Default)]
pub struct HttpNode {
    client: reqwest::Client,
}

impl HttpNode {
    pub fn new() -> Self {
        HttpNode {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NodeApi for HttpNode {
    async fn request(&self, host: &Host, call: &ApiCall) -> ClientResult<Value> {
        let url = call.url(host);
        tracing::debug!("➡️ {} {}", call.method, url);

        let mut builder = match call.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        builder = builder.header(ACCEPT, "application/json");
        if let Some(payload) = &call.payload {
            builder = builder.json(payload);
        }

        let response = builder.send().await.map_err(|source| ClientError::Request {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { url, status });
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| ClientError::Decode { url, source })
    }
}

/// 读取响应中的无符号整数字段，例如 `{"balance": 100}`
pub(crate) fn expect_u64(value: &Value, key: &str, path: &str) -> ClientResult<u64> {
    value
        .get(key)
        .and_then(Value::as_u64)
        .ok_or_else(|| ClientError::unexpected(path, format!("missing integer field {:?}", key)))
}

/// `/addresses` 返回地址列表，取第一个
pub(crate) fn first_address(value: &Value, path: &str) -> ClientResult<String> {
    value
        .as_array()
        .and_then(|list| list.first())
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ClientError::unexpected(path, "expected a non-empty list of addresses"))
}

/// 给操作员看的缩进 JSON
pub(crate) fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
