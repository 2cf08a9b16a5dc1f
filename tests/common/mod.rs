#![allow(dead_code)]

use async_trait::async_trait;
use scorex_client::{ApiCall, ClientError, ClientResult, Host, Method, NodeApi};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// 内存中的节点：按 "METHOD url" 返回预设响应，并记录每一次调用
#[derive(Default)]
pub struct StubNode {
    routes: HashMap<String, Value>,
    calls: Mutex<Vec<(Host, ApiCall)>>,
}

impl StubNode {
    pub fn new() -> Self {
        StubNode::default()
    }

    pub fn route(mut self, method: Method, url: &str, response: Value) -> Self {
        self.routes.insert(format!("{} {}", method, url), response);
        self
    }

    pub fn get(self, url: &str, response: Value) -> Self {
        self.route(Method::Get, url, response)
    }

    pub fn calls(&self) -> Vec<(Host, ApiCall)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|(host, call)| format!("{} {}", call.method, call.url(host)))
            .collect()
    }

    pub fn payments(&self) -> Vec<(Host, Value)> {
        self.calls()
            .into_iter()
            .filter(|(_, call)| call.method == Method::Post && call.path == "/payment")
            .map(|(host, call)| (host, Value::Object(call.payload.unwrap_or_default())))
            .collect()
    }
}

#[async_trait]
impl NodeApi for StubNode {
    async fn request(&self, host: &Host, call: &ApiCall) -> ClientResult<Value> {
        self.calls.lock().unwrap().push((host.clone(), call.clone()));
        let url = call.url(host);
        if call.method == Method::Post && call.path == "/payment" {
            return Ok(self
                .routes
                .get(&format!("POST {}", url))
                .cloned()
                .unwrap_or_else(|| json!({"status": "ok"})));
        }
        self.routes
            .get(&format!("{} {}", call.method, url))
            .cloned()
            .ok_or(ClientError::Status {
                url,
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}

/// 三个节点组成的网络：10.0.0.1 是创始节点
pub fn three_node_network(founder_balance: u64) -> StubNode {
    StubNode::new()
        .get(
            "http://10.0.0.1:9085/peers/all",
            json!([[
                {"address": "node-3/10.0.0.3:9084"},
                {"address": "node-1/10.0.0.1:9084"},
                {"address": "node-2/10.0.0.2:9084"}
            ]]),
        )
        .get("http://10.0.0.1:9085/addresses", json!(["addrA"]))
        .get("http://10.0.0.2:9085/addresses", json!(["addrB"]))
        .get("http://10.0.0.3:9085/addresses", json!(["addrC"]))
        .get("http://10.0.0.1:9085/addresses/balance/addrA", json!({"balance": founder_balance}))
        .get("http://10.0.0.1:9085/addresses/balance/addrB", json!({"balance": 5}))
        .get("http://10.0.0.1:9085/addresses/balance/addrC", json!({"balance": 7}))
}
