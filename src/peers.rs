use crate::api::{ApiCall, Host};
use crate::error::{ClientError, ClientResult};
use crate::rpc::{expect_u64, first_address, NodeApi};
use serde::Serialize;
use serde_json::Value;

/// 一个节点的 IP 与其账户地址
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PeerAddress {
    pub ip: String,
    pub address: String,
}

/// 从复合地址字段中取出 IP，例如 `node-1/172.17.0.3:9084` 或 `/172.17.0.3:9084`
pub fn parse_peer_ip(composite: &str) -> ClientResult<String> {
    let (_, rest) = composite
        .split_once('/')
        .ok_or_else(|| ClientError::PeerAddress(composite.to_string()))?;
    let ip = rest.split(['/', ':']).next().unwrap_or("").trim();
    if ip.is_empty() {
        return Err(ClientError::PeerAddress(composite.to_string()));
    }
    Ok(ip.to_string())
}

/// `/peers/all` 的响应可能是 `[[peer, ...]]`、`[peer, ...]` 或 `{"peers": [...]}`
fn peer_descriptors(value: &Value) -> ClientResult<&Vec<Value>> {
    let path = "/peers/all";
    match value {
        Value::Array(outer) => match outer.first() {
            Some(Value::Array(inner)) => Ok(inner),
            _ => Ok(outer),
        },
        Value::Object(map) => map
            .get("peers")
            .and_then(Value::as_array)
            .ok_or_else(|| ClientError::unexpected(path, "missing \"peers\" list")),
        _ => Err(ClientError::unexpected(path, "expected a list of peers")),
    }
}

/// 已知的所有节点 IP（按 `/peers/all` 返回顺序，不去重）
pub async fn list_peer_ips<A: NodeApi + ?Sized>(api: &A, host: &Host) -> ClientResult<Vec<String>> {
    let response = api.request(host, &ApiCall::all_peers()).await?;
    peer_descriptors(&response)?
        .iter()
        .map(|peer| {
            let composite = peer
                .get("address")
                .and_then(Value::as_str)
                .ok_or_else(|| ClientError::unexpected("/peers/all", "peer without \"address\""))?;
            parse_peer_ip(composite)
        })
        .collect()
}

/// 遍历所有节点，查询每个节点自己的第一个账户地址，结果按 (ip, address) 排序。
/// 任一节点无响应都会使整个查询失败。
pub async fn list_all_addresses<A: NodeApi + ?Sized>(
    api: &A,
    host: &Host,
    peer_port: u16,
) -> ClientResult<Vec<PeerAddress>> {
    let mut addresses = Vec::new();
    for ip in list_peer_ips(api, host).await? {
        let peer = Host::peer(&ip, peer_port);
        let response = api.request(&peer, &ApiCall::addresses()).await?;
        let address = first_address(&response, "/addresses")?;
        addresses.push(PeerAddress { ip, address });
    }
    addresses.sort();
    tracing::info!("🌐 发现 {} 个节点地址", addresses.len());
    Ok(addresses)
}

/// 所有已知节点账户的余额，查询均发往 `host`
pub async fn all_balances<A: NodeApi + ?Sized>(
    api: &A,
    host: &Host,
    peer_port: u16,
) -> ClientResult<Vec<(String, u64)>> {
    let mut balances = Vec::new();
    for peer in list_all_addresses(api, host, peer_port).await? {
        let response = api.request(host, &ApiCall::balance(&peer.address)).await?;
        let balance = expect_u64(&response, "balance", "/addresses/balance")?;
        balances.push((peer.address, balance));
    }
    Ok(balances)
}

/// 每个节点各自报告的区块高度
pub async fn peer_heights<A: NodeApi + ?Sized>(
    api: &A,
    host: &Host,
    peer_port: u16,
) -> ClientResult<Vec<(String, Value)>> {
    let mut heights = Vec::new();
    for peer in list_all_addresses(api, host, peer_port).await? {
        let response = api
            .request(&Host::peer(&peer.ip, peer_port), &ApiCall::height())
            .await?;
        heights.push((peer.ip, response));
    }
    Ok(heights)
}
