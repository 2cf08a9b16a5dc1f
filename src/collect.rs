use crate::api::{ApiCall, Host};
use crate::base58::decode_base58;
use crate::error::{ClientError, ClientResult};
use crate::rpc::{expect_u64, NodeApi};
use num_bigint::BigUint;
use serde_json::Value;
use std::path::Path;

/// 区块中存放共识目标值的字段
pub const CONSENSUS_FIELD: &str = "bitcoin-consensus";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRecord {
    pub height: u64,
    pub timestamp: Value,
    pub target: BigUint,
}

impl BlockRecord {
    /// 从 `/blocks/at/{h}` 的响应中提取时间戳与解码后的目标值
    pub fn from_block(height: u64, block: &Value) -> ClientResult<Self> {
        let path = format!("/blocks/at/{}", height);
        let timestamp = block
            .get("timestamp")
            .cloned()
            .ok_or_else(|| ClientError::unexpected(&path, "missing \"timestamp\""))?;
        let encoded = block
            .get(CONSENSUS_FIELD)
            .and_then(|c| c.get("target"))
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::unexpected(&path, format!("missing \"{}.target\"", CONSENSUS_FIELD)))?;
        Ok(BlockRecord {
            height,
            timestamp,
            target: decode_base58(encoded)?,
        })
    }

    /// CSV 一行的三个字段：height, timestamp, decoded_target
    pub fn csv_fields(&self) -> [String; 3] {
        let timestamp = match &self.timestamp {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        [self.height.to_string(), timestamp, self.target.to_string()]
    }
}

/// 将高度 1..=当前高度 的每个区块写入 CSV 文件，返回写入的行数。
/// 文件句柄在任何返回路径上都会关闭。
pub async fn collect_data<A: NodeApi + ?Sized>(api: &A, host: &Host, output: &Path) -> ClientResult<u64> {
    let height = expect_u64(&api.request(host, &ApiCall::height()).await?, "height", "/blocks/height")?;
    tracing::info!("📦 收集 {} 个区块 -> {}", height, output.display());

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(output)?;
    for h in 1..=height {
        let block = api.request(host, &ApiCall::block_at(&h.to_string())).await?;
        let record = BlockRecord::from_block(h, &block)?;
        writer.write_record(record.csv_fields())?;
    }
    writer.flush()?;
    Ok(height)
}
