use crate::api::Host;
use crate::transaction::RandomTransactions;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "http://172.17.0.2:9085";
pub const DEFAULT_PEER_PORT: u16 = 9085;
pub const DEFAULT_LOG_FILE: &str = "blocks.log";

/// 客户端配置，显式传给控制台和各个辅助函数
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub host: Host,
    /// 被发现节点的 API 端口
    pub peer_port: u16,
    /// `save` / `exit` 写出的 CSV 文件
    pub log_file: PathBuf,
    pub random: RandomTransactions,
}

impl ClientConfig {
    pub fn new(host: Host) -> Self {
        ClientConfig {
            host,
            ..ClientConfig::default()
        }
    }

    pub fn fee(&self) -> u64 {
        self.random.fee
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            host: Host::new(DEFAULT_HOST),
            peer_port: DEFAULT_PEER_PORT,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            random: RandomTransactions::default(),
        }
    }
}
