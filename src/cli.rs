use crate::api::Host;
use crate::config::{ClientConfig, DEFAULT_HOST, DEFAULT_LOG_FILE, DEFAULT_PEER_PORT};
use crate::transaction::RandomTransactions;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scorex-client")]
#[command(about = "Operator console for a Scorex node's HTTP API", long_about = None)]
pub struct Cli {
    /// Node API base URL
    #[arg(long, global = true, default_value = DEFAULT_HOST)]
    pub host: String,

    /// API port of peers found through /peers/all
    #[arg(long, global = true, default_value_t = DEFAULT_PEER_PORT)]
    pub peer_port: u16,

    /// CSV file written by `save` and `exit`
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    #[arg(long, global = true, default_value_t = 30)]
    pub rand_count: usize,

    #[arg(long, global = true, default_value_t = 1)]
    pub rand_lower: u64,

    #[arg(long, global = true, default_value_t = 20)]
    pub rand_upper: u64,

    /// Fee for generated payments
    #[arg(long, global = true, default_value_t = 1)]
    pub fee: u64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive console (default)
    Shell,
    /// Execute a batch script; its first line names the node
    Run { file: PathBuf },
    /// Split this node's balance evenly among all peers
    Split,
    /// Print the rescaled difficulty targets
    Difficulty,
    /// Decode a base58 string into an integer
    Base58 { value: String },
}

impl Cli {
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            host: Host::new(self.host.as_str()),
            peer_port: self.peer_port,
            log_file: self.log_file.clone(),
            random: RandomTransactions {
                count: self.rand_count,
                lower: self.rand_lower,
                upper: self.rand_upper,
                fee: self.fee,
            },
        }
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Shell)
    }
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
