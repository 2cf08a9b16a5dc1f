use crate::base58::decode_base58;
use crate::cli::{Cli, Command};
use crate::config::ClientConfig;
use crate::console::Console;
use crate::difficulty;
use crate::rpc::{pretty, HttpNode};
use crate::script::run_script;
use crate::transaction::split_foundation_tokens;
use anyhow::{Context, Result};
use std::io::Write;

pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = cli.config();
    match cli.command() {
        Command::Shell => shell(&config).await,
        Command::Run { file } => {
            let node = HttpNode::new();
            let mut out = std::io::stdout();
            let count = run_script(&node, &file, &mut out)
                .await
                .with_context(|| format!("script {} failed", file.display()))?;
            tracing::info!("✅ 执行完成，共 {} 条指令", count);
            Ok(())
        }
        Command::Split => {
            let node = HttpNode::new();
            let results = split_foundation_tokens(&node, &config.host, config.peer_port, config.fee()).await?;
            let mut out = std::io::stdout();
            for response in &results {
                writeln!(out, "{}", pretty(response))?;
            }
            Ok(())
        }
        Command::Difficulty => {
            let mut out = std::io::stdout();
            for line in difficulty::report_lines() {
                writeln!(out, "{}", line)?;
            }
            Ok(())
        }
        Command::Base58 { value } => {
            let decoded = decode_base58(&value)?;
            println!("{}", decoded);
            Ok(())
        }
    }
}

async fn shell(config: &ClientConfig) -> Result<()> {
    tracing::info!("🚀 连接节点 {}", config.host);
    let node = HttpNode::new();
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut console = Console::new(&node, config, std::io::stdout());
    console.run(stdin).await?;
    Ok(())
}
