use crate::api::ApiCall;
use crate::collect::collect_data;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::peers::{all_balances, list_all_addresses, peer_heights};
use crate::rpc::{pretty, NodeApi};
use crate::script::run_script;
use crate::transaction::{make_random_transactions, submit_payment, Payment};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Balance,
    Addresses,
    AllAddresses,
    Genesis,
    BlockAt,
    Height,
    Last,
    Target,
    GenerationSignature,
    GeneratingBalance,
    Pay,
    Peers,
    AllPeers,
    TransactionInfo,
    TransactionList,
    Pending,
    Random,
    Read,
    Balances,
    Save,
    Help,
    Exit,
    Test,
}

/// 命令表中的一项：名称、最少参数个数和帮助文本
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub kind: CommandKind,
    pub min_args: usize,
    pub usage: &'static str,
    pub help: &'static str,
}

const fn cmd(name: &'static str, kind: CommandKind, min_args: usize, usage: &'static str, help: &'static str) -> CommandSpec {
    CommandSpec {
        name,
        kind,
        min_args,
        usage,
        help,
    }
}

pub const COMMANDS: &[CommandSpec] = &[
    cmd("balance", CommandKind::Balance, 1, "balance {address}", "Show the balance of an address"),
    cmd("bals", CommandKind::Balances, 0, "bals", "Show the balances of all nodes in the network"),
    cmd("addresses", CommandKind::Addresses, 0, "addresses", "Show all addresses of this node"),
    cmd("alladdrs", CommandKind::AllAddresses, 0, "alladdrs", "Show all addresses in the network"),
    cmd("genesis", CommandKind::Genesis, 0, "genesis", "Show the genesis block data"),
    cmd("blockat", CommandKind::BlockAt, 1, "blockat {height}", "Show the information about a block"),
    cmd("height", CommandKind::Height, 0, "height", "Show the current height of the blockchain"),
    cmd("last", CommandKind::Last, 0, "last", "Show the last block data"),
    cmd("target", CommandKind::Target, 0, "target [height]", "Show the base target of a block (Nxt only)"),
    cmd("gensig", CommandKind::GenerationSignature, 0, "gensig [height]", "Show the generation signature of a block (Nxt only)"),
    cmd("genbal", CommandKind::GeneratingBalance, 1, "genbal {address}", "Show the generating balance of an address (Nxt only)"),
    cmd("pay", CommandKind::Pay, 4, "pay {amount} {fee} {sender} {recipient}", "Make a payment"),
    cmd("peers", CommandKind::Peers, 0, "peers", "Show the list of the connected peers"),
    cmd("allpeers", CommandKind::AllPeers, 0, "allpeers", "Show all known peers"),
    cmd("tinfo", CommandKind::TransactionInfo, 1, "tinfo {transaction signature}", "Get the transaction info"),
    cmd("tlist", CommandKind::TransactionList, 1, "tlist {address}", "Get the list of transactions where the address has been involved"),
    cmd("pending", CommandKind::Pending, 0, "pending", "Get the list of unconfirmed transactions"),
    cmd("rand", CommandKind::Random, 0, "rand", "Make random transactions"),
    cmd("save", CommandKind::Save, 0, "save", "Save the blockchain data in a CSV file"),
    cmd("read", CommandKind::Read, 1, "read {filename}", "Read a file and batch process the commands"),
    cmd("test", CommandKind::Test, 0, "test", "Show the height reported by every peer"),
    cmd("help", CommandKind::Help, 0, "help", "Show the list of commands"),
    cmd("exit", CommandKind::Exit, 0, "exit", "Save the blockchain data and close this program"),
];

pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

fn parse_number(arg: &str, what: &str) -> ClientResult<u64> {
    arg.parse()
        .map_err(|_| ClientError::InvalidArgument(format!("{} must be a non-negative integer, got {:?}", what, arg)))
}

/// 交互式控制台：每次读取一行，查表分发，打印结果
pub struct Console<'a, A: NodeApi + ?Sized, W: Write> {
    api: &'a A,
    config: &'a ClientConfig,
    out: W,
    rng: StdRng,
}

impl<'a, A: NodeApi + ?Sized, W: Write> Console<'a, A, W> {
    pub fn new(api: &'a A, config: &'a ClientConfig, out: W) -> Self {
        Console {
            api,
            config,
            out,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// 循环读取直到 `exit` 或输入结束
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> ClientResult<()> {
        let mut lines = input.lines();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = lines.next_line().await? else {
                writeln!(self.out)?;
                return Ok(());
            };
            if self.handle_line(&line).await? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// 处理一行输入。命令失败时打印错误并继续，只有写输出失败才会向上传播。
    pub async fn handle_line(&mut self, line: &str) -> ClientResult<Flow> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = tokens.split_first() else {
            return Ok(Flow::Continue);
        };

        let Some(spec) = lookup(name) else {
            writeln!(self.out, "Invalid command: {}", name)?;
            return Ok(Flow::Continue);
        };
        if args.len() < spec.min_args {
            writeln!(self.out, "Error: No argument")?;
            return Ok(Flow::Continue);
        }

        match self.execute(spec.kind, args).await {
            Ok(flow) => Ok(flow),
            Err(e) => {
                tracing::warn!("❌ {} 执行失败: {}", name, e);
                writeln!(self.out, "Error: {}", e)?;
                Ok(if spec.kind == CommandKind::Exit {
                    Flow::Exit
                } else {
                    Flow::Continue
                })
            }
        }
    }

    async fn show(&mut self, call: ApiCall) -> ClientResult<Flow> {
        let response = self.api.request(&self.config.host, &call).await?;
        writeln!(self.out, "{}", pretty(&response))?;
        Ok(Flow::Continue)
    }

    async fn save(&mut self) -> ClientResult<()> {
        let config = self.config;
        let path = config.log_file.as_path();
        let count = collect_data(self.api, &config.host, path).await?;
        writeln!(self.out, "Saved {} blocks to {}", count, path.display())?;
        Ok(())
    }

    fn help(&mut self) -> ClientResult<()> {
        for spec in COMMANDS {
            writeln!(self.out, "{}: {}", spec.usage, spec.help)?;
        }
        Ok(())
    }

    async fn execute(&mut self, kind: CommandKind, args: &[&str]) -> ClientResult<Flow> {
        let config = self.config;
        let host = &config.host;
        let optional = args.first().copied();
        match kind {
            CommandKind::Balance => self.show(ApiCall::balance(args[0])).await,
            CommandKind::Addresses => self.show(ApiCall::addresses()).await,
            CommandKind::Genesis => self.show(ApiCall::first_block()).await,
            CommandKind::BlockAt => self.show(ApiCall::block_at(args[0])).await,
            CommandKind::Height => self.show(ApiCall::height()).await,
            CommandKind::Last => self.show(ApiCall::last_block()).await,
            CommandKind::Target => self.show(ApiCall::base_target(optional)).await,
            CommandKind::GenerationSignature => self.show(ApiCall::generation_signature(optional)).await,
            CommandKind::GeneratingBalance => self.show(ApiCall::generating_balance(args[0])).await,
            CommandKind::Peers => self.show(ApiCall::connected_peers()).await,
            CommandKind::AllPeers => self.show(ApiCall::all_peers()).await,
            CommandKind::TransactionInfo => self.show(ApiCall::transaction_info(args[0])).await,
            CommandKind::TransactionList => self.show(ApiCall::address_transactions(args[0])).await,
            CommandKind::Pending => self.show(ApiCall::unconfirmed()).await,
            CommandKind::Pay => {
                let amount = parse_number(args[0], "amount")?;
                let fee = parse_number(args[1], "fee")?;
                let payment = Payment::new(amount, fee, args[2], args[3]);
                let response = submit_payment(self.api, host, &payment).await?;
                writeln!(self.out, "{}", pretty(&response))?;
                Ok(Flow::Continue)
            }
            CommandKind::AllAddresses => {
                let addresses = list_all_addresses(self.api, host, config.peer_port).await?;
                let value = serde_json::to_value(&addresses)?;
                writeln!(self.out, "{}", pretty(&value))?;
                Ok(Flow::Continue)
            }
            CommandKind::Balances => {
                for (address, balance) in all_balances(self.api, host, config.peer_port).await? {
                    writeln!(self.out, "{}: {}", address, balance)?;
                }
                Ok(Flow::Continue)
            }
            CommandKind::Test => {
                for (ip, height) in peer_heights(self.api, host, config.peer_port).await? {
                    writeln!(self.out, "{}: {}", ip, pretty(&height))?;
                }
                Ok(Flow::Continue)
            }
            CommandKind::Random => {
                let results =
                    make_random_transactions(self.api, host, config.peer_port, &mut self.rng, config.random)
                        .await?;
                for response in &results {
                    writeln!(self.out, "{}", pretty(response))?;
                }
                Ok(Flow::Continue)
            }
            CommandKind::Read => {
                run_script(self.api, Path::new(args[0]), &mut self.out).await?;
                Ok(Flow::Continue)
            }
            CommandKind::Save => {
                self.save().await?;
                Ok(Flow::Continue)
            }
            CommandKind::Help => {
                self.help()?;
                Ok(Flow::Continue)
            }
            CommandKind::Exit => {
                self.save().await?;
                Ok(Flow::Exit)
            }
        }
    }
}
