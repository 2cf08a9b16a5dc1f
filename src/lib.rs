pub mod api;
pub mod app;
pub mod base58;
pub mod cli;
pub mod collect;
pub mod config;
pub mod console;
pub mod difficulty;
pub mod error;
pub mod peers;
pub mod rpc;
pub mod script;
pub mod transaction;

pub use api::{ApiCall, Host, Method, Payload};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use rpc::{HttpNode, NodeApi};
