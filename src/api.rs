use crate::error::ClientError;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// POST 请求体：扁平的字符串键 JSON 对象
pub type Payload = Map<String, Value>;

/// 节点的基础地址（scheme + address + port），不带结尾的 `/`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Host(String);

impl Host {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Host(url.trim().trim_end_matches('/').to_string())
    }

    /// `ip:port` -> `http://ip:port`
    pub fn from_authority(authority: &str) -> Self {
        Host::new(format!("http://{}", authority.trim()))
    }

    pub fn peer(ip: &str, port: u16) -> Self {
        Host::new(format!("http://{}:{}", ip, port))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            other => Err(ClientError::InvalidArgument(format!(
                "unsupported method {:?}",
                other
            ))),
        }
    }
}

/// 一次 API 调用：方法、路径、位置参数和可选的 JSON 请求体
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: Method,
    pub path: String,
    pub args: Vec<String>,
    pub payload: Option<Payload>,
}

impl ApiCall {
    pub fn new(method: Method, path: impl Into<String>, args: Vec<String>, payload: Option<Payload>) -> Self {
        ApiCall {
            method,
            path: path.into(),
            args,
            payload,
        }
    }

    pub fn get(path: &str) -> Self {
        ApiCall::new(Method::Get, path, Vec::new(), None)
    }

    pub fn get_with(path: &str, arg: &str) -> Self {
        ApiCall::new(Method::Get, path, vec![arg.to_string()], None)
    }

    fn get_optional(path: &str, arg: Option<&str>) -> Self {
        match arg {
            Some(arg) => ApiCall::get_with(path, arg),
            None => ApiCall::get(path),
        }
    }

    /// `host + path + "/" + arg1 + "/" + arg2 ...`
    pub fn url(&self, host: &Host) -> String {
        let mut url = format!("{}{}", host, self.path);
        for arg in &self.args {
            url.push('/');
            url.push_str(arg);
        }
        url
    }

    pub fn addresses() -> Self {
        ApiCall::get("/addresses")
    }

    pub fn balance(address: &str) -> Self {
        ApiCall::get_with("/addresses/balance", address)
    }

    pub fn all_peers() -> Self {
        ApiCall::get("/peers/all")
    }

    pub fn connected_peers() -> Self {
        ApiCall::get("/peers/connected")
    }

    pub fn first_block() -> Self {
        ApiCall::get("/blocks/first")
    }

    pub fn last_block() -> Self {
        ApiCall::get("/blocks/last")
    }

    pub fn height() -> Self {
        ApiCall::get("/blocks/height")
    }

    pub fn block_at(height: &str) -> Self {
        ApiCall::get_with("/blocks/at", height)
    }

    pub fn base_target(height: Option<&str>) -> Self {
        ApiCall::get_optional("/consensus/basetarget", height)
    }

    pub fn generation_signature(height: Option<&str>) -> Self {
        ApiCall::get_optional("/consensus/generationsignature", height)
    }

    pub fn generating_balance(address: &str) -> Self {
        ApiCall::get_with("/consensus/generatingbalance", address)
    }

    pub fn payment(payload: Payload) -> Self {
        ApiCall::new(Method::Post, "/payment", Vec::new(), Some(payload))
    }

    pub fn transaction_info(signature: &str) -> Self {
        ApiCall::get_with("/transactions/info", signature)
    }

    pub fn address_transactions(address: &str) -> Self {
        ApiCall::get_with("/transactions/address", address)
    }

    pub fn unconfirmed() -> Self {
        ApiCall::get("/transactions/unconfirmed")
    }
}

impl fmt::Display for ApiCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        for arg in &self.args {
            write!(f, "/{}", arg)?;
        }
        Ok(())
    }
}
