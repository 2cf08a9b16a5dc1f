use thiserror::Error;

/// 客户端所有操作的错误类型
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request failed: {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("request failed: {url}: malformed JSON body: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {path}: {message}")]
    UnexpectedResponse { path: String, message: String },

    #[error("script line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid base58 character {ch:?} at position {position}")]
    InvalidBase58Char { ch: char, position: usize },

    #[error("malformed peer address: {0:?}")]
    PeerAddress(String),

    #[error("not enough peers: need {needed}, found {found}")]
    NotEnoughPeers { needed: usize, found: usize },

    #[error("invalid amount range: {lower} > {upper}")]
    InvalidRange { lower: u64, upper: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ClientError {
    pub(crate) fn unexpected(path: &str, message: impl Into<String>) -> Self {
        ClientError::UnexpectedResponse {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
