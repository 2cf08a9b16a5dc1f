use crate::error::{ClientError, ClientResult};
use num_bigint::BigUint;

/// 将 base58 字符串（Bitcoin 字母表，不含 `0` `O` `I` `l`）解码为非负整数，
/// 末位字符为最低位
pub fn decode_base58(input: &str) -> ClientResult<BigUint> {
    let bytes = bs58::decode(input).into_vec().map_err(|e| match e {
        bs58::decode::Error::InvalidCharacter { character, index } => ClientError::InvalidBase58Char {
            ch: character,
            position: index,
        },
        bs58::decode::Error::NonAsciiCharacter { index } => ClientError::InvalidBase58Char {
            ch: input.get(index..).and_then(|rest| rest.chars().next()).unwrap_or(char::REPLACEMENT_CHARACTER),
            position: index,
        },
        other => ClientError::InvalidArgument(format!("base58 {:?}: {}", input, other)),
    })?;
    Ok(BigUint::from_bytes_be(&bytes))
}
