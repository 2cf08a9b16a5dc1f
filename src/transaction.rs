use crate::api::{ApiCall, Host, Payload};
use crate::error::{ClientError, ClientResult};
use crate::peers::{list_all_addresses, PeerAddress};
use crate::rpc::{expect_u64, first_address, NodeApi};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `/payment` 的请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: u64,
    pub fee: u64,
    pub sender: String,
    pub recipient: String,
}

impl Payment {
    pub fn new(amount: u64, fee: u64, sender: &str, recipient: &str) -> Self {
        Payment {
            amount,
            fee,
            sender: sender.to_string(),
            recipient: recipient.to_string(),
        }
    }

    pub fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("amount".into(), Value::from(self.amount));
        payload.insert("fee".into(), Value::from(self.fee));
        payload.insert("sender".into(), Value::from(self.sender.clone()));
        payload.insert("recipient".into(), Value::from(self.recipient.clone()));
        payload
    }

    pub fn to_call(&self) -> ApiCall {
        ApiCall::payment(self.payload())
    }
}

/// 提交一笔支付
pub async fn submit_payment<A: NodeApi + ?Sized>(api: &A, host: &Host, payment: &Payment) -> ClientResult<Value> {
    tracing::info!(
        "💸 支付: {} -> {} [{}] fee {}",
        payment.sender,
        payment.recipient,
        payment.amount,
        payment.fee
    );
    api.request(host, &payment.to_call()).await
}

/// 把创始节点的余额平均分给其他节点：amount = balance / 节点数，余数留在创始节点。
/// 多笔支付之间没有原子性，中途失败时已提交的支付不会回滚。
pub async fn split_foundation_tokens<A: NodeApi + ?Sized>(
    api: &A,
    host: &Host,
    peer_port: u16,
    fee: u64,
) -> ClientResult<Vec<Value>> {
    let this_address = first_address(&api.request(host, &ApiCall::addresses()).await?, "/addresses")?;
    let balance = expect_u64(
        &api.request(host, &ApiCall::balance(&this_address)).await?,
        "balance",
        "/addresses/balance",
    )?;

    let addresses = list_all_addresses(api, host, peer_port).await?;
    if addresses.is_empty() {
        return Err(ClientError::NotEnoughPeers { needed: 1, found: 0 });
    }
    let amount = balance / addresses.len() as u64;
    tracing::info!("🪙 余额 {} 分给 {} 个节点，每个 {}", balance, addresses.len(), amount);

    let mut results = Vec::new();
    for peer in addresses.iter().filter(|p| p.address != this_address) {
        let payment = Payment::new(amount, fee, &this_address, &peer.address);
        results.push(submit_payment(api, host, &payment).await?);
    }
    Ok(results)
}

/// 随机选择发送方与不同的接收方，金额在 [lower, upper] 内均匀分布
pub fn random_payment<R: Rng>(
    rng: &mut R,
    addresses: &[PeerAddress],
    lower: u64,
    upper: u64,
    fee: u64,
) -> ClientResult<(PeerAddress, Payment)> {
    if lower > upper {
        return Err(ClientError::InvalidRange { lower, upper });
    }
    let distinct = {
        let mut accounts: Vec<&str> = addresses.iter().map(|p| p.address.as_str()).collect();
        accounts.sort_unstable();
        accounts.dedup();
        accounts.len()
    };
    if distinct < 2 {
        return Err(ClientError::NotEnoughPeers { needed: 2, found: distinct });
    }

    let sender = &addresses[rng.gen_range(0..addresses.len())];
    let mut recipient = sender;
    while recipient.address == sender.address {
        recipient = &addresses[rng.gen_range(0..addresses.len())];
    }
    let amount = rng.gen_range(lower..=upper);
    Ok((sender.clone(), Payment::new(amount, fee, &sender.address, &recipient.address)))
}

/// 随机交易的参数：数量、金额区间（闭区间）和手续费
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomTransactions {
    pub count: usize,
    pub lower: u64,
    pub upper: u64,
    pub fee: u64,
}

impl Default for RandomTransactions {
    fn default() -> Self {
        RandomTransactions {
            count: 30,
            lower: 1,
            upper: 20,
            fee: 1,
        }
    }
}

/// 生成 count 笔随机交易，每笔发往发送方自己的节点。
/// 中途失败时已提交的交易保持不变。
pub async fn make_random_transactions<A: NodeApi + ?Sized, R: Rng>(
    api: &A,
    host: &Host,
    peer_port: u16,
    rng: &mut R,
    params: RandomTransactions,
) -> ClientResult<Vec<Value>> {
    let addresses = list_all_addresses(api, host, peer_port).await?;
    let mut results = Vec::with_capacity(params.count);
    for _ in 0..params.count {
        let (sender, payment) = random_payment(rng, &addresses, params.lower, params.upper, params.fee)?;
        let node = Host::peer(&sender.ip, peer_port);
        results.push(submit_payment(api, &node, &payment).await?);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn peer(ip: &str, address: &str) -> PeerAddress {
        PeerAddress {
            ip: ip.to_string(),
            address: address.to_string(),
        }
    }

    #[test]
    fn test_payment_payload_shape() {
        let payment = Payment::new(10, 1, "addrA", "addrB");
        let call = payment.to_call();
        assert_eq!(call.path, "/payment");
        assert_eq!(
            Value::Object(call.payload.unwrap()),
            json!({"amount": 10, "fee": 1, "sender": "addrA", "recipient": "addrB"})
        );
    }

    #[test]
    fn test_random_payment_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let addresses = vec![peer("1.1.1.1", "a"), peer("2.2.2.2", "b"), peer("3.3.3.3", "c")];
        for _ in 0..500 {
            let (sender, payment) = random_payment(&mut rng, &addresses, 3, 9, 2).unwrap();
            assert_ne!(payment.sender, payment.recipient);
            assert_eq!(sender.address, payment.sender);
            assert!((3..=9).contains(&payment.amount));
            assert_eq!(payment.fee, 2);
        }
    }

    #[test]
    fn test_random_payment_rejects_impossible_input() {
        let mut rng = StdRng::seed_from_u64(1);
        let single = vec![peer("1.1.1.1", "a"), peer("2.2.2.2", "a")];
        assert!(matches!(
            random_payment(&mut rng, &single, 1, 5, 1),
            Err(ClientError::NotEnoughPeers { needed: 2, found: 1 })
        ));
        let pair = vec![peer("1.1.1.1", "a"), peer("2.2.2.2", "b")];
        assert!(matches!(
            random_payment(&mut rng, &pair, 5, 1, 1),
            Err(ClientError::InvalidRange { lower: 5, upper: 1 })
        ));
    }
}
