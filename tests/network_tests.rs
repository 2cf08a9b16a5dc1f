mod common;

use common::three_node_network;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scorex_client::collect::collect_data;
use scorex_client::peers::{list_all_addresses, peer_heights, PeerAddress};
use scorex_client::transaction::{make_random_transactions, split_foundation_tokens, RandomTransactions};
use scorex_client::{ClientError, Host};
use serde_json::json;

fn founder() -> Host {
    Host::new("http://10.0.0.1:9085")
}

#[tokio::test]
async fn test_survey_is_sorted() {
    let node = three_node_network(100);
    let addresses = list_all_addresses(&node, &founder(), 9085).await.unwrap();
    let expected: Vec<PeerAddress> = [("10.0.0.1", "addrA"), ("10.0.0.2", "addrB"), ("10.0.0.3", "addrC")]
        .iter()
        .map(|(ip, address)| PeerAddress {
            ip: ip.to_string(),
            address: address.to_string(),
        })
        .collect();
    assert_eq!(addresses, expected);
}

#[tokio::test]
async fn test_unreachable_peer_aborts_survey() {
    let node = common::StubNode::new().get(
        "http://10.0.0.1:9085/peers/all",
        json!([{"address": "/10.0.0.1:9084"}, {"address": "/10.0.0.9:9084"}]),
    );
    let err = list_all_addresses(&node, &founder(), 9085).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { .. }));
}

#[tokio::test]
async fn test_split_foundation_tokens() {
    let node = three_node_network(100);
    let results = split_foundation_tokens(&node, &founder(), 9085, 1).await.unwrap();

    let payments = node.payments();
    assert_eq!(results.len(), 2);
    assert_eq!(payments.len(), 2);
    // 100 / 3 = 33，余数 1 留在创始节点
    for (host, payload) in &payments {
        assert_eq!(host, &founder());
        assert_eq!(payload["amount"], 33);
        assert_eq!(payload["fee"], 1);
        assert_eq!(payload["sender"], "addrA");
        assert_ne!(payload["recipient"], "addrA");
    }
    let total: u64 = payments.iter().map(|(_, p)| p["amount"].as_u64().unwrap()).sum();
    assert!(total <= 100);
}

#[tokio::test]
async fn test_split_when_founder_not_listed() {
    // 创始节点不在 /peers/all 中：按 2 个节点平分
    let node = common::StubNode::new()
        .get("http://10.0.0.1:9085/addresses", json!(["addrA"]))
        .get("http://10.0.0.1:9085/addresses/balance/addrA", json!({"balance": 100}))
        .get(
            "http://10.0.0.1:9085/peers/all",
            json!([{"address": "/10.0.0.2:9084"}, {"address": "/10.0.0.3:9084"}]),
        )
        .get("http://10.0.0.2:9085/addresses", json!(["addrB"]))
        .get("http://10.0.0.3:9085/addresses", json!(["addrC"]));

    let results = split_foundation_tokens(&node, &founder(), 9085, 1).await.unwrap();

    let payments = node.payments();
    assert_eq!(results.len(), 2);
    assert_eq!(payments.len(), 2);
    for (host, payload) in &payments {
        assert_eq!(host, &founder());
        assert_eq!(payload["amount"], 50);
        assert_eq!(payload["fee"], 1);
        assert_eq!(payload["sender"], "addrA");
    }
    let recipients: Vec<&str> = payments.iter().map(|(_, p)| p["recipient"].as_str().unwrap()).collect();
    assert_eq!(recipients, vec!["addrB", "addrC"]);
}

#[tokio::test]
async fn test_split_without_peers_fails() {
    let node = common::StubNode::new()
        .get("http://10.0.0.1:9085/addresses", json!(["addrA"]))
        .get("http://10.0.0.1:9085/addresses/balance/addrA", json!({"balance": 10}))
        .get("http://10.0.0.1:9085/peers/all", json!([]));
    let err = split_foundation_tokens(&node, &founder(), 9085, 1).await.unwrap_err();
    assert!(matches!(err, ClientError::NotEnoughPeers { .. }));
    assert!(node.payments().is_empty());
}

#[tokio::test]
async fn test_random_transactions_properties() {
    let node = three_node_network(100);
    let mut rng = StdRng::seed_from_u64(2024);
    let params = RandomTransactions {
        count: 40,
        lower: 5,
        upper: 8,
        fee: 2,
    };

    let results = make_random_transactions(&node, &founder(), 9085, &mut rng, params)
        .await
        .unwrap();

    let payments = node.payments();
    assert_eq!(results.len(), 40);
    assert_eq!(payments.len(), 40);
    for (host, payload) in &payments {
        let amount = payload["amount"].as_u64().unwrap();
        assert!((5..=8).contains(&amount));
        assert_eq!(payload["fee"], 2);
        assert_ne!(payload["sender"], payload["recipient"]);
        // 发往发送方自己的节点
        let expected = match payload["sender"].as_str().unwrap() {
            "addrA" => "http://10.0.0.1:9085",
            "addrB" => "http://10.0.0.2:9085",
            _ => "http://10.0.0.3:9085",
        };
        assert_eq!(host.as_str(), expected);
    }
}

#[tokio::test]
async fn test_peer_heights() {
    let node = three_node_network(0)
        .get("http://10.0.0.1:9085/blocks/height", json!({"height": 4}))
        .get("http://10.0.0.2:9085/blocks/height", json!({"height": 4}))
        .get("http://10.0.0.3:9085/blocks/height", json!({"height": 3}));
    let heights = peer_heights(&node, &founder(), 9085).await.unwrap();
    assert_eq!(heights.len(), 3);
    assert_eq!(heights[2], ("10.0.0.3".to_string(), json!({"height": 3})));
}

#[tokio::test]
async fn test_collect_data_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blocks.log");
    let node = common::StubNode::new()
        .get("http://10.0.0.1:9085/blocks/height", json!({"height": 1}))
        .get(
            "http://10.0.0.1:9085/blocks/at/1",
            json!({"timestamp": 1500000000000u64, "bitcoin-consensus": {"target": "zz"}}),
        );

    let written = collect_data(&node, &founder(), &path).await.unwrap();

    assert_eq!(written, 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "1,1500000000000,3363\n");
}
