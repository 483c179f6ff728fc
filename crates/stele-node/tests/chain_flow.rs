//! End-to-end flows on a single node: submission, production, receipts.

use stele_core::encoding::decode_data;
use stele_testkit::{
    address, transfer_request, wait_for_height, wait_for_receipt, TestNetwork,
};

#[tokio::test]
async fn genesis_starts_at_height_zero() {
    let network = TestNetwork::spawn(1, 1).await;
    let node = &network.nodes[0];
    assert_eq!(node.handle.height().await.unwrap(), 0);

    let genesis = node.handle.block_by_number(0).await.unwrap().unwrap();
    assert!(genesis.is_genesis());
    assert!(genesis.transactions.is_empty());
}

#[tokio::test]
async fn self_send_produces_block_one_and_a_receipt() {
    let network = TestNetwork::spawn(1, 1).await;
    let node = &network.nodes[0];

    let mut request = transfer_request("alice", "alice", 0);
    request.input = vec![0xca, 0xfe];
    let hash = node.handle.send_transaction(request).await.unwrap();

    let receipt = wait_for_receipt(&node.handle, hash).await.expect("receipt");
    assert_eq!(receipt.status, 1);
    assert_eq!(receipt.block_number, 1);
    assert_eq!(node.handle.height().await.unwrap(), 1);
}

#[tokio::test]
async fn pending_transaction_is_visible_before_inclusion() {
    let network = TestNetwork::spawn(1, 1).await;
    let node = &network.nodes[0];

    // Inject via gossip so nothing triggers production.
    let (peer, _rx) = network.observer().await;
    let tx = stele_core::Transaction::new(
        address("alice"),
        Some(address("bob")),
        3,
        21_000,
        1,
        Vec::new(),
        0,
    );
    network
        .inject(&peer, &stele_node::GossipMessage::Transaction(tx.clone()))
        .await;

    let mut view = None;
    for _ in 0..stele_testkit::POLL_ATTEMPTS {
        view = node.handle.transaction(tx.hash).await.unwrap();
        if view.is_some() {
            break;
        }
        tokio::time::sleep(stele_testkit::POLL_DELAY).await;
    }
    let view = view.expect("pending transaction visible");
    assert_eq!(view.block_number, None);

    node.handle.mine().await.unwrap();
    let view = node.handle.transaction(tx.hash).await.unwrap().unwrap();
    assert_eq!(view.block_number, Some(1));
}

#[tokio::test]
async fn transactions_submitted_before_production_share_one_block() {
    let network = TestNetwork::spawn(1, 1).await;
    let node = &network.nodes[0];
    let (peer, _rx) = network.observer().await;

    let t1 = stele_core::Transaction::new(
        address("alice"),
        Some(address("bob")),
        1,
        21_000,
        1,
        Vec::new(),
        0,
    );
    let t2 = stele_core::Transaction::new(
        address("carol"),
        Some(address("dave")),
        2,
        21_000,
        1,
        Vec::new(),
        0,
    );
    network
        .inject(&peer, &stele_node::GossipMessage::Transaction(t1.clone()))
        .await;
    network
        .inject(&peer, &stele_node::GossipMessage::Transaction(t2.clone()))
        .await;

    // Wait until both are pooled, then seal once.
    let mut pooled = false;
    for _ in 0..stele_testkit::POLL_ATTEMPTS {
        let first = node.handle.transaction(t1.hash).await.unwrap();
        let second = node.handle.transaction(t2.hash).await.unwrap();
        if first.is_some() && second.is_some() {
            pooled = true;
            break;
        }
        tokio::time::sleep(stele_testkit::POLL_DELAY).await;
    }
    assert!(pooled, "both transactions pooled");
    node.handle.mine().await.unwrap();

    assert_eq!(node.handle.height().await.unwrap(), 1);
    let block = node.handle.block_by_number(1).await.unwrap().unwrap();
    let hashes: Vec<_> = block.transactions.iter().map(|tx| tx.hash).collect();
    assert_eq!(hashes, vec![t1.hash, t2.hash]);
}

#[tokio::test]
async fn contract_creation_yields_code_and_contract_address() {
    let network = TestNetwork::spawn(1, 1).await;
    let node = &network.nodes[0];

    let request = stele_core::TransactionRequest {
        from: address("deployer"),
        to: None,
        value: 0,
        gas: 100_000,
        gas_price: 1,
        input: decode_data("0x606060").unwrap(),
    };
    let hash = node.handle.send_transaction(request).await.unwrap();
    let receipt = wait_for_receipt(&node.handle, hash).await.expect("receipt");

    let contract = receipt.contract_address.expect("contract address");
    let code = node.handle.code(contract).await.unwrap();
    assert_eq!(code, vec![0x60, 0x60, 0x60]);
    assert!(receipt.to.is_none());
}

#[tokio::test]
async fn raw_submission_is_included_before_returning() {
    let network = TestNetwork::spawn(1, 1).await;
    let node = &network.nodes[0];

    let hash = node
        .handle
        .send_raw_transaction(vec![1, 2, 3, 4])
        .await
        .unwrap();

    // Synchronous path: no polling needed.
    let receipt = node.handle.receipt(hash).await.unwrap().expect("receipt");
    assert_eq!(receipt.block_number, 1);
    assert_eq!(receipt.from, stele_testkit::authorities(1)[0]);
}

#[tokio::test]
async fn mine_with_empty_pool_is_a_no_op() {
    let network = TestNetwork::spawn(1, 1).await;
    let node = &network.nodes[0];
    node.handle.mine().await.unwrap();
    assert_eq!(node.handle.height().await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_receipt_is_none_not_an_error() {
    let network = TestNetwork::spawn(1, 1).await;
    let node = &network.nodes[0];
    let absent = node
        .handle
        .receipt(stele_core::TxHash::new([9; 32]))
        .await
        .unwrap();
    assert!(absent.is_none());
    assert!(!wait_for_height(&node.handle, 1).await);
}

#[tokio::test]
async fn shutdown_stops_the_loop() {
    let network = TestNetwork::spawn(1, 1).await;
    let node = network.nodes.into_iter().next().unwrap();
    node.handle.shutdown().await.unwrap();
    node.task.await.unwrap();
    assert!(node.handle.height().await.is_err());
}
