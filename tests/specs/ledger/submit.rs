//! `munch submit` specs

use crate::prelude::*;
use serde_json::json;

fn ledger_accepting_transactions() -> RpcStub {
    RpcStub::start(vec![
        ("eth_accounts", json!([ACCOUNT])),
        ("eth_blockNumber", json!("0x10")),
        ("eth_getLogs", json!([])),
        ("eth_call", json!(encode_meals(&[]))),
        ("eth_sendTransaction", json!(TX_HASH)),
        (
            "eth_getTransactionReceipt",
            json!({ "status": "0x1", "blockNumber": "0x11" }),
        ),
    ])
}

#[test]
fn submit_reports_mining_and_mined() {
    let node = ledger_accepting_transactions();
    let temp = Project::pointing_at(node.url());

    temp.munch()
        .args(&["submit", "tacos", "truck", "hungry"])
        .passes()
        .stdout_has(&format!("Mining... {}", TX_HASH))
        .stdout_has(&format!("Mined -- {}", TX_HASH));
    assert!(node.calls().contains(&"eth_sendTransaction".to_string()));
}

#[test]
fn reverted_submission_fails() {
    let node = RpcStub::start(vec![
        ("eth_accounts", json!([ACCOUNT])),
        ("eth_blockNumber", json!("0x10")),
        ("eth_getLogs", json!([])),
        ("eth_call", json!(encode_meals(&[]))),
        ("eth_sendTransaction", json!(TX_HASH)),
        (
            "eth_getTransactionReceipt",
            json!({ "status": "0x0", "blockNumber": "0x11" }),
        ),
    ]);
    let temp = Project::pointing_at(node.url());

    temp.munch()
        .args(&["submit", "tacos", "truck", "hungry"])
        .fails()
        .stderr_has("transaction reverted");
}

#[test]
fn short_field_is_rejected_before_any_network_call() {
    let node = ledger_accepting_transactions();
    let temp = Project::pointing_at(node.url());

    temp.munch()
        .args(&["submit", "x", "truck", "hungry"])
        .fails()
        .stderr_has("Invalid what: too short");
    assert!(node.calls().is_empty());
}

#[test]
fn long_field_is_rejected() {
    let temp = Project::empty();
    let long = "y".repeat(26);

    temp.munch()
        .args(&["submit", "tacos", "truck", &long])
        .fails()
        .stderr_has("Invalid why: too long");
}

#[test]
fn node_rejection_is_reported() {
    let node = RpcStub::start(vec![
        ("eth_accounts", json!([ACCOUNT])),
        ("eth_blockNumber", json!("0x10")),
        ("eth_getLogs", json!([])),
        ("eth_call", json!(encode_meals(&[]))),
    ]);
    let temp = Project::pointing_at(node.url());

    // The stub has no eth_sendTransaction, so the node rejects the submission
    temp.munch()
        .args(&["submit", "tacos", "truck", "hungry"])
        .fails()
        .stderr_has("submission rejected");
}
