//! `munch meals` specs

use crate::prelude::*;
use serde_json::json;

#[test]
fn meals_on_empty_ledger() {
    let node = RpcStub::empty_ledger();
    let temp = Project::pointing_at(node.url());

    temp.munch()
        .args(&["meals"])
        .passes()
        .stdout_has("No meals yet");
}

#[test]
fn meals_prints_cards() {
    let node = RpcStub::start(vec![
        ("eth_accounts", json!([ACCOUNT])),
        ("eth_blockNumber", json!("0x10")),
        ("eth_getLogs", json!([])),
        (
            "eth_call",
            json!(encode_meals(&[
                ("toast", "home", "breakfast", 1_700_000_000),
                ("tacos", "truck", "hungry", 1_700_000_060),
            ])),
        ),
    ]);
    let temp = Project::pointing_at(node.url());

    temp.munch()
        .args(&["meals"])
        .passes()
        .stdout_has(&format!("Address: {}", ACCOUNT))
        .stdout_has("Time:    2023-11-14T22:13:20+00:00")
        .stdout_has("What:    toast")
        .stdout_has("Where:   truck")
        .stdout_has("Why:     hungry");
}

#[test]
fn meals_json() {
    let node = RpcStub::start(vec![
        ("eth_accounts", json!([ACCOUNT])),
        ("eth_blockNumber", json!("0x10")),
        ("eth_getLogs", json!([])),
        ("eth_call", json!(encode_meals(&[("soup", "cafe", "cold", 5)]))),
    ]);
    let temp = Project::pointing_at(node.url());

    let run = temp.munch().args(&["meals", "--json"]).passes();
    let meals: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();

    assert_eq!(meals[0]["what"], "soup");
    assert_eq!(meals[0]["where"], "cafe");
    assert_eq!(meals[0]["submitted_at"], 5);
}

#[test]
fn meals_subscribes_before_reading_history() {
    let node = RpcStub::empty_ledger();
    let temp = Project::pointing_at(node.url());

    temp.munch().args(&["meals"]).passes();

    let calls = node.calls();
    let block = calls.iter().position(|m| m == "eth_blockNumber").unwrap();
    let read = calls.iter().position(|m| m == "eth_call").unwrap();
    assert!(block < read, "calls: {:?}", calls);
}

#[test]
fn meals_without_authorization_fails() {
    let node = RpcStub::start(vec![("eth_accounts", json!([]))]);
    let temp = Project::pointing_at(node.url());

    temp.munch()
        .args(&["meals"])
        .fails()
        .stderr_has("No authorized wallet account")
        .stderr_has("munch connect");
    assert!(!node.calls().contains(&"eth_call".to_string()));
}
