//! `munch count` specs

use crate::prelude::*;
use serde_json::json;

#[test]
fn count_prints_ledger_total() {
    let node = RpcStub::start(vec![("eth_call", json!(encode_uint(3)))]);
    let temp = Project::pointing_at(node.url());

    temp.munch()
        .args(&["count"])
        .passes()
        .stdout_has("Total meals: 3");
    assert_eq!(node.calls(), vec!["eth_call".to_string()]);
}

#[test]
fn count_against_unreachable_node_fails() {
    let temp = Project::pointing_at("http://127.0.0.1:9");

    temp.munch()
        .args(&["count"])
        .fails()
        .stderr_has("network error");
}
