//! Configuration resolution specs

use crate::prelude::*;

#[test]
fn defaults_without_config_file() {
    let temp = Project::empty();

    temp.munch()
        .args(&["config"])
        .passes()
        .stdout_has("rpc_url = \"http://127.0.0.1:8545\"")
        .stdout_has("contract_address = \"0x58e4b3830e0fddeb90ed22b6cbea55c49cecfd6b\"")
        .stdout_has("gas_limit = 300000")
        .stdout_has("poll_interval = \"4s\"");
}

#[test]
fn local_config_file_is_picked_up() {
    let temp = Project::empty();
    temp.file("munch.toml", "rpc_url = \"http://node.test:8545\"\n");

    temp.munch()
        .args(&["config"])
        .passes()
        .stdout_has("rpc_url = \"http://node.test:8545\"");
}

#[test]
fn explicit_config_path_wins() {
    let temp = Project::empty();
    temp.file("munch.toml", "rpc_url = \"http://local.test\"\n");
    temp.file("other.toml", "rpc_url = \"http://other.test\"\n");

    temp.munch()
        .args(&["--config", "other.toml", "config"])
        .passes()
        .stdout_has("http://other.test")
        .stdout_lacks("http://local.test");
}

#[test]
fn environment_overrides_file() {
    let temp = Project::empty();
    temp.file("munch.toml", "rpc_url = \"http://file.test\"\n");

    temp.munch()
        .env("MUNCH_RPC_URL", "http://env.test")
        .args(&["config"])
        .passes()
        .stdout_has("rpc_url = \"http://env.test\"");
}

#[test]
fn malformed_config_fails() {
    let temp = Project::empty();
    temp.file("munch.toml", "rpc_url = [\n");

    temp.munch()
        .args(&["config"])
        .fails()
        .stderr_has("failed to load config");
}

#[test]
fn invalid_contract_override_fails() {
    let temp = Project::empty();

    temp.munch()
        .env("MUNCH_CONTRACT", "0x1234")
        .args(&["config"])
        .fails()
        .stderr_has("contract_address");
}
