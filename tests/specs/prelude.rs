//! Shared helpers for CLI specs

#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process::Output;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Account the canned wallet hands out
pub const ACCOUNT: &str = "0x0000000000000000000000000000000000000abc";

/// Hash the canned wallet returns for every transaction
pub const TX_HASH: &str = "0xabababababababababababababababababababababababababababababababab";

// =============================================================================
// Project
// =============================================================================

/// Temporary working directory for one CLI invocation
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Project with a `munch.toml` pointing every endpoint at `url`
    pub fn pointing_at(url: &str) -> Self {
        let project = Self::empty();
        project.file(
            "munch.toml",
            &format!("rpc_url = \"{}\"\npoll_interval = \"20ms\"\n", url),
        );
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str, content: &str) {
        std::fs::write(self.dir.path().join(name), content).unwrap();
    }

    pub fn munch(&self) -> Cli {
        let mut cmd = Command::cargo_bin("munch").unwrap();
        cmd.current_dir(self.path())
            .env_remove("MUNCH_CONFIG")
            .env_remove("MUNCH_RPC_URL")
            .env_remove("MUNCH_WALLET_URL")
            .env_remove("MUNCH_CONTRACT")
            .env_remove("RUST_LOG");
        Cli { cmd }
    }
}

// =============================================================================
// CLI runner
// =============================================================================

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        assert!(
            output.status.success(),
            "expected success, got {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    pub fn fails(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        assert!(
            !output.status.success(),
            "expected failure\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        );
        RunAssert { output }
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).to_string()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).to_string()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout missing {:?}:\n{}",
            expected,
            stdout
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout unexpectedly has {:?}:\n{}",
            unexpected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr missing {:?}:\n{}",
            expected,
            stderr
        );
        self
    }
}

// =============================================================================
// Canned JSON-RPC endpoint
// =============================================================================

/// HTTP JSON-RPC endpoint answering each method with a fixed result.
///
/// Unknown methods get a "method not found" error.
pub struct RpcStub {
    url: String,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RpcStub {
    pub fn start(results: Vec<(&str, Value)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let results: HashMap<String, Value> = results
            .into_iter()
            .map(|(method, value)| (method.to_string(), value))
            .collect();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&calls);
        std::thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                serve(stream, &results, &recorded);
            }
        });

        Self { url, calls }
    }

    /// Wallet with an authorized account and an empty ledger
    pub fn empty_ledger() -> Self {
        Self::start(vec![
            ("eth_accounts", json!([ACCOUNT])),
            ("eth_blockNumber", json!("0x10")),
            ("eth_getLogs", json!([])),
            ("eth_call", json!(encode_meals(&[]))),
        ])
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn serve(stream: TcpStream, results: &HashMap<String, Value>, calls: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(stream);
    let mut content_length = 0;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            return;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0u8; content_length];
    if reader.read_exact(&mut body).is_err() {
        return;
    }
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let method = request["method"].as_str().unwrap_or_default().to_string();
    calls.lock().unwrap().push(method.clone());

    let response = match results.get(&method) {
        Some(result) => json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }),
        None => json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "error": { "code": -32601, "message": "method not found" }
        }),
    };
    let payload = response.to_string();
    let mut stream = reader.into_inner();
    let _ = write!(
        stream,
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        payload.len(),
        payload
    );
    let _ = stream.flush();
}

// =============================================================================
// ABI helpers
// =============================================================================

fn word(value: u64) -> String {
    format!("{:064x}", value)
}

fn string_tail(s: &str) -> String {
    let mut hex: String = s.bytes().map(|b| format!("{:02x}", b)).collect();
    let padded = s.len().div_ceil(32).max(1) * 64;
    while hex.len() < padded {
        hex.push('0');
    }
    format!("{}{}", word(s.len() as u64), hex)
}

/// One uint256 return value
pub fn encode_uint(value: u64) -> String {
    format!("0x{}", word(value))
}

/// Return data of `getAllMeals()` for `(what, where, why, timestamp)` meals by ACCOUNT
pub fn encode_meals(meals: &[(&str, &str, &str, u64)]) -> String {
    let mut tuples = Vec::new();
    for (what, place, why, at) in meals {
        let tails = [string_tail(what), string_tail(place), string_tail(why)];
        let mut offset = 5 * 32;
        let mut head = format!("{:0>64}", ACCOUNT.trim_start_matches("0x"));
        for tail in &tails {
            head.push_str(&word(offset as u64));
            offset += tail.len() / 2;
        }
        head.push_str(&word(*at));
        tuples.push(format!("{}{}", head, tails.concat()));
    }

    let mut out = word(0x20);
    out.push_str(&word(meals.len() as u64));
    let mut offset = meals.len() * 32;
    for tuple in &tuples {
        out.push_str(&word(offset as u64));
        offset += tuple.len() / 2;
    }
    for tuple in &tuples {
        out.push_str(tuple);
    }
    format!("0x{}", out)
}
