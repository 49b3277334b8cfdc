// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Contract ABI codec for the meal ledger
//!
//! Covers exactly the contract surface the client uses:
//!
//! ```solidity
//! struct Meal { address muncher; string what; string where; string why; uint256 timestamp; }
//! function getAllMeals() view returns (Meal[]);
//! function getTotalMeals() view returns (uint256);
//! function munch(string what, string where, string why);
//! event NewMunch(address indexed from, uint256 timestamp, string what, string where, string why);
//! ```
//!
//! Integers must fit in a `u64`; anything wider is rejected as malformed.

use munch_core::{Address, Entry};
use sha3::{Digest, Keccak256};
use thiserror::Error;

pub const GET_ALL_MEALS: &str = "getAllMeals()";
pub const GET_TOTAL_MEALS: &str = "getTotalMeals()";
pub const MUNCH: &str = "munch(string,string,string)";
pub const NEW_MUNCH: &str = "NewMunch(address,uint256,string,string,string)";

const WORD: usize = 32;

/// Errors from decoding contract data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("read of {len} bytes at offset {offset} is out of bounds")]
    OutOfBounds { offset: usize, len: usize },
    #[error("integer does not fit in 64 bits")]
    Overflow,
    #[error("string is not valid utf-8")]
    InvalidUtf8,
    #[error("event has unexpected topics: {0}")]
    Topics(String),
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

/// First four bytes of the signature hash
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Topic identifying `NewMunch` logs
pub fn new_munch_topic() -> [u8; 32] {
    keccak256(NEW_MUNCH.as_bytes())
}

pub fn encode_get_all_meals() -> Vec<u8> {
    selector(GET_ALL_MEALS).to_vec()
}

pub fn encode_get_total_meals() -> Vec<u8> {
    selector(GET_TOTAL_MEALS).to_vec()
}

/// Calldata for `munch(what, where, why)`
pub fn encode_munch(what: &str, place: &str, why: &str) -> Vec<u8> {
    let mut out = selector(MUNCH).to_vec();
    out.extend(encode_strings(&[what, place, why]));
    out
}

/// Head/tail encoding of a tuple of strings
fn encode_strings(values: &[&str]) -> Vec<u8> {
    let mut head = Vec::with_capacity(values.len() * WORD);
    let mut tail = Vec::new();
    let head_len = values.len() * WORD;

    for value in values {
        head.extend_from_slice(&uint_word((head_len + tail.len()) as u64));
        tail.extend_from_slice(&uint_word(value.len() as u64));
        tail.extend_from_slice(value.as_bytes());
        let padding = (WORD - value.len() % WORD) % WORD;
        tail.resize(tail.len() + padding, 0);
    }

    head.extend(tail);
    head
}

fn uint_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Bounds-checked reader over ABI-encoded bytes
struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], AbiError> {
        let end = offset
            .checked_add(len)
            .ok_or(AbiError::OutOfBounds { offset, len })?;
        self.data
            .get(offset..end)
            .ok_or(AbiError::OutOfBounds { offset, len })
    }

    fn word(&self, offset: usize) -> Result<[u8; 32], AbiError> {
        let mut word = [0u8; 32];
        word.copy_from_slice(self.bytes(offset, WORD)?);
        Ok(word)
    }

    fn uint(&self, offset: usize) -> Result<u64, AbiError> {
        word_to_u64(&self.word(offset)?)
    }

    /// A length or offset; bounded by the data so it can be used for indexing
    fn index(&self, offset: usize) -> Result<usize, AbiError> {
        let value = usize::try_from(self.uint(offset)?).map_err(|_| AbiError::Overflow)?;
        if value > self.data.len() {
            return Err(AbiError::OutOfBounds {
                offset: value,
                len: 0,
            });
        }
        Ok(value)
    }

    fn address(&self, offset: usize) -> Result<Address, AbiError> {
        Ok(Address::from_word(&self.word(offset)?))
    }

    /// String whose offset word sits at `head`, relative to `base`
    fn string(&self, base: usize, head: usize) -> Result<String, AbiError> {
        let start = base
            .checked_add(self.index(head)?)
            .ok_or(AbiError::Overflow)?;
        let len = self.index(start)?;
        let raw = self.bytes(start + WORD, len)?;
        String::from_utf8(raw.to_vec()).map_err(|_| AbiError::InvalidUtf8)
    }
}

pub fn word_to_u64(word: &[u8; 32]) -> Result<u64, AbiError> {
    if word[..24].iter().any(|b| *b != 0) {
        return Err(AbiError::Overflow);
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[24..]);
    Ok(u64::from_be_bytes(low))
}

/// Decode the return data of `getTotalMeals()`
pub fn decode_total(data: &[u8]) -> Result<u64, AbiError> {
    Reader::new(data).uint(0)
}

/// Decode the return data of `getAllMeals()`
pub fn decode_meals(data: &[u8]) -> Result<Vec<Entry>, AbiError> {
    let reader = Reader::new(data);
    let array = reader.index(0)?;
    let count = reader.index(array)?;
    let elements = array + WORD;

    let mut meals = Vec::with_capacity(count.min(data.len() / WORD));
    for i in 0..count {
        let tuple = elements
            .checked_add(reader.index(elements + i * WORD)?)
            .ok_or(AbiError::Overflow)?;
        let submitter = reader.address(tuple)?;
        let what = reader.string(tuple, tuple + WORD)?;
        let place = reader.string(tuple, tuple + 2 * WORD)?;
        let why = reader.string(tuple, tuple + 3 * WORD)?;
        let submitted_at = reader.uint(tuple + 4 * WORD)?;
        meals.push(Entry::new(submitter, submitted_at, what, place, why));
    }
    Ok(meals)
}

/// Decode a `NewMunch` log.
///
/// `from` is normally indexed (second topic). Deployments that left it
/// unindexed carry it as the first data word instead.
pub fn decode_new_munch(topics: &[[u8; 32]], data: &[u8]) -> Result<Entry, AbiError> {
    let Some(first) = topics.first() else {
        return Err(AbiError::Topics("missing event signature".to_string()));
    };
    if *first != new_munch_topic() {
        return Err(AbiError::Topics("not a NewMunch event".to_string()));
    }

    let reader = Reader::new(data);
    let (submitter, head) = match topics.len() {
        2 => (Address::from_word(&topics[1]), 0),
        1 => (reader.address(0)?, WORD),
        n => return Err(AbiError::Topics(format!("expected 1 or 2 topics, got {}", n))),
    };

    // String offsets are relative to the start of the data section
    let submitted_at = reader.uint(head)?;
    let what = reader.string(0, head + WORD)?;
    let place = reader.string(0, head + 2 * WORD)?;
    let why = reader.string(0, head + 3 * WORD)?;
    Ok(Entry::new(submitter, submitted_at, what, place, why))
}

#[cfg(test)]
#[path = "abi_tests.rs"]
mod tests;
