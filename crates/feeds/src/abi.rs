//! Minimal ABI codec for `getAmountsOut(uint256,address[])`.
//!
//! Only the static head / dynamic tail layout needed for a single
//! `uint256[]` return value is supported.

use crate::QuoteError;
use scanner_core::Address;

/// `bytes4(keccak256("getAmountsOut(uint256,address[])"))`
pub const GET_AMOUNTS_OUT_SELECTOR: [u8; 4] = [0xd0, 0x6c, 0xa6, 0x1f];

const WORD: usize = 32;

fn u128_word(value: u128) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

fn address_word(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// Read a 32-byte big-endian word as `u128`. `None` if the high half is set.
fn word_to_u128(word: &[u8]) -> Option<u128> {
    if word.len() != WORD || word[..16].iter().any(|&b| b != 0) {
        return None;
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    Some(u128::from_be_bytes(low))
}

fn word_at(data: &[u8], offset: usize) -> Result<&[u8], QuoteError> {
    offset
        .checked_add(WORD)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| QuoteError::Malformed(format!("response truncated at byte {}", offset)))
}

fn usize_at(data: &[u8], offset: usize) -> Result<usize, QuoteError> {
    word_to_u128(word_at(data, offset)?)
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| QuoteError::Malformed(format!("oversized offset/length at byte {}", offset)))
}

/// Calldata for `getAmountsOut(amount_in, path)`.
pub fn encode_get_amounts_out(amount_in: u128, path: &[Address]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + WORD * (3 + path.len()));
    data.extend_from_slice(&GET_AMOUNTS_OUT_SELECTOR);
    data.extend_from_slice(&u128_word(amount_in));
    // Offset of the dynamic array, measured from the start of the arguments.
    data.extend_from_slice(&u128_word(2 * WORD as u128));
    data.extend_from_slice(&u128_word(path.len() as u128));
    for address in path {
        data.extend_from_slice(&address_word(address));
    }
    data
}

/// Decode an ABI-encoded `uint256[]` return value.
pub fn decode_amounts(data: &[u8]) -> Result<Vec<u128>, QuoteError> {
    let offset = usize_at(data, 0)?;
    let len = usize_at(data, offset)?;
    let start = offset
        .checked_add(WORD)
        .ok_or_else(|| QuoteError::Malformed(format!("array offset {} out of range", offset)))?;
    let needed = len
        .checked_mul(WORD)
        .and_then(|n| n.checked_add(start))
        .ok_or_else(|| QuoteError::Malformed("array length overflow".into()))?;
    if data.len() < needed {
        return Err(QuoteError::Malformed(format!(
            "array of {} elements needs {} bytes, got {}",
            len,
            needed,
            data.len()
        )));
    }

    (0..len)
        .map(|i| word_to_u128(word_at(data, start + i * WORD)?).ok_or(QuoteError::Overflow))
        .collect()
}

/// Decode a `0x`-prefixed hex string as returned by `eth_call`.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, QuoteError> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    Ok(hex::decode(digits)?)
}
