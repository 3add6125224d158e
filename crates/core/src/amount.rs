//! Fixed-point token amounts.
//!
//! On-chain amounts are integers scaled by `10^decimals`. `TokenAmount` keeps
//! the integer exact and only goes through `f64` when a price is derived.
//! Every conversion that loses precision truncates toward zero.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest decimal precision accepted; `10^36` leaves headroom in a `u128`.
pub const MAX_DECIMALS: u8 = 36;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount must not be negative: {0}")]
    Negative(String),
    #[error("amount is not a decimal number: {0}")]
    Invalid(String),
    #[error("amount overflows 128-bit integer at {decimals} decimals: {value}")]
    Overflow { value: String, decimals: u8 },
    #[error("unsupported decimals {0} (max 36)")]
    UnsupportedDecimals(u8),
}

/// Integer token amount with its decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenAmount {
    pub raw: u128,
    pub decimals: u8,
}

fn scale(decimals: u8) -> Result<u128, AmountError> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }
    Ok(10u128.pow(decimals as u32))
}

impl TokenAmount {
    /// Wrap an integer amount as returned by a contract.
    pub fn from_raw(raw: u128, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Parse a human decimal string (`"0.01"`, `"10"`, `".5"`) without going
    /// through floating point. Digits past `decimals` are truncated.
    pub fn parse(text: &str, decimals: u8) -> Result<Self, AmountError> {
        let unit = scale(decimals)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AmountError::Empty);
        }
        if text.starts_with('-') {
            return Err(AmountError::Negative(text.to_string()));
        }

        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, f),
            None => (text, ""),
        };
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(AmountError::Invalid(text.to_string()));
        }

        let overflow = || AmountError::Overflow {
            value: text.to_string(),
            decimals,
        };

        let mut raw: u128 = 0;
        for b in int_part.bytes() {
            raw = raw
                .checked_mul(10)
                .and_then(|r| r.checked_add((b - b'0') as u128))
                .ok_or_else(overflow)?;
        }
        raw = raw.checked_mul(unit).ok_or_else(overflow)?;

        let mut frac: u128 = 0;
        let kept = frac_part.len().min(decimals as usize);
        for b in frac_part.bytes().take(kept) {
            frac = frac * 10 + (b - b'0') as u128;
        }
        frac *= 10u128.pow((decimals as usize - kept) as u32);

        let raw = raw.checked_add(frac).ok_or_else(overflow)?;
        Ok(Self { raw, decimals })
    }

    /// Scale a float to an integer amount, truncating toward zero.
    pub fn from_f64(value: f64, decimals: u8) -> Result<Self, AmountError> {
        let unit = scale(decimals)?;
        if !value.is_finite() {
            return Err(AmountError::Invalid(value.to_string()));
        }
        if value < 0.0 {
            return Err(AmountError::Negative(value.to_string()));
        }
        let scaled = value * unit as f64;
        if scaled >= u128::MAX as f64 {
            return Err(AmountError::Overflow {
                value: value.to_string(),
                decimals,
            });
        }
        Ok(Self {
            raw: scaled.trunc() as u128,
            decimals,
        })
    }

    /// Amount in whole tokens.
    pub fn to_f64(self) -> f64 {
        self.raw as f64 / 10f64.powi(self.decimals as i32)
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.raw == 0
    }
}
