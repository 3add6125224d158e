//! Token and token pair definitions.

use crate::{Address, Chain};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// ERC-20 token with its deployments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token symbol (e.g., "WETH", "USDC")
    pub symbol: CompactString,
    /// Decimal places (e.g., 18 for WETH, 6 for USDC)
    pub decimals: u8,
    /// Contract address per network. A token is unusable on networks it is missing from.
    #[serde(default)]
    pub addresses: BTreeMap<Chain, Address>,
}

impl Token {
    pub fn new(symbol: &str, decimals: u8) -> Self {
        Self {
            symbol: CompactString::new(symbol),
            decimals,
            addresses: BTreeMap::new(),
        }
    }

    /// Builder: add a deployment address.
    pub fn deployed_on(mut self, chain: Chain, address: Address) -> Self {
        self.addresses.insert(chain, address);
        self
    }

    #[inline]
    pub fn address_on(&self, chain: Chain) -> Option<Address> {
        self.addresses.get(&chain).copied()
    }
}

/// Base/quote pair sampled with a fixed probe amount of the base token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub base: CompactString,
    pub quote: CompactString,
    /// Decimal string so the on-chain integer can be derived exactly.
    pub amount: String,
}

impl TokenPair {
    pub fn new(base: &str, quote: &str, amount: &str) -> Self {
        Self {
            base: CompactString::new(base),
            quote: CompactString::new(quote),
            amount: amount.to_string(),
        }
    }

    /// "BASE/QUOTE"
    pub fn label(&self) -> CompactString {
        compact_str::format_compact!("{}/{}", self.base, self.quote)
    }
}

impl fmt::Display for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}
