//! Validated network/venue/token registry.
//!
//! Built once at startup. Every pair references known tokens and has a usable
//! probe amount; whether a pair is available on a given network is answered
//! by [`Registry::resolve`].

use crate::{Address, AmountError, Chain, Token, TokenAmount, TokenPair, Venue, VenueId, MAX_DECIMALS};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no networks configured")]
    NoNetworks,
    #[error("network {0} configured more than once")]
    DuplicateNetwork(Chain),
    #[error("network {0} has no RPC endpoint")]
    MissingEndpoint(Chain),
    #[error("network {0} has no venues")]
    NoVenues(Chain),
    #[error("venue {venue} configured more than once on {network}")]
    DuplicateVenue { network: Chain, venue: VenueId },
    #[error("token {0} configured more than once")]
    DuplicateToken(CompactString),
    #[error("token {symbol} has unsupported decimals {decimals} (max 36)")]
    UnsupportedDecimals { symbol: CompactString, decimals: u8 },
    #[error("pair {pair} references unknown token {symbol}")]
    UnknownToken { pair: CompactString, symbol: CompactString },
    #[error("pair {0} uses the same token on both sides")]
    SameToken(CompactString),
    #[error("pair {pair} has invalid probe amount: {source}")]
    InvalidProbeAmount {
        pair: CompactString,
        #[source]
        source: AmountError,
    },
    #[error("pair {0} has a zero probe amount")]
    ZeroProbeAmount(CompactString),
}

/// One network: its quote endpoint and the venues deployed there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub chain: Chain,
    pub rpc_url: String,
    pub venues: Vec<Venue>,
}

/// Token resolved against one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub symbol: CompactString,
    pub address: Address,
    pub decimals: u8,
}

/// Pair resolved against one network, ready to quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPair {
    pub label: CompactString,
    pub base: ResolvedToken,
    pub quote: ResolvedToken,
    /// Probe amount in base token units.
    pub probe: TokenAmount,
}

/// Configured pair with its probe amount parsed at base token precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredPair {
    pub pair: TokenPair,
    pub probe: TokenAmount,
}

impl ConfiguredPair {
    pub fn label(&self) -> CompactString {
        self.pair.label()
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    networks: Vec<NetworkSpec>,
    tokens: BTreeMap<CompactString, Token>,
    pairs: Vec<ConfiguredPair>,
}

impl Registry {
    pub fn new(
        networks: Vec<NetworkSpec>,
        tokens: Vec<Token>,
        pairs: Vec<TokenPair>,
    ) -> Result<Self, RegistryError> {
        if networks.is_empty() {
            return Err(RegistryError::NoNetworks);
        }

        let mut seen_networks = HashSet::new();
        for network in &networks {
            if !seen_networks.insert(network.chain) {
                return Err(RegistryError::DuplicateNetwork(network.chain));
            }
            if network.rpc_url.trim().is_empty() {
                return Err(RegistryError::MissingEndpoint(network.chain));
            }
            if network.venues.is_empty() {
                return Err(RegistryError::NoVenues(network.chain));
            }
            let mut seen_venues = HashSet::new();
            for venue in &network.venues {
                if !seen_venues.insert(&venue.id) {
                    return Err(RegistryError::DuplicateVenue {
                        network: network.chain,
                        venue: venue.id.clone(),
                    });
                }
            }
        }

        let mut token_map = BTreeMap::new();
        for token in tokens {
            if token.decimals > MAX_DECIMALS {
                return Err(RegistryError::UnsupportedDecimals {
                    symbol: token.symbol.clone(),
                    decimals: token.decimals,
                });
            }
            if token_map.contains_key(&token.symbol) {
                return Err(RegistryError::DuplicateToken(token.symbol.clone()));
            }
            token_map.insert(token.symbol.clone(), token);
        }

        let mut configured = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let label = pair.label();
            let base = token_map.get(&pair.base).ok_or_else(|| RegistryError::UnknownToken {
                pair: label.clone(),
                symbol: pair.base.clone(),
            })?;
            if !token_map.contains_key(&pair.quote) {
                return Err(RegistryError::UnknownToken {
                    pair: label,
                    symbol: pair.quote.clone(),
                });
            }
            if pair.base == pair.quote {
                return Err(RegistryError::SameToken(label));
            }
            let probe = TokenAmount::parse(&pair.amount, base.decimals).map_err(|source| {
                RegistryError::InvalidProbeAmount {
                    pair: label.clone(),
                    source,
                }
            })?;
            if probe.is_zero() {
                return Err(RegistryError::ZeroProbeAmount(label));
            }
            configured.push(ConfiguredPair { pair, probe });
        }

        Ok(Self {
            networks,
            tokens: token_map,
            pairs: configured,
        })
    }

    /// Networks in configuration order.
    pub fn networks(&self) -> &[NetworkSpec] {
        &self.networks
    }

    pub fn network(&self, chain: Chain) -> Option<&NetworkSpec> {
        self.networks.iter().find(|n| n.chain == chain)
    }

    /// Pairs in configuration order.
    pub fn pairs(&self) -> &[ConfiguredPair] {
        &self.pairs
    }

    /// Resolve a pair on a network. `None` when either token has no
    /// deployment there.
    pub fn resolve(&self, chain: Chain, configured: &ConfiguredPair) -> Option<ResolvedPair> {
        let pair = &configured.pair;
        let base = self.tokens.get(&pair.base)?;
        let quote = self.tokens.get(&pair.quote)?;
        let base_address = base.address_on(chain)?;
        let quote_address = quote.address_on(chain)?;

        Some(ResolvedPair {
            label: pair.label(),
            base: ResolvedToken {
                symbol: base.symbol.clone(),
                address: base_address,
                decimals: base.decimals,
            },
            quote: ResolvedToken {
                symbol: quote.symbol.clone(),
                address: quote_address,
                decimals: quote.decimals,
            },
            probe: configured.probe,
        })
    }

    /// Pairs that resolve on `chain`, in configuration order.
    pub fn pairs_on(&self, chain: Chain) -> Vec<ResolvedPair> {
        self.pairs
            .iter()
            .filter_map(|pair| self.resolve(chain, pair))
            .collect()
    }
}
