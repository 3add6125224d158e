//! Cross-venue price divergence on a single network.

use crate::{now_ms, Chain, PriceQuote};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Buy at the cheapest venue, sell at the most expensive one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub network: Chain,
    /// "BASE/QUOTE"
    pub pair: CompactString,
    /// Minimum-price quote.
    pub buy: PriceQuote,
    /// Maximum-price quote.
    pub sell: PriceQuote,
    /// (sell - buy) / buy * 100
    pub spread_pct: f64,
    pub detected_at_ms: u64,
}

impl Opportunity {
    pub fn new(network: Chain, pair: CompactString, buy: PriceQuote, sell: PriceQuote) -> Self {
        let spread_pct = spread_pct(buy.price, sell.price);
        Self {
            network,
            pair,
            buy,
            sell,
            spread_pct,
            detected_at_ms: now_ms(),
        }
    }
}

/// Spread in percent measured against the buy side. Zero when `buy` is not positive.
pub fn spread_pct(buy: f64, sell: f64) -> f64 {
    if buy <= 0.0 {
        return 0.0;
    }
    (sell - buy) / buy * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spread_against_buy_side() {
        let spread = spread_pct(3000.0, 3020.0);
        assert!((spread - 0.666_666_666).abs() < 1e-6);
        assert_eq!(format!("{:.2}", spread), "0.67");
    }

    #[test]
    fn test_spread_guard() {
        assert_eq!(spread_pct(0.0, 10.0), 0.0);
        assert_eq!(spread_pct(-1.0, 10.0), 0.0);
    }

    #[test]
    fn test_opportunity_new() {
        let opp = Opportunity::new(
            Chain::Ethereum,
            "WETH/USDC".into(),
            PriceQuote::new("uniswap_v2".into(), 100.0),
            PriceQuote::new("sushiswap".into(), 101.0),
        );
        assert!((opp.spread_pct - 1.0).abs() < 1e-12);
        assert_eq!(opp.network, Chain::Ethereum);
    }
}
