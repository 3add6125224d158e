//! Cross-venue opportunity detection.
//!
//! Reduces the quotes for one pair on one network to at most one opportunity:
//! buy at the cheapest venue, sell at the most expensive one.

use scanner_core::{spread_pct, Chain, Opportunity, PriceQuote};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for the opportunity detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum spread in percent (inclusive) to report.
    pub min_spread_pct: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self { min_spread_pct: 0.5 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OpportunityDetector {
    config: DetectorConfig,
}

impl OpportunityDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Detect an opportunity among `quotes`.
    ///
    /// Non-positive or non-finite prices are ignored. Ties go to the quote
    /// seen first, so venue order decides which of two equal prices is used.
    pub fn detect(&self, network: Chain, pair: &str, quotes: &[PriceQuote]) -> Option<Opportunity> {
        let valid: Vec<&PriceQuote> = quotes.iter().filter(|q| q.is_valid()).collect();
        if valid.len() < 2 {
            return None;
        }

        let mut buy = 0;
        let mut sell = 0;
        for (i, quote) in valid.iter().enumerate().skip(1) {
            if quote.price < valid[buy].price {
                buy = i;
            }
            if quote.price > valid[sell].price {
                sell = i;
            }
        }
        // All prices equal: keep the sides on distinct venues.
        if buy == sell {
            sell = if buy == 0 { 1 } else { 0 };
        }

        let spread = spread_pct(valid[buy].price, valid[sell].price);
        if spread < self.config.min_spread_pct {
            debug!(
                network = %network,
                pair = pair,
                spread_pct = spread,
                "Spread below threshold"
            );
            return None;
        }

        Some(Opportunity::new(
            network,
            pair.into(),
            valid[buy].clone(),
            valid[sell].clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(venue: &str, price: f64) -> PriceQuote {
        PriceQuote::new(venue.into(), price)
    }

    fn detector(threshold: f64) -> OpportunityDetector {
        OpportunityDetector::new(DetectorConfig {
            min_spread_pct: threshold,
        })
    }

    #[test]
    fn test_detector_config_default() {
        assert_eq!(DetectorConfig::default().min_spread_pct, 0.5);
    }

    #[test]
    fn test_weth_usdc_scenario() {
        let quotes = vec![quote("venueA", 3000.0), quote("venueB", 3020.0)];

        let opp = detector(0.5)
            .detect(Chain::Ethereum, "WETH/USDC", &quotes)
            .unwrap();
        assert_eq!(opp.network, Chain::Ethereum);
        assert_eq!(opp.pair.as_str(), "WETH/USDC");
        assert_eq!(opp.buy.venue.as_str(), "venueA");
        assert_eq!(opp.buy.price, 3000.0);
        assert_eq!(opp.sell.venue.as_str(), "venueB");
        assert_eq!(opp.sell.price, 3020.0);
        assert_eq!(format!("{:.2}", opp.spread_pct), "0.67");

        assert!(detector(1.0)
            .detect(Chain::Ethereum, "WETH/USDC", &quotes)
            .is_none());
    }

    #[test]
    fn test_fewer_than_two_quotes() {
        let d = detector(0.0);
        assert!(d.detect(Chain::Ethereum, "X/Y", &[]).is_none());
        assert!(d.detect(Chain::Ethereum, "X/Y", &[quote("a", 1.0)]).is_none());
        // Only one valid quote once invalid prices are discarded.
        assert!(d
            .detect(Chain::Ethereum, "X/Y", &[quote("a", 1.0), quote("b", 0.0), quote("c", -5.0)])
            .is_none());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 4 -> 5 is exactly 25% with no rounding.
        let quotes = vec![quote("a", 4.0), quote("b", 5.0)];
        let opp = detector(25.0).detect(Chain::Polygon, "X/Y", &quotes).unwrap();
        assert_eq!(opp.spread_pct, 25.0);
        assert!(detector(25.000001).detect(Chain::Polygon, "X/Y", &quotes).is_none());
    }

    #[test]
    fn test_spread_over_valid_quotes_only() {
        let quotes = vec![
            quote("a", 200.0),
            quote("zero", 0.0),
            quote("b", 100.0),
            quote("nan", f64::NAN),
            quote("c", 150.0),
        ];
        let opp = detector(0.5).detect(Chain::Bsc, "X/Y", &quotes).unwrap();
        assert_eq!(opp.buy.venue.as_str(), "b");
        assert_eq!(opp.sell.venue.as_str(), "a");
        assert_eq!(opp.spread_pct, 100.0);
    }

    #[test]
    fn test_ties_take_first_in_venue_order() {
        let quotes = vec![
            quote("a", 10.0),
            quote("b", 10.0),
            quote("c", 12.0),
            quote("d", 12.0),
        ];
        let opp = detector(0.5).detect(Chain::Ethereum, "X/Y", &quotes).unwrap();
        assert_eq!(opp.buy.venue.as_str(), "a");
        assert_eq!(opp.sell.venue.as_str(), "c");
    }

    #[test]
    fn test_equal_prices_keep_distinct_venues() {
        let quotes = vec![quote("a", 10.0), quote("b", 10.0)];
        let opp = detector(0.0).detect(Chain::Ethereum, "X/Y", &quotes).unwrap();
        assert_ne!(opp.buy.venue, opp.sell.venue);
        assert_eq!(opp.spread_pct, 0.0);
    }

    #[test]
    fn test_spread_matches_formula() {
        let prices = [1.0, 1.003, 0.998, 1.01, 0.9995];
        let quotes: Vec<PriceQuote> = prices
            .iter()
            .enumerate()
            .map(|(i, p)| quote(&format!("v{i}"), *p))
            .collect();
        let opp = detector(0.0).detect(Chain::Ethereum, "X/Y", &quotes).unwrap();
        let expected = (1.01 - 0.998) / 0.998 * 100.0;
        assert!((opp.spread_pct - expected).abs() < 1e-12);
        assert_eq!(opp.buy.venue.as_str(), "v2");
        assert_eq!(opp.sell.venue.as_str(), "v3");
    }
}
