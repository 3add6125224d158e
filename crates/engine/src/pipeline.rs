//! One network's collect-then-detect pipeline.

use crate::{OpportunityDetector, PriceCollector, ScanError};
use scanner_core::{Chain, NetworkSpec, Opportunity, Registry};
use scanner_feeds::QuoteSource;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of scanning every pair on one network.
#[derive(Debug, Clone, Default)]
pub struct NetworkScan {
    pub quotes_collected: usize,
    pub opportunities: Vec<Opportunity>,
}

/// Collector and detector for a single network. Holds no state between
/// cycles besides configuration.
pub struct NetworkPipeline {
    collector: PriceCollector,
    detector: OpportunityDetector,
    registry: Arc<Registry>,
}

impl NetworkPipeline {
    pub fn new(collector: PriceCollector, detector: OpportunityDetector, registry: Arc<Registry>) -> Self {
        Self {
            collector,
            detector,
            registry,
        }
    }

    /// Build the pipeline for `spec` using `source` for quotes.
    pub fn for_network(
        spec: &NetworkSpec,
        registry: Arc<Registry>,
        source: Arc<dyn QuoteSource>,
        detector: OpportunityDetector,
    ) -> Self {
        let available = registry.pairs_on(spec.chain).len();
        if available == 0 {
            info!(network = %spec.chain, "No token pairs available on this network");
        } else {
            info!(
                network = %spec.chain,
                venues = spec.venues.len(),
                pairs = available,
                "Initialized network scanner"
            );
        }
        let collector = PriceCollector::new(spec.chain, spec.venues.clone(), source);
        Self::new(collector, detector, registry)
    }

    pub fn network(&self) -> Chain {
        self.collector.network()
    }

    /// Scan all configured pairs in order.
    ///
    /// A pair whose venues are all unreachable contributes nothing and the
    /// scan moves on. The network fails only when that happened to every
    /// pair available on it.
    pub async fn scan(&self) -> Result<NetworkScan, ScanError> {
        let network = self.network();
        let mut scan = NetworkScan::default();
        let mut attempted = 0usize;
        let mut unreachable: Option<ScanError> = None;
        let mut unreachable_pairs = 0usize;

        for configured in self.registry.pairs() {
            let Some(pair) = self.registry.resolve(network, configured) else {
                debug!(
                    network = %network,
                    pair = %configured.pair,
                    "Skipping pair: token not available on this network"
                );
                continue;
            };
            attempted += 1;

            let quotes = match self.collector.collect(&pair).await {
                Ok(quotes) => quotes,
                Err(e) => {
                    warn!(network = %network, pair = %pair.label, error = %e, "No venue reachable for pair");
                    unreachable_pairs += 1;
                    unreachable = Some(e);
                    continue;
                }
            };
            scan.quotes_collected += quotes.len();

            if let Some(opp) = self.detector.detect(network, pair.label.as_str(), &quotes) {
                info!(
                    network = %network,
                    pair = %opp.pair,
                    buy = %opp.buy.venue,
                    sell = %opp.sell.venue,
                    spread_pct = format!("{:.2}", opp.spread_pct),
                    "Opportunity"
                );
                scan.opportunities.push(opp);
            }
        }

        if attempted > 0 && unreachable_pairs == attempted {
            if let Some(e) = unreachable {
                return Err(e);
            }
        }

        if scan.opportunities.is_empty() {
            debug!(network = %network, "No arbitrage opportunities found");
        }
        Ok(scan)
    }
}
