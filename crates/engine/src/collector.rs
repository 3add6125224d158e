//! Per-network price collection.
//!
//! For every venue on the network, asks the quote source how much quote token
//! the probe amount of base token buys, and normalizes that to a per-unit
//! price. Venue failures are dropped; the rest of the venues still count.

use crate::ScanError;
use scanner_core::{Chain, PriceQuote, ResolvedPair, TokenAmount, Venue};
use scanner_feeds::{QuoteError, QuoteSource};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct PriceCollector {
    network: Chain,
    venues: Vec<Venue>,
    source: Arc<dyn QuoteSource>,
}

impl PriceCollector {
    pub fn new(network: Chain, venues: Vec<Venue>, source: Arc<dyn QuoteSource>) -> Self {
        Self {
            network,
            venues,
            source,
        }
    }

    pub fn network(&self) -> Chain {
        self.network
    }

    /// Collect quotes for `pair` from every venue on this network.
    ///
    /// Errors only when every venue was unreachable; the caller decides
    /// whether that abandons the network.
    pub async fn collect(&self, pair: &ResolvedPair) -> Result<Vec<PriceQuote>, ScanError> {
        let mut quotes = Vec::with_capacity(self.venues.len());
        let mut unreachable: Option<QuoteError> = None;
        let mut unreachable_count = 0usize;

        for venue in &self.venues {
            match self.quote_venue(venue, pair).await {
                Ok(Some(quote)) => {
                    debug!(
                        network = %self.network,
                        pair = %pair.label,
                        venue = %venue.id,
                        price = quote.price,
                        "Quote"
                    );
                    quotes.push(quote);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        network = %self.network,
                        pair = %pair.label,
                        venue = %venue.id,
                        error = %e,
                        "Quote failed"
                    );
                    if e.is_unreachable() {
                        unreachable_count += 1;
                        unreachable = Some(e);
                    }
                }
            }
        }

        if unreachable_count == self.venues.len() {
            if let Some(source) = unreachable {
                return Err(ScanError::EndpointUnreachable {
                    network: self.network,
                    source,
                });
            }
        }

        Ok(quotes)
    }

    /// `Ok(None)` when the venue answered with a zero amount.
    async fn quote_venue(
        &self,
        venue: &Venue,
        pair: &ResolvedPair,
    ) -> Result<Option<PriceQuote>, QuoteError> {
        let amount_out = self
            .source
            .amounts_out(venue.router, pair.base.address, pair.quote.address, pair.probe.raw)
            .await?;

        if amount_out == 0 {
            debug!(
                network = %self.network,
                pair = %pair.label,
                venue = %venue.id,
                "Venue quoted zero output"
            );
            return Ok(None);
        }

        Ok(Some(PriceQuote::new(
            venue.id.clone(),
            unit_price(amount_out, pair.quote.decimals, pair.probe),
        )))
    }
}

/// Quote-token units per one base token.
pub fn unit_price(amount_out: u128, quote_decimals: u8, probe: TokenAmount) -> f64 {
    TokenAmount::from_raw(amount_out, quote_decimals).to_f64() / probe.to_f64()
}
