//! Per-venue price observations.

use crate::VenueId;
use serde::{Deserialize, Serialize};

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Price of one base token in quote tokens, as seen at one venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub venue: VenueId,
    pub price: f64,
    pub observed_at_ms: u64,
}

impl PriceQuote {
    pub fn new(venue: VenueId, price: f64) -> Self {
        Self {
            venue,
            price,
            observed_at_ms: now_ms(),
        }
    }

    /// Only finite, strictly positive prices take part in comparisons.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}
