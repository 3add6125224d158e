//! DEX venue identifiers.

use crate::Address;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Venue name as configured, e.g. "uniswap_v2" or "sushiswap".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueId(pub CompactString);

impl VenueId {
    pub fn new(name: &str) -> Self {
        Self(CompactString::new(name))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VenueId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A router deployment on one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    /// Router contract queried for quotes.
    pub router: Address,
}

impl Venue {
    pub fn new(id: &str, router: Address) -> Self {
        Self {
            id: VenueId::new(id),
            router,
        }
    }
}
