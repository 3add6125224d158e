//! Network-level scan failures.

use scanner_core::Chain;
use scanner_feeds::QuoteError;
use thiserror::Error;

/// A failure that abandons one network's scan for the current cycle.
/// Per-venue quote failures never surface here.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("{network}: every venue unreachable ({source})")]
    EndpointUnreachable {
        network: Chain,
        #[source]
        source: QuoteError,
    },

    #[error("{network}: scan task failed: {reason}")]
    TaskFailed { network: Chain, reason: String },
}
