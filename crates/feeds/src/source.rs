//! Quote source abstraction.

use crate::QuoteError;
use async_trait::async_trait;
use scanner_core::Address;

/// Answers "how much `token_out` do I get for `amount_in` of `token_in` on this router".
///
/// Implementations are expected to be slow and unreliable; callers treat every
/// error as a missing quote for that venue.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn amounts_out(
        &self,
        router: Address,
        token_in: Address,
        token_out: Address,
        amount_in: u128,
    ) -> Result<u128, QuoteError>;
}
