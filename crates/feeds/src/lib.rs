//! Price quote sources.
//!
//! - `source` - the `QuoteSource` trait the scan pipeline depends on
//! - `rpc` - `eth_call` implementation against Uniswap-V2-style routers
//! - `abi` - calldata/return encoding for `getAmountsOut`

pub mod abi;
pub mod error;
pub mod rpc;
pub mod source;

pub use error::*;
pub use rpc::RpcQuoteSource;
pub use source::QuoteSource;
