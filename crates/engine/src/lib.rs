//! Arbitrage detection engine.
//!
//! Per-network price collection, cross-venue opportunity detection, and the
//! pipeline that ties the two together for one network.

pub mod collector;
pub mod detector;
pub mod error;
pub mod pipeline;

pub use collector::*;
pub use detector::*;
pub use error::*;
pub use pipeline::*;
