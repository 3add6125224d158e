//! Core data types for the DEX price scanner.

pub mod address;
pub mod amount;
pub mod chain;
pub mod opportunity;
pub mod price;
pub mod registry;
pub mod token;
pub mod venue;

pub use address::*;
pub use amount::*;
pub use chain::*;
pub use opportunity::*;
pub use price::*;
pub use registry::*;
pub use token::*;
pub use venue::*;
