//! Providers Module - Transaction Sources
//!
//! Local JSON histories and the Etherscan client that fills them.

pub mod etherscan;
pub mod store;

pub use etherscan::*;
pub use store::*;
