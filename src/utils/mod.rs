//! Utils Module - Constants & Tabular I/O

pub mod constants;
pub mod report;

pub use constants::*;
pub use report::*;
