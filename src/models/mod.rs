//! Models Module - Data Structures & Configuration
//!
//! Value objects, configuration and the error taxonomy shared by every layer.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
