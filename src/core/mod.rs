//! Core Module - Scoring Logic
//!
//! SWARA weighting, indicator extraction, the neutrosophic vector, score
//! aggregation and the batch pipeline. Everything here is synchronous and
//! free of I/O apart from the optional process log.

pub mod fraud_score;
pub mod indicators;
pub mod neutrosophic;
pub mod pipeline;
pub mod swara;

pub use fraud_score::*;
pub use pipeline::*;
pub use swara::*;
