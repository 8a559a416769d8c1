//! Core aggregation for the telemetry stats agent.
//!
//! This module contains:
//! - The windowed concurrent store keyed by exact record timestamp
//! - Snapshot derivation and its canonical text form

pub mod snapshot;
pub mod store;

// Re-export commonly used types
pub use snapshot::Snapshot;
pub use store::{Bucket, WindowedStore, DEFAULT_WINDOW};
