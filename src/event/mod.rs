//! Telemetry record ingestion: raw record parsing and validated types.

pub mod parser;
pub mod types;

// Re-export commonly used types
pub use parser::{parse_record, ValidationError};
pub use types::Event;
