//! Telemetry Stats Agent - windowed aggregation over discrete telemetry records.
//!
//! This library ingests raw telemetry records, retains only those observed
//! within a trailing 60-second window, and serves an aggregate snapshot
//! (count, sums, averages) over that window on demand.
//!
//! # Guarantees
//!
//! - **Exact keying**: buckets are keyed by the record's exact timestamp;
//!   distinct timestamps never collapse into one bucket
//! - **No lost updates**: concurrent merges into one timestamp serialize on
//!   that key; merges into different keys run in parallel
//! - **Bounded retention**: records aged past the window are dropped at
//!   ingest and swept lazily on every ingest and snapshot
//! - **Overflow-safe sums**: `y` values approach 2^31, so their sum
//!   accumulates in 64-bit
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Telemetry Stats Agent                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │  Validator  │──▶│  Windowed   │──▶│  Snapshot   │        │
//! │  │ (CSV→Event) │   │   Store     │   │  (fold+fmt) │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! │         ▲                                  │                │
//! │         │                                  ▼                │
//! │   POST /event                         GET /stats            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use telemetry_stats_agent::{parse_record, WindowedStore};
//!
//! let store = WindowedStore::new();
//! let now = 1_700_000_000_000;
//!
//! let event = parse_record("1700000000000,0.0442672968,1282509067").unwrap();
//! store.ingest(event, now);
//!
//! let snapshot = store.snapshot(now);
//! assert_eq!(snapshot.count, 1);
//! ```

pub mod config;
pub mod core;
pub mod event;
pub mod server;

// Re-export key types at crate root for convenience
pub use crate::config::{Config, ConfigError};
pub use crate::core::{Snapshot, WindowedStore, DEFAULT_WINDOW};
pub use crate::event::{parse_record, Event, ValidationError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
