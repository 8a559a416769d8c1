//! Point-in-time aggregate snapshot and its canonical text form.

use std::fmt;

/// Aggregate over all live buckets at one instant.
///
/// Snapshots are ephemeral: derived on every read, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Total number of merged records
    pub count: u64,
    /// Sum of all `x` values
    pub x_sum: f64,
    /// `x_sum / count`, or `0` for an empty window
    pub x_avg: f64,
    /// Sum of all `y` values
    pub y_sum: i64,
    /// `y_sum / count` as a real number, or `0` for an empty window
    pub y_avg: f64,
}

impl Snapshot {
    /// The all-zero snapshot of an empty window.
    pub fn empty() -> Self {
        Self {
            count: 0,
            x_sum: 0.0,
            x_avg: 0.0,
            y_sum: 0,
            y_avg: 0.0,
        }
    }

    /// Derive a snapshot from folded sums.
    pub fn from_sums(count: u64, x_sum: f64, y_sum: i64) -> Self {
        if count == 0 {
            return Self::empty();
        }
        Self {
            count,
            x_sum,
            x_avg: x_sum / count as f64,
            y_sum,
            y_avg: y_sum as f64 / count as f64,
        }
    }
}

/// Canonical text form: `{count},{x_sum},{x_avg},{y_sum},{y_avg}` with the
/// real-valued fields fixed at 10 fractional digits and `y_sum` rendered as
/// an exact integer.
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{:.10},{:.10},{},{:.10}",
            self.count, self.x_sum, self.x_avg, self.y_sum, self.y_avg
        )
    }
}
