//! Renderer statistics for monitoring and health checks.
//!
//! This module provides [`RenderStats`], a snapshot of the renderer's
//! counters. The HTTP layer serves it from `GET /stats`.
//!
//! # Example
//!
//! ```rust,ignore
//! let stats = renderer.stats();
//! println!("In flight: {}/{}", stats.in_flight, stats.capacity);
//! ```

use serde::Serialize;

/// Snapshot of renderer statistics at a point in time.
///
/// # Fields
///
/// | Field | Description |
/// |-------|-------------|
/// | `in_flight` | Renders holding a concurrency slot |
/// | `completed` | Renders that returned a PDF |
/// | `failed` | Renders that returned an error (timeouts included) |
/// | `timed_out` | Renders cut off by the overall render timeout |
/// | `capacity` | Maximum concurrent renders |
/// | `available_slots` | Slots free right now |
///
/// # Example
///
/// ```rust
/// use html2pdf_service::RenderStats;
///
/// let stats = RenderStats {
///     in_flight: 2,
///     completed: 10,
///     failed: 1,
///     timed_out: 0,
///     capacity: 5,
///     available_slots: 3,
/// };
///
/// assert_eq!(stats.total(), 11);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderStats {
    /// Number of renders currently holding a slot.
    ///
    /// This value can change immediately after reading.
    pub in_flight: usize,

    /// Renders that finished with PDF bytes.
    pub completed: u64,

    /// Renders that finished with an error.
    pub failed: u64,

    /// Subset of `failed` that hit the render timeout.
    pub timed_out: u64,

    /// Configured concurrency bound.
    pub capacity: usize,

    /// Slots that a new render could take without waiting.
    pub available_slots: usize,
}

impl RenderStats {
    /// Total renders that have finished, successful or not.
    #[inline]
    pub fn total(&self) -> u64 {
        self.completed + self.failed
    }

    /// Check if a new render would start without queueing.
    #[inline]
    pub fn has_capacity(&self) -> bool {
        self.available_slots > 0
    }
}

impl std::fmt::Display for RenderStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RenderStats {{ in_flight: {}/{}, completed: {}, failed: {}, timed_out: {} }}",
            self.in_flight, self.capacity, self.completed, self.failed, self.timed_out
        )
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RenderStats {
        RenderStats {
            in_flight: 2,
            completed: 7,
            failed: 3,
            timed_out: 1,
            capacity: 5,
            available_slots: 3,
        }
    }

    #[test]
    fn test_total() {
        assert_eq!(sample().total(), 10);
    }

    #[test]
    fn test_has_capacity() {
        assert!(sample().has_capacity());

        let full = RenderStats {
            available_slots: 0,
            ..sample()
        };
        assert!(!full.has_capacity());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample().to_string(),
            "RenderStats { in_flight: 2/5, completed: 7, failed: 3, timed_out: 1 }"
        );
    }

    /// JSON keys are camelCase like the request bodies.
    #[test]
    fn test_serialize_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["inFlight"], 2);
        assert_eq!(json["timedOut"], 1);
        assert_eq!(json["availableSlots"], 3);
    }
}
