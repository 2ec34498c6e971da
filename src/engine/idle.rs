//! Network-idle detection.
//!
//! The page is idle once its document (and fonts) finished loading, no
//! request is in flight, and no new request has started for a whole quiet
//! window. Request bookkeeping comes from the browser's network events via
//! [`RequestTracker`]; [`NetworkIdle`] only sees periodic samples.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// One sample of page activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageActivity {
    /// Document and fonts finished loading.
    pub loaded: bool,
    /// Requests started but neither finished nor failed.
    pub in_flight: usize,
    /// Requests started since the document was set.
    pub started: u64,
}

/// Tracks page activity samples until a quiet window has passed.
#[derive(Debug)]
pub struct NetworkIdle {
    window: Duration,
    last_started: Option<u64>,
    quiet_since: Option<Instant>,
}

impl NetworkIdle {
    /// Create a tracker that requires `window` of quiet.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_started: None,
            quiet_since: None,
        }
    }

    /// Record one sample. Returns `true` once the page counts as idle.
    ///
    /// A sample that is not loaded, has a request in flight, or saw a new
    /// request start since the previous sample restarts the quiet window.
    pub fn observe(&mut self, activity: PageActivity, now: Instant) -> bool {
        let no_new_requests = self.last_started == Some(activity.started);
        self.last_started = Some(activity.started);

        if !activity.loaded || activity.in_flight > 0 {
            self.quiet_since = None;
            return false;
        }

        match self.quiet_since {
            Some(since) if no_new_requests => now.duration_since(since) >= self.window,
            _ => {
                self.quiet_since = Some(now);
                self.window.is_zero()
            }
        }
    }
}

/// In-flight request bookkeeping, fed from network events.
///
/// Shared between the event listener thread and the idle wait, so every
/// method takes `&self`.
#[derive(Debug, Default)]
pub struct RequestTracker {
    state: Mutex<TrackerState>,
}

#[derive(Debug, Default)]
struct TrackerState {
    pending: HashSet<String>,
    started: u64,
}

impl RequestTracker {
    /// A request was sent. Redirects reuse the id and are counted once.
    pub fn request_started(&self, request_id: &str) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.pending.insert(request_id.to_string()) {
            state.started += 1;
        }
    }

    /// A request finished or failed. Unknown ids are ignored.
    pub fn request_settled(&self, request_id: &str) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.pending.remove(request_id);
    }

    /// Current activity, combined with the document's load state.
    pub fn activity(&self, loaded: bool) -> PageActivity {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        PageActivity {
            loaded,
            in_flight: state.pending.len(),
            started: state.started,
        }
    }
}
