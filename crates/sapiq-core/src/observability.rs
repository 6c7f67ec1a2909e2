use serde::{Deserialize, Serialize};

/// Snapshot of a queue's two sets, taken under the appropriate locks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Entries admitted but not yet dispatched.
    pub waiting: usize,
    /// Entries whose handler is currently executing.
    pub in_flight: usize,
}
