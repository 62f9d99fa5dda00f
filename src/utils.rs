use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::Timestamp;

pub fn current_timestamp_millis() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or(0)
}

/// Monotonic nanoseconds since the first call in this process. Used for
/// arrival stamps; comparable within a process, meaningless across runs.
pub fn monotonic_ns() -> Timestamp {
    static ANCHOR: OnceLock<Instant> = OnceLock::new();
    ANCHOR.get_or_init(Instant::now).elapsed().as_nanos() as Timestamp
}
