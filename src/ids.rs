//! Identifier Source
//!
//! Reservations and notifications are keyed by their creation time in
//! milliseconds. Two records created in the same millisecond would collide,
//! so the source never hands out a value less than or equal to the last one.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Strictly increasing, timestamp-derived identifiers
#[derive(Debug, Default)]
pub struct TimestampIds {
    last: AtomicI64,
}

impl TimestampIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start above an existing set of identifiers (e.g. seeded records)
    pub fn starting_after(floor: i64) -> Self {
        Self {
            last: AtomicI64::new(floor),
        }
    }

    /// Next identifier: the current time in ms, or `last + 1` if the clock
    /// has not moved past the previous value
    pub fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let ids = TimestampIds::new();
        let mut previous = ids.next();
        for _ in 0..1000 {
            let id = ids.next();
            assert!(id > previous);
            previous = id;
        }
    }

    #[test]
    fn test_ids_track_wall_clock() {
        let before = Utc::now().timestamp_millis();
        let id = TimestampIds::new().next();
        assert!(id >= before);
    }

    #[test]
    fn test_floor_is_respected() {
        let far_future = Utc::now().timestamp_millis() + 1_000_000;
        let ids = TimestampIds::starting_after(far_future);
        assert_eq!(ids.next(), far_future + 1);
        assert_eq!(ids.next(), far_future + 2);
    }
}
