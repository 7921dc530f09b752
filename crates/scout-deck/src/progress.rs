//! Thread-safe progress protocol (spec §4.4 "Progress reporting").
//!
//! The worker only ever writes to a mutex-guarded snapshot; it never calls
//! into caller-supplied UI code directly. A caller polls [`ProgressHandle::snapshot`]
//! (or drives a callback itself from its own thread) to render updates.

use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub percentage: u8,
    pub status: String,
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self { percentage: 0, status: "starting".to_string() }
    }
}

#[derive(Clone, Default)]
pub struct ProgressHandle {
    inner: Arc<Mutex<ProgressSnapshot>>,
}

impl ProgressHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, percentage: u8, status: impl Into<String>) {
        let mut guard = self.inner.lock();
        guard.percentage = percentage;
        guard.status = status.into();
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.inner.lock().clone()
    }
}

/// `40 + floor(i / total * 50)`, the per-slide progress formula from
/// the ITERATE state.
pub fn slide_progress(slide_index: u32, total: u32) -> u8 {
    if total == 0 {
        return 40;
    }
    let fraction = (slide_index as f64 / total as f64 * 50.0).floor();
    (40.0 + fraction) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_reports_latest_write() {
        let handle = ProgressHandle::new();
        handle.set(10, "Loading DocSend page...");
        handle.set(30, "Content found");
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.percentage, 30);
        assert_eq!(snapshot.status, "Content found");
    }

    #[test]
    fn slide_progress_scales_between_40_and_90() {
        assert_eq!(slide_progress(0, 10), 40);
        assert_eq!(slide_progress(5, 10), 65);
        assert_eq!(slide_progress(9, 10), 85);
    }

    #[test]
    fn slide_progress_handles_zero_total() {
        assert_eq!(slide_progress(0, 0), 40);
    }
}
