//! In-flight request accounting.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts sub-fetches that have started but not finished.
///
/// The dashboard is loading while the count is above zero, so overlapping
/// fetches cannot clear each other's loading state.
#[derive(Debug, Clone, Default)]
pub struct LoadingTracker {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingTracker {
    /// Create an idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one sub-fetch as started. It finishes when the guard drops.
    #[must_use = "the fetch counts as finished as soon as the guard is dropped"]
    pub fn start(&self) -> LoadingGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// True while any sub-fetch is incomplete.
    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }

    /// Number of incomplete sub-fetches.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Keeps a sub-fetch counted as in flight.
#[derive(Debug)]
pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_guards() {
        let tracker = LoadingTracker::new();
        assert!(!tracker.is_loading());

        let fast = tracker.start();
        let slow = tracker.start();
        assert_eq!(tracker.in_flight(), 2);

        drop(fast);
        assert!(tracker.is_loading());

        drop(slow);
        assert!(!tracker.is_loading());
    }

    #[test]
    fn test_clones_share_the_count() {
        let tracker = LoadingTracker::new();
        let observer = tracker.clone();
        let _guard = tracker.start();
        assert!(observer.is_loading());
    }

    #[tokio::test]
    async fn test_guard_released_when_task_panics() {
        let tracker = LoadingTracker::new();
        let inner = tracker.clone();
        let handle = tokio::spawn(async move {
            let _guard = inner.start();
            panic!("sub-fetch blew up");
        });

        assert!(handle.await.is_err());
        assert!(!tracker.is_loading());
    }
}
