//! Progress callback for multi-route conflation runs.
//!
//! Routes may complete on parallel threads, so implementations must be
//! `Send + Sync`.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// Trait for receiving progress updates during [`crate::conflate_routes`].
pub trait ConflateProgress: Send + Sync {
    /// Called once before any route is processed.
    fn on_start(&self, total_routes: u32);
    /// Called after each route finishes, successfully or not.
    fn on_route_done(&self, route_id: &str);
}

/// No-op implementation.
pub struct NoopProgress;

impl ConflateProgress for NoopProgress {
    fn on_start(&self, _total_routes: u32) {}
    fn on_route_done(&self, _route_id: &str) {}
}

/// Atomic progress tracker that can be polled from another thread.
pub struct AtomicProgressTracker {
    pub last_route: Mutex<String>,
    pub completed: AtomicU32,
    pub total: AtomicU32,
}

impl Default for AtomicProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomicProgressTracker {
    pub fn new() -> Self {
        Self {
            last_route: Mutex::new(String::new()),
            completed: AtomicU32::new(0),
            total: AtomicU32::new(0),
        }
    }

    /// Completed / total, or 0.0 before the run starts.
    pub fn fraction(&self) -> f64 {
        let total = self.total.load(Ordering::SeqCst);
        if total == 0 {
            return 0.0;
        }
        f64::from(self.completed.load(Ordering::SeqCst)) / f64::from(total)
    }
}

impl ConflateProgress for AtomicProgressTracker {
    fn on_start(&self, total_routes: u32) {
        self.completed.store(0, Ordering::SeqCst);
        self.total.store(total_routes, Ordering::SeqCst);
    }

    fn on_route_done(&self, route_id: &str) {
        if let Ok(mut last) = self.last_route.lock() {
            *last = route_id.to_string();
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}
