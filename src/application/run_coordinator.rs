//! Single-run exclusion for analysis runs
//!
//! Owned by the monitor and shared with background tasks through `Arc`, so
//! it can be exercised in isolation and handed to any trigger surface.

use crate::shared::Clock;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

struct RunState {
    running: AtomicBool,
    last_completed_at: Mutex<Option<DateTime<Utc>>>,
    clock: Arc<dyn Clock>,
}

/// Admits at most one analysis run at a time
#[derive(Clone)]
pub struct RunCoordinator {
    state: Arc<RunState>,
}

impl RunCoordinator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(RunState {
                running: AtomicBool::new(false),
                last_completed_at: Mutex::new(None),
                clock,
            }),
        }
    }

    /// Claims the run slot. `None` if a run is already in flight; the
    /// caller must not queue or wait.
    pub fn try_begin(&self) -> Option<RunGuard> {
        self.state
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard {
                state: Arc::clone(&self.state),
            })
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    pub fn last_completed_at(&self) -> Option<DateTime<Utc>> {
        self.state
            .last_completed_at
            .lock()
            .ok()
            .and_then(|completed| *completed)
    }
}

/// Proof of holding the run slot. Dropping it records the completion time
/// and frees the slot.
pub struct RunGuard {
    state: Arc<RunState>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        let now = self.state.clock.now();
        if let Ok(mut completed) = self.state.last_completed_at.lock() {
            *completed = Some(now);
        }
        self.state.running.store(false, Ordering::Release);
    }
}
