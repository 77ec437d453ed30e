//! Timer Facility - Repeating timers delivered by polling
//!
//! The carousel needs "call me every N ms" and "stop". Ticks are counted on
//! the timer side and drained by the owner on the UI thread, so state
//! mutation and listener calls never leave that thread.
//!
//! # Implementations
//!
//! - [`ThreadTimer`] - background thread per timer, ticks counted atomically
//! - [`ManualTimer`] - deterministic timer for tests, ticks on `fire()`
//! - [`NoTimer`] - environment without timers, never schedules
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use longevity_landing::timer::{ThreadTimer, TimerFacility};
//!
//! let handle = ThreadTimer.schedule_repeating(Duration::from_millis(4000));
//! if let Some(handle) = handle {
//!     // ... later, on the UI thread ...
//!     let ticks = handle.take_ticks();
//!     handle.cancel();
//! }
//! ```

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

// =============================================================================
// CAPABILITY
// =============================================================================

/// Platform timer capability.
pub trait TimerFacility {
    /// Start a repeating timer. `None` means no timer could be established.
    fn schedule_repeating(&self, interval: Duration) -> Option<TimerHandle>;
}

/// Handle to one repeating timer.
///
/// Clones share the same tick counter and running flag.
#[derive(Clone)]
pub struct TimerHandle {
    ticks: Arc<AtomicU32>,
    running: Arc<AtomicBool>,
    wake: Arc<(Mutex<()>, Condvar)>,
    worker_exited: Arc<AtomicBool>,
}

impl TimerHandle {
    fn new() -> Self {
        Self {
            ticks: Arc::new(AtomicU32::new(0)),
            running: Arc::new(AtomicBool::new(true)),
            wake: Arc::new((Mutex::new(()), Condvar::new())),
            worker_exited: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Drain ticks accumulated since the last call. Always 0 once cancelled.
    pub fn take_ticks(&self) -> u32 {
        if !self.is_active() {
            return 0;
        }
        self.ticks.swap(0, Ordering::SeqCst)
    }

    /// Stop the timer and discard pending ticks. Idempotent.
    ///
    /// A sleeping timer thread is woken and exits right away.
    pub fn cancel(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.ticks.store(0, Ordering::SeqCst);

        // Taking the lock orders the flag store before the worker's next check
        let (lock, wake) = &*self.wake;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        wake.notify_all();
    }

    /// True until cancelled.
    pub fn is_active(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn record_tick(&self) {
        if self.is_active() {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Sleep one interval on the wake condvar. False once cancelled.
    fn wait_interval(&self, interval: Duration) -> bool {
        let (lock, wake) = &*self.wake;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = wake
            .wait_timeout_while(guard, interval, |_| self.is_active())
            .unwrap_or_else(PoisonError::into_inner);
        self.is_active()
    }

    /// True once the backing thread (if any) has returned.
    pub(crate) fn worker_exited(&self) -> bool {
        self.worker_exited.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("active", &self.is_active())
            .field("pending", &self.ticks.load(Ordering::SeqCst))
            .finish()
    }
}

// =============================================================================
// THREAD TIMER
// =============================================================================

/// Timer backed by one sleeping thread per scheduled timer.
///
/// `cancel()` wakes the thread, which then exits; cancelling never blocks
/// on a join.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadTimer;

impl TimerFacility for ThreadTimer {
    fn schedule_repeating(&self, interval: Duration) -> Option<TimerHandle> {
        // A zero interval would spin the thread
        if interval.is_zero() {
            return None;
        }

        let handle = TimerHandle::new();
        let worker = handle.clone();

        let spawned = thread::Builder::new()
            .name("landing-timer".to_string())
            .spawn(move || {
                while worker.wait_interval(interval) {
                    worker.record_tick();
                }
                worker.worker_exited.store(true, Ordering::SeqCst);
            });

        match spawned {
            Ok(_) => {
                tracing::debug!(interval_ms = interval.as_millis() as u64, "thread timer started");
                Some(handle)
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not spawn timer thread");
                None
            }
        }
    }
}

// =============================================================================
// MANUAL TIMER
// =============================================================================

/// Deterministic timer: nothing ticks until `fire()` is called.
#[derive(Default)]
pub struct ManualTimer {
    handles: RefCell<Vec<TimerHandle>>,
    intervals: RefCell<Vec<Duration>>,
}

impl ManualTimer {
    /// Create a manual timer with no scheduled handles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one tick to every live timer.
    pub fn fire(&self) {
        for handle in self.handles.borrow().iter() {
            handle.record_tick();
        }
    }

    /// Fire `n` times.
    pub fn fire_n(&self, n: u32) {
        for _ in 0..n {
            self.fire();
        }
    }

    /// Number of timers scheduled and not yet cancelled.
    pub fn active_count(&self) -> usize {
        self.handles.borrow().iter().filter(|h| h.is_active()).count()
    }

    /// Number of timers ever scheduled.
    pub fn scheduled_count(&self) -> usize {
        self.handles.borrow().len()
    }

    /// Interval of the most recently scheduled timer.
    pub fn last_interval(&self) -> Option<Duration> {
        self.intervals.borrow().last().copied()
    }
}

impl TimerFacility for ManualTimer {
    fn schedule_repeating(&self, interval: Duration) -> Option<TimerHandle> {
        let handle = TimerHandle::new();
        self.handles.borrow_mut().push(handle.clone());
        self.intervals.borrow_mut().push(interval);
        Some(handle)
    }
}

impl fmt::Debug for ManualTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTimer")
            .field("active", &self.active_count())
            .field("scheduled", &self.scheduled_count())
            .finish()
    }
}

// =============================================================================
// NO TIMER
// =============================================================================

/// Environment without a timer facility (headless pre-render, tests).
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTimer;

impl TimerFacility for NoTimer {
    fn schedule_repeating(&self, _interval: Duration) -> Option<TimerHandle> {
        None
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_manual_timer_fire() {
        let timer = ManualTimer::new();
        let handle = timer.schedule_repeating(Duration::from_millis(4000)).unwrap();

        timer.fire();
        timer.fire();
        assert_eq!(handle.take_ticks(), 2);
        assert_eq!(handle.take_ticks(), 0);
        assert_eq!(timer.last_interval(), Some(Duration::from_millis(4000)));
    }

    #[test]
    fn test_cancel_discards_pending() {
        let timer = ManualTimer::new();
        let handle = timer.schedule_repeating(Duration::from_millis(10)).unwrap();

        timer.fire();
        handle.cancel();
        handle.cancel();
        timer.fire();

        assert!(!handle.is_active());
        assert_eq!(handle.take_ticks(), 0);
        assert_eq!(timer.active_count(), 0);
        assert_eq!(timer.scheduled_count(), 1);
    }

    #[test]
    fn test_no_timer_never_schedules() {
        assert!(NoTimer.schedule_repeating(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn test_thread_timer_zero_interval() {
        assert!(ThreadTimer.schedule_repeating(Duration::ZERO).is_none());
    }

    #[test]
    fn test_thread_timer_ticks() {
        let handle = ThreadTimer
            .schedule_repeating(Duration::from_millis(5))
            .expect("thread timer");

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut seen = 0;
        while seen == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
            seen += handle.take_ticks();
        }
        handle.cancel();

        assert!(seen > 0);
        assert_eq!(handle.take_ticks(), 0);
    }

    #[test]
    fn test_cancel_wakes_sleeping_thread() {
        let handle = ThreadTimer
            .schedule_repeating(Duration::from_secs(60))
            .expect("thread timer");

        handle.cancel();

        let deadline = Instant::now() + Duration::from_secs(2);
        while !handle.worker_exited() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(handle.worker_exited());
        assert_eq!(handle.take_ticks(), 0);
    }
}
