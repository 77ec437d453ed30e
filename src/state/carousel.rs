//! Carousel Module - Auto-advancing hero carousel
//!
//! Owns an immutable list of items and a rotation index. While running, a
//! repeating timer advances the index; every advance notifies subscribers,
//! which re-read `ordered_items()` (current item first, wrapping).
//!
//! # State machine
//!
//! - STOPPED (initial) --start--> RUNNING (one timer scheduled)
//! - RUNNING --start--> RUNNING (no-op, no second timer)
//! - RUNNING --stop--> STOPPED (timer cancelled)
//! - STOPPED --stop--> STOPPED (no-op)
//!
//! Timer ticks are drained on the UI thread with `pump()`.
//!
//! # Example
//!
//! ```ignore
//! use longevity_landing::state::CarouselRotator;
//! use longevity_landing::content::hero_carousel_items;
//!
//! let carousel = CarouselRotator::new(hero_carousel_items());
//! carousel.start();
//!
//! // In the UI loop
//! if carousel.pump() > 0 {
//!     render(carousel.ordered_items());
//! }
//!
//! carousel.stop();
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use super::selection::Selection;
use super::store::{ObservableStore, Subscription};
use crate::timer::{ThreadTimer, TimerFacility, TimerHandle};

// =============================================================================
// CONFIG
// =============================================================================

/// Rotation interval of the reference configuration.
pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_millis(4000);

/// Carousel tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarouselConfig {
    pub interval: Duration,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_ROTATION_INTERVAL,
        }
    }
}

// =============================================================================
// ROTATOR
// =============================================================================

/// Rotating view over a fixed item list.
pub struct CarouselRotator<T: Clone> {
    items: Vec<T>,
    current_index: Cell<usize>,
    interval: Duration,
    timer: Rc<dyn TimerFacility>,
    active: RefCell<Option<TimerHandle>>,
    store: ObservableStore,
}

impl<T: Clone> CarouselRotator<T> {
    /// Rotator with the default interval on a thread-backed timer.
    pub fn new(items: Vec<T>) -> Self {
        Self::with_timer(items, CarouselConfig::default(), Rc::new(ThreadTimer))
    }

    /// Rotator with explicit config and timer facility.
    pub fn with_timer(items: Vec<T>, config: CarouselConfig, timer: Rc<dyn TimerFacility>) -> Self {
        Self {
            items,
            current_index: Cell::new(0),
            interval: config.interval,
            timer,
            active: RefCell::new(None),
            store: ObservableStore::new(),
        }
    }

    /// Start rotating. No-op while running or when no timer is available.
    pub fn start(&self) {
        let mut active = self.active.borrow_mut();
        if active.is_some() {
            return;
        }

        match self.timer.schedule_repeating(self.interval) {
            Some(handle) => {
                *active = Some(handle);
                tracing::debug!(
                    interval_ms = self.interval.as_millis() as u64,
                    items = self.items.len(),
                    "carousel started"
                );
            }
            None => tracing::debug!("no timer facility, carousel stays stopped"),
        }
    }

    /// Stop rotating. No-op while stopped.
    pub fn stop(&self) {
        if let Some(handle) = self.active.borrow_mut().take() {
            handle.cancel();
            tracing::debug!(index = self.current_index.get(), "carousel stopped");
        }
    }

    /// True while a timer is tracked as active.
    pub fn is_running(&self) -> bool {
        self.active.borrow().is_some()
    }

    /// Drain timer ticks and advance once per tick.
    ///
    /// Returns the number of advances that changed the rotation.
    /// A listener that stops the rotator ends the drain; the remaining
    /// ticks are dropped.
    pub fn pump(&self) -> usize {
        let Some(handle) = self.active.borrow().clone() else {
            return 0;
        };

        let mut applied = 0;
        for _ in 0..handle.take_ticks() {
            // Cancelled by stop(), possibly followed by a fresh start()
            if !handle.is_active() {
                break;
            }
            if self.advance() {
                applied += 1;
            }
        }
        applied
    }

    /// Rotate by one. Does nothing (and does not notify) with fewer than two
    /// items. Returns true if the rotation changed.
    pub(crate) fn advance(&self) -> bool {
        let len = self.items.len();
        if len <= 1 {
            return false;
        }

        self.current_index.set((self.current_index.get() + 1) % len);
        tracing::trace!(index = self.current_index.get(), "carousel advance");
        self.store.notify();
        true
    }

    /// All items, current first, wrapping. Empty for an empty list.
    pub fn ordered_items(&self) -> Vec<T> {
        let len = self.items.len();
        if len == 0 {
            return Vec::new();
        }

        let start = self.current_index.get() % len;
        self.items[start..]
            .iter()
            .chain(self.items[..start].iter())
            .cloned()
            .collect()
    }

    /// Item currently in front.
    pub fn front_item(&self) -> Option<T> {
        self.items.get(self.current_index.get()).cloned()
    }

    /// Rotation offset, in `[0, len)` (0 when empty).
    pub fn current_index(&self) -> usize {
        self.current_index.get()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True for an empty list.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Rotation interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Subscribe to rotation changes.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        self.store.subscribe(listener)
    }

    /// The rotator's change store.
    pub fn store(&self) -> &ObservableStore {
        &self.store
    }
}

impl<T: Clone + PartialEq + 'static> CarouselRotator<T> {
    /// Cached selection of the ordered items.
    pub fn select_ordered(self: &Rc<Self>) -> Selection<Vec<T>, Box<dyn Fn() -> Vec<T>>> {
        let rotator = Rc::clone(self);
        let selector: Box<dyn Fn() -> Vec<T>> = Box::new(move || rotator.ordered_items());
        Selection::new(&self.store, selector)
    }
}

impl<T: Clone> Drop for CarouselRotator<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.active.get_mut().take() {
            handle.cancel();
        }
    }
}

impl<T: Clone> fmt::Debug for CarouselRotator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselRotator")
            .field("items", &self.items.len())
            .field("current_index", &self.current_index.get())
            .field("running", &self.is_running())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{ManualTimer, NoTimer};

    fn setup(items: Vec<char>) -> (Rc<ManualTimer>, CarouselRotator<char>) {
        let timer = Rc::new(ManualTimer::new());
        let rotator = CarouselRotator::with_timer(items, CarouselConfig::default(), timer.clone());
        (timer, rotator)
    }

    fn count_notifications<T: Clone>(rotator: &CarouselRotator<T>) -> (Rc<Cell<u32>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let sub = rotator.subscribe(move || count_clone.set(count_clone.get() + 1));
        (count, sub)
    }

    #[test]
    fn test_initial_order() {
        let (_timer, rotator) = setup(vec!['A', 'B', 'C', 'D']);
        assert_eq!(rotator.ordered_items(), vec!['A', 'B', 'C', 'D']);
        assert_eq!(rotator.current_index(), 0);
        assert_eq!(rotator.front_item(), Some('A'));
        assert!(!rotator.is_running());
    }

    #[test]
    fn test_advance_scenario() {
        let (_timer, rotator) = setup(vec!['A', 'B', 'C', 'D']);

        rotator.advance();
        rotator.advance();
        rotator.advance();
        assert_eq!(rotator.ordered_items(), vec!['D', 'A', 'B', 'C']);
        assert_eq!(rotator.current_index(), 3);

        rotator.advance();
        assert_eq!(rotator.ordered_items(), vec!['A', 'B', 'C', 'D']);
        assert_eq!(rotator.current_index(), 0);
    }

    #[test]
    fn test_ordered_items_stable_at_rest() {
        let (_timer, rotator) = setup(vec!['A', 'B', 'C', 'D']);
        rotator.advance();
        rotator.advance();

        let first = rotator.ordered_items();
        assert_eq!(first, vec!['C', 'D', 'A', 'B']);
        assert_eq!(rotator.ordered_items(), first);
    }

    #[test]
    fn test_empty_list() {
        let (timer, rotator) = setup(Vec::new());
        let (count, _sub) = count_notifications(&rotator);

        assert!(rotator.ordered_items().is_empty());
        assert!(rotator.front_item().is_none());

        rotator.start();
        timer.fire();
        assert_eq!(rotator.pump(), 0);
        assert_eq!(count.get(), 0);
        assert!(rotator.is_empty());
    }

    #[test]
    fn test_single_item_never_rotates() {
        let (timer, rotator) = setup(vec!['A']);
        let (count, _sub) = count_notifications(&rotator);

        assert!(!rotator.advance());
        rotator.start();
        timer.fire_n(3);
        rotator.pump();

        assert_eq!(rotator.ordered_items(), vec!['A']);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_start_twice_one_timer() {
        let (timer, rotator) = setup(vec!['A', 'B', 'C']);
        let (count, _sub) = count_notifications(&rotator);

        rotator.start();
        rotator.start();
        assert_eq!(timer.active_count(), 1);
        assert_eq!(timer.scheduled_count(), 1);
        assert_eq!(timer.last_interval(), Some(DEFAULT_ROTATION_INTERVAL));

        timer.fire();
        assert_eq!(rotator.pump(), 1);
        assert_eq!(count.get(), 1);
        assert_eq!(rotator.current_index(), 1);
    }

    #[test]
    fn test_stop_twice_is_safe() {
        let (timer, rotator) = setup(vec!['A', 'B']);

        rotator.stop();
        rotator.start();
        rotator.stop();
        rotator.stop();

        assert!(!rotator.is_running());
        assert_eq!(timer.active_count(), 0);
    }

    #[test]
    fn test_stopped_rotator_ignores_ticks() {
        let (timer, rotator) = setup(vec!['A', 'B', 'C']);

        rotator.start();
        timer.fire();
        rotator.stop();
        timer.fire();

        assert_eq!(rotator.pump(), 0);
        assert_eq!(rotator.current_index(), 0);
    }

    #[test]
    fn test_rapid_start_stop_does_not_leak_timers() {
        let (timer, rotator) = setup(vec!['A', 'B', 'C']);

        rotator.start();
        for _ in 0..50 {
            rotator.stop();
            rotator.start();
            rotator.start();
        }

        // One initial timer plus one per restart
        assert_eq!(timer.active_count(), 1);
        assert_eq!(timer.scheduled_count(), 51);
        rotator.stop();
        assert_eq!(timer.active_count(), 0);
    }

    #[test]
    fn test_pump_applies_each_tick() {
        let (timer, rotator) = setup(vec!['A', 'B', 'C', 'D']);
        let (count, _sub) = count_notifications(&rotator);

        rotator.start();
        timer.fire_n(6);

        assert_eq!(rotator.pump(), 6);
        assert_eq!(count.get(), 6);
        assert_eq!(rotator.ordered_items(), vec!['C', 'D', 'A', 'B']);
    }

    #[test]
    fn test_stop_from_listener_ends_drain() {
        let timer = Rc::new(ManualTimer::new());
        let rotator = Rc::new(CarouselRotator::with_timer(
            vec!['A', 'B', 'C', 'D'],
            CarouselConfig::default(),
            timer.clone(),
        ));

        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        let weak = Rc::downgrade(&rotator);
        let _sub = rotator.subscribe(move || {
            calls_clone.set(calls_clone.get() + 1);
            if let Some(rotator) = weak.upgrade() {
                rotator.stop();
            }
        });

        rotator.start();
        timer.fire_n(3);

        assert_eq!(rotator.pump(), 1);
        assert_eq!(rotator.current_index(), 1);
        assert_eq!(calls.get(), 1);
        assert!(!rotator.is_running());
    }

    #[test]
    fn test_restart_from_listener_drops_old_ticks() {
        let timer = Rc::new(ManualTimer::new());
        let rotator = Rc::new(CarouselRotator::with_timer(
            vec!['A', 'B', 'C', 'D'],
            CarouselConfig::default(),
            timer.clone(),
        ));

        let weak = Rc::downgrade(&rotator);
        let _sub = rotator.subscribe(move || {
            if let Some(rotator) = weak.upgrade() {
                rotator.stop();
                rotator.start();
            }
        });

        rotator.start();
        timer.fire_n(3);

        assert_eq!(rotator.pump(), 1);
        assert_eq!(rotator.current_index(), 1);
        assert!(rotator.is_running());
        assert_eq!(timer.active_count(), 1);
    }

    #[test]
    fn test_no_timer_facility() {
        let rotator = CarouselRotator::with_timer(vec![1, 2, 3], CarouselConfig::default(), Rc::new(NoTimer));

        rotator.start();
        assert!(!rotator.is_running());
        assert_eq!(rotator.pump(), 0);
        rotator.stop();
    }

    #[test]
    fn test_restart_after_stop() {
        let (timer, rotator) = setup(vec!['A', 'B', 'C']);

        rotator.start();
        timer.fire();
        rotator.pump();
        rotator.stop();

        rotator.start();
        timer.fire();
        rotator.pump();

        assert_eq!(rotator.current_index(), 2);
        assert_eq!(timer.active_count(), 1);
    }

    #[test]
    fn test_drop_cancels_timer() {
        let (timer, rotator) = setup(vec!['A', 'B']);
        rotator.start();
        drop(rotator);

        assert_eq!(timer.active_count(), 0);
    }

    #[test]
    fn test_select_ordered() {
        let timer = Rc::new(ManualTimer::new());
        let rotator = Rc::new(CarouselRotator::with_timer(
            vec!['A', 'B', 'C'],
            CarouselConfig::default(),
            timer.clone(),
        ));
        let selection = rotator.select_ordered();

        assert_eq!(selection.get(), vec!['A', 'B', 'C']);
        assert!(!selection.refresh());

        rotator.advance();
        assert!(selection.refresh());
        assert_eq!(selection.get(), vec!['B', 'C', 'A']);
    }

    #[test]
    fn test_custom_interval() {
        let timer = Rc::new(ManualTimer::new());
        let config = CarouselConfig { interval: Duration::from_millis(250) };
        let rotator = CarouselRotator::with_timer(vec![1, 2], config, timer.clone());

        rotator.start();
        assert_eq!(timer.last_interval(), Some(Duration::from_millis(250)));
        assert_eq!(rotator.interval(), Duration::from_millis(250));
    }
}
