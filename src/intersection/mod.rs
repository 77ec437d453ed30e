//! Intersection Module - Viewport-intersection capability
//!
//! The visibility tracker consumes this capability without knowing where the
//! signal comes from:
//!
//! - [`IntersectionSource::watch`] starts watching an element and reports
//!   [`IntersectionEntry`] values through a callback
//! - [`WatchHandle::stop`] ends the watch (idempotent)
//!
//! # Contract for sources
//!
//! - Callbacks run on the caller's thread, outside any source-internal borrow
//! - A stopped watch never receives another entry
//! - `stop()` may be called from inside the watch's own callback
//!
//! # Sources
//!
//! - [`ScriptedIntersections`] - entries pushed by hand (tests, replay)
//! - [`ViewportIntersections`] - entries computed from element rectangles
//!   and a scrolling viewport

mod margin;
mod scripted;
mod viewport;

pub use margin::*;
pub use scripted::ScriptedIntersections;
pub use viewport::ViewportIntersections;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::types::ElementId;

// =============================================================================
// TYPES
// =============================================================================

/// One intersection report for a watched element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// Fraction of the element's area inside the test region, in `[0, 1]`.
    pub ratio: f32,
    /// The source's own judgment that the watch condition holds.
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// Entry carrying only a ratio.
    pub fn ratio(ratio: f32) -> Self {
        Self { ratio, is_intersecting: false }
    }
}

/// Per-watch configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WatchConfig {
    pub threshold: f32,
    pub root_margin: RootMargin,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin::ZERO,
        }
    }
}

/// Receives entries for one watch.
pub type IntersectionCallback = Box<dyn FnMut(IntersectionEntry)>;

/// Platform viewport-intersection capability.
pub trait IntersectionSource {
    /// Start watching `element`. Entries arrive through `callback` until the
    /// returned handle is stopped.
    fn watch(
        &self,
        element: ElementId,
        config: &WatchConfig,
        callback: IntersectionCallback,
    ) -> WatchHandle;
}

// =============================================================================
// WATCH HANDLE
// =============================================================================

/// Stops one watch. Stopping twice is a no-op.
#[must_use = "the watch stays live until `stop` is called"]
pub struct WatchHandle {
    stop: Option<Box<dyn FnOnce()>>,
}

impl WatchHandle {
    /// Handle running `stop` on the first call to [`WatchHandle::stop`].
    pub fn new<F>(stop: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self { stop: Some(Box::new(stop)) }
    }

    /// Handle with nothing to stop.
    pub fn detached() -> Self {
        Self { stop: None }
    }

    /// End the watch.
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }

    /// True until stopped.
    pub fn is_active(&self) -> bool {
        self.stop.is_some()
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

// =============================================================================
// WATCH REGISTRY (shared by the bundled sources)
// =============================================================================

type SharedCallback = Rc<RefCell<IntersectionCallback>>;

struct Watcher {
    id: usize,
    element: ElementId,
    config: WatchConfig,
    callback: SharedCallback,
    /// Last delivered "condition met" state; `None` before the first entry.
    last_met: Option<bool>,
}

#[derive(Default)]
struct WatchRegistry {
    watchers: Vec<Watcher>,
    next_id: usize,
}

impl WatchRegistry {
    fn contains(&self, id: usize) -> bool {
        self.watchers.iter().any(|w| w.id == id)
    }
}

/// Register a watcher and build the handle that removes it.
fn register(
    registry: &Rc<RefCell<WatchRegistry>>,
    element: ElementId,
    config: &WatchConfig,
    callback: IntersectionCallback,
) -> WatchHandle {
    let id = {
        let mut reg = registry.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.watchers.push(Watcher {
            id,
            element,
            config: *config,
            callback: Rc::new(RefCell::new(callback)),
            last_met: None,
        });
        id
    };

    tracing::trace!(watch = id, element = element.0, "intersection watch registered");

    let weak: Weak<RefCell<WatchRegistry>> = Rc::downgrade(registry);
    WatchHandle::new(move || {
        if let Some(registry) = weak.upgrade() {
            registry.borrow_mut().watchers.retain(|w| w.id != id);
            tracing::trace!(watch = id, "intersection watch removed");
        }
    })
}

/// Deliver a snapshot of entries, skipping watches stopped along the way.
fn deliver(registry: &Rc<RefCell<WatchRegistry>>, batch: Vec<(usize, SharedCallback, IntersectionEntry)>) {
    for (id, callback, entry) in batch {
        if !registry.borrow().contains(id) {
            continue;
        }
        // A callback re-entering its own source for the same watch is dropped
        match callback.try_borrow_mut() {
            Ok(mut callback) => (*callback)(entry),
            Err(_) => tracing::warn!(watch = id, "re-entrant intersection entry dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_watch_handle_stop_once() {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let mut handle = WatchHandle::new(move || count_clone.set(count_clone.get() + 1));

        assert!(handle.is_active());
        handle.stop();
        handle.stop();

        assert!(!handle.is_active());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_detached_handle() {
        let mut handle = WatchHandle::detached();
        assert!(!handle.is_active());
        handle.stop();
    }

    #[test]
    fn test_registry_handle_outlives_registry() {
        let registry = Rc::new(RefCell::new(WatchRegistry::default()));
        let mut handle = register(&registry, ElementId(1), &WatchConfig::default(), Box::new(|_| {}));
        assert_eq!(registry.borrow().watchers.len(), 1);

        drop(registry);
        handle.stop();
    }
}
