//! Reveal Module - Scroll-triggered visibility flags
//!
//! Tracks one boolean "revealed" flag per key, driven by an
//! [`IntersectionSource`]. Render layers read the flag to apply fade-in
//! classes and subscribe to the tracker's store to re-render.
//!
//! # Behavior
//!
//! - `observe(key, element, options)` creates the key's flag (`false`) on
//!   first use and starts watching `element`
//! - An entry with `ratio >= threshold` (or `is_intersecting`) sets the flag
//!   and notifies; with `once` the watch is stopped right after
//! - Without `once`, entries below threshold clear the flag again
//! - Flags outlive their watches; `is_visible` of an unknown key is `false`
//! - Observing a key that is already watched supersedes the old watch
//!
//! # Example
//!
//! ```ignore
//! use longevity_landing::intersection::ScriptedIntersections;
//! use longevity_landing::state::{RevealOptions, VisibilityTracker};
//! use longevity_landing::ElementId;
//!
//! let source = ScriptedIntersections::new();
//! let tracker = VisibilityTracker::new(source.clone());
//!
//! let mut disposer = tracker.observe("hero", ElementId(1), &RevealOptions::default())?;
//! source.emit(ElementId(1), 0.6);
//! assert!(tracker.is_visible("hero"));
//!
//! disposer.dispose();
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use thiserror::Error;

use super::selection::Selection;
use super::store::{ObservableStore, Subscription};
use crate::intersection::{
    IntersectionEntry, IntersectionSource, MarginParseError, RootMargin, WatchConfig, WatchHandle,
};
use crate::types::{ElementId, Section, SectionSet};

// =============================================================================
// OPTIONS & ERRORS
// =============================================================================

/// Default fraction of the element that must be visible.
pub const DEFAULT_THRESHOLD: f32 = 0.25;

/// Default root margin (no adjustment).
pub const DEFAULT_ROOT_MARGIN: &str = "0px";

/// Per-observation tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealOptions {
    /// Visible fraction that counts as revealed, in `[0, 1]`.
    pub threshold: f32,
    /// CSS-style margin applied to the viewport test region.
    pub root_margin: String,
    /// Stop watching after the first reveal.
    pub once: bool,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            root_margin: DEFAULT_ROOT_MARGIN.to_string(),
            once: true,
        }
    }
}

impl RevealOptions {
    /// Set the threshold.
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the root margin.
    pub fn root_margin(mut self, root_margin: impl Into<String>) -> Self {
        self.root_margin = root_margin.into();
        self
    }

    /// Set one-shot behavior.
    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    fn watch_config(&self) -> Result<WatchConfig, RevealError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(RevealError::ThresholdOutOfRange(self.threshold));
        }
        let root_margin: RootMargin = self.root_margin.parse()?;
        Ok(WatchConfig {
            threshold: self.threshold,
            root_margin,
        })
    }
}

/// Rejected `observe` calls. Nothing is registered when one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RevealError {
    #[error("reveal key must not be empty")]
    EmptyKey,

    #[error("reveal threshold {0} is outside [0, 1]")]
    ThresholdOutOfRange(f32),

    #[error("invalid root margin: {0}")]
    InvalidRootMargin(#[from] MarginParseError),
}

// =============================================================================
// TRACKER STATE
// =============================================================================

struct ActiveWatch {
    id: usize,
    handle: WatchHandle,
}

#[derive(Default)]
struct TrackerState {
    visibility: HashMap<String, bool>,
    watches: HashMap<String, ActiveWatch>,
    next_id: usize,
}

impl TrackerState {
    fn is_current(&self, key: &str, id: usize) -> bool {
        self.watches.get(key).map(|w| w.id) == Some(id)
    }

    /// Remove the key's watch if it is still the one identified by `id`.
    fn take_if_current(&mut self, key: &str, id: usize) -> Option<ActiveWatch> {
        if self.is_current(key, id) {
            self.watches.remove(key)
        } else {
            None
        }
    }
}

struct TrackerInner {
    state: RefCell<TrackerState>,
    store: ObservableStore,
    source: Rc<dyn IntersectionSource>,
}

impl TrackerInner {
    fn handle_entry(&self, key: &str, id: usize, threshold: f32, once: bool, entry: IntersectionEntry) {
        let revealed = entry.ratio >= threshold || entry.is_intersecting;

        let finished = {
            let mut state = self.state.borrow_mut();
            if !state.is_current(key, id) {
                return;
            }
            if revealed {
                state.visibility.insert(key.to_string(), true);
                if once { state.watches.remove(key) } else { None }
            } else if !once {
                state.visibility.insert(key.to_string(), false);
                None
            } else {
                return;
            }
        };

        if let Some(mut watch) = finished {
            watch.handle.stop();
        }

        tracing::debug!(key, revealed, ratio = entry.ratio, "reveal state updated");
        self.store.notify();
    }
}

impl Drop for TrackerInner {
    fn drop(&mut self) {
        for (_, mut watch) in self.state.get_mut().watches.drain() {
            watch.handle.stop();
        }
    }
}

// =============================================================================
// VISIBILITY TRACKER
// =============================================================================

/// Per-key reveal flags backed by an intersection source.
///
/// Cloning yields another handle to the same tracker.
#[derive(Clone)]
pub struct VisibilityTracker {
    inner: Rc<TrackerInner>,
}

impl VisibilityTracker {
    /// Create a tracker over `source`.
    pub fn new<S>(source: S) -> Self
    where
        S: IntersectionSource + 'static,
    {
        Self::from_shared(Rc::new(source))
    }

    /// Create a tracker over an already shared source.
    pub fn from_shared(source: Rc<dyn IntersectionSource>) -> Self {
        Self {
            inner: Rc::new(TrackerInner {
                state: RefCell::new(TrackerState::default()),
                store: ObservableStore::new(),
                source,
            }),
        }
    }

    /// Start watching `element` under `key`.
    ///
    /// Any live watch under the same key is stopped first; its disposer
    /// becomes a no-op. The returned disposer stops this watch without
    /// touching the stored flag.
    pub fn observe(
        &self,
        key: &str,
        element: ElementId,
        options: &RevealOptions,
    ) -> Result<RevealDisposer, RevealError> {
        if key.is_empty() {
            return Err(RevealError::EmptyKey);
        }
        let config = options.watch_config()?;

        let (id, superseded) = {
            let mut state = self.inner.state.borrow_mut();
            state.visibility.entry(key.to_string()).or_insert(false);
            let id = state.next_id;
            state.next_id += 1;
            // Placeholder so entries delivered during `watch()` are accepted
            let superseded = state.watches.insert(
                key.to_string(),
                ActiveWatch { id, handle: WatchHandle::detached() },
            );
            (id, superseded)
        };

        if let Some(mut previous) = superseded {
            tracing::debug!(key, "re-observing live key, previous watch superseded");
            previous.handle.stop();
        }

        let weak: Weak<TrackerInner> = Rc::downgrade(&self.inner);
        let callback_key = key.to_string();
        let threshold = options.threshold;
        let once = options.once;
        let mut handle = self.inner.source.watch(
            element,
            &config,
            Box::new(move |entry| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_entry(&callback_key, id, threshold, once, entry);
                }
            }),
        );

        let still_current = {
            let mut state = self.inner.state.borrow_mut();
            match state.watches.get_mut(key) {
                Some(watch) if watch.id == id => {
                    std::mem::swap(&mut watch.handle, &mut handle);
                    true
                }
                _ => false,
            }
        };
        if !still_current {
            // Already revealed (once) or superseded while establishing
            handle.stop();
        }

        tracing::debug!(key, element = element.0, threshold, once, "reveal watch established");

        Ok(RevealDisposer {
            inner: Rc::downgrade(&self.inner),
            key: key.to_string(),
            id,
            disposed: false,
        })
    }

    /// Stored flag for `key`; `false` if never observed.
    pub fn is_visible(&self, key: &str) -> bool {
        self.inner
            .state
            .borrow()
            .visibility
            .get(key)
            .copied()
            .unwrap_or(false)
    }

    /// True while `key` has a live watch.
    pub fn is_watching(&self, key: &str) -> bool {
        self.inner.state.borrow().watches.contains_key(key)
    }

    /// Number of keys with a stored flag.
    pub fn tracked_keys(&self) -> usize {
        self.inner.state.borrow().visibility.len()
    }

    /// Landing sections whose leading element has been revealed.
    pub fn revealed_sections(&self) -> SectionSet {
        self.inner
            .state
            .borrow()
            .visibility
            .iter()
            .filter(|(_, visible)| **visible)
            .filter_map(|(key, _)| Section::from_key(key))
            .fold(SectionSet::empty(), |set, section| set | section.flag())
    }

    /// Subscribe to reveal changes.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        self.inner.store.subscribe(listener)
    }

    /// The tracker's change store.
    pub fn store(&self) -> &ObservableStore {
        &self.inner.store
    }

    /// Cached selection of one key's flag.
    pub fn select_visible(&self, key: &str) -> Selection<bool, Box<dyn Fn() -> bool>> {
        let tracker = self.clone();
        let key = key.to_string();
        let selector: Box<dyn Fn() -> bool> = Box::new(move || tracker.is_visible(&key));
        Selection::new(&self.inner.store, selector)
    }

    /// Binding that keeps at most one element observed under `key`.
    pub fn binding(&self, key: &str, options: RevealOptions) -> RevealBinding {
        RevealBinding {
            tracker: self.clone(),
            key: key.to_string(),
            options,
            disposer: None,
            element: None,
        }
    }
}

impl fmt::Debug for VisibilityTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("VisibilityTracker")
            .field("keys", &state.visibility.len())
            .field("watches", &state.watches.len())
            .finish()
    }
}

// =============================================================================
// DISPOSER
// =============================================================================

/// Stops one observation. Safe to call repeatedly, after the watch already
/// ended, or after the key was re-observed.
#[must_use = "the watch stays live until `dispose` is called"]
pub struct RevealDisposer {
    inner: Weak<TrackerInner>,
    key: String,
    id: usize,
    disposed: bool,
}

impl RevealDisposer {
    /// Stop the watch if it is still the key's current one.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let removed = inner.state.borrow_mut().take_if_current(&self.key, self.id);
        if let Some(mut watch) = removed {
            watch.handle.stop();
            tracing::debug!(key = %self.key, "reveal watch disposed");
        }
    }

    /// Key this disposer belongs to.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for RevealDisposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealDisposer")
            .field("key", &self.key)
            .field("disposed", &self.disposed)
            .finish()
    }
}

// =============================================================================
// BINDING
// =============================================================================

/// Element slot for one reveal key, the way a renderer attaches and
/// detaches a node over a component's lifetime.
///
/// Dropping the binding disposes its observation.
pub struct RevealBinding {
    tracker: VisibilityTracker,
    key: String,
    options: RevealOptions,
    disposer: Option<RevealDisposer>,
    element: Option<ElementId>,
}

impl RevealBinding {
    /// Attach a new element (`Some`) or detach (`None`).
    ///
    /// The previous observation, if any, is always disposed first.
    pub fn bind(&mut self, element: Option<ElementId>) -> Result<(), RevealError> {
        if let Some(mut disposer) = self.disposer.take() {
            disposer.dispose();
        }
        self.element = None;

        if let Some(element) = element {
            self.disposer = Some(self.tracker.observe(&self.key, element, &self.options)?);
            self.element = Some(element);
        }
        Ok(())
    }

    /// Currently attached element.
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// Stored flag for this binding's key.
    pub fn is_visible(&self) -> bool {
        self.tracker.is_visible(&self.key)
    }

    /// Key this binding observes.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for RevealBinding {
    fn drop(&mut self) {
        if let Some(mut disposer) = self.disposer.take() {
            disposer.dispose();
        }
    }
}

impl fmt::Debug for RevealBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealBinding")
            .field("key", &self.key)
            .field("element", &self.element)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
