//! Store Selection - Cached snapshots of a store slice
//!
//! A render layer usually reads one slice of a store (a single key's reveal
//! flag, the ordered carousel items). `Selection` keeps the last value the
//! selector produced and hands the cached value back while the slice is
//! unchanged, so consumers can compare cheaply and skip redundant renders.

use std::cell::RefCell;

use super::store::{ObservableStore, Subscription};

/// Selector over a store with snapshot caching.
pub struct Selection<T, F>
where
    T: Clone + PartialEq,
    F: Fn() -> T,
{
    store: ObservableStore,
    selector: F,
    cached: RefCell<Option<T>>,
}

impl<T, F> Selection<T, F>
where
    T: Clone + PartialEq,
    F: Fn() -> T,
{
    /// Create a selection. The selector runs lazily on first read.
    pub fn new(store: &ObservableStore, selector: F) -> Self {
        Self {
            store: store.clone(),
            selector,
            cached: RefCell::new(None),
        }
    }

    /// Current selected value (cached copy if equal to the last snapshot).
    pub fn get(&self) -> T {
        self.refresh();
        match self.cached.borrow().as_ref() {
            Some(value) => value.clone(),
            None => (self.selector)(),
        }
    }

    /// Re-run the selector. Returns true if the selected value changed.
    ///
    /// The first call always reports a change.
    pub fn refresh(&self) -> bool {
        let next = (self.selector)();
        let mut cached = self.cached.borrow_mut();
        if cached.as_ref() == Some(&next) {
            return false;
        }
        *cached = Some(next);
        true
    }

    /// Subscribe to the underlying store.
    pub fn subscribe<L>(&self, listener: L) -> Subscription
    where
        L: Fn() + 'static,
    {
        self.store.subscribe(listener)
    }
}
