//! Observable Store - Listener registry shared by every state subsystem
//!
//! A minimal publish/subscribe container. Subsystems own one store each and
//! call `notify()` after every state transition; consumers subscribe with a
//! zero-argument callback and get back a [`Subscription`].
//!
//! # Pattern
//!
//! - `subscribe(listener)` registers a listener, returns its subscription
//! - `Subscription::unsubscribe()` removes exactly that registration (idempotent)
//! - `notify()` calls a snapshot of the listeners taken when it starts
//! - Every notify also bumps a `revision` signal for signal-driven renderers
//!
//! # Example
//!
//! ```ignore
//! use longevity_landing::state::store::ObservableStore;
//!
//! let store = ObservableStore::new();
//! let mut subscription = store.subscribe(|| println!("changed"));
//!
//! // ... store owner calls notify() ...
//!
//! subscription.unsubscribe();
//! ```

use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};

// =============================================================================
// TYPES
// =============================================================================

/// Change listener. Shared so a notify snapshot can outlive a concurrent
/// unsubscribe.
pub type Listener = Rc<dyn Fn()>;

struct ListenerRegistry {
    listeners: Vec<(usize, Listener)>,
    next_id: usize,
}

impl ListenerRegistry {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn contains(&self, id: usize) -> bool {
        self.listeners.iter().any(|(listener_id, _)| *listener_id == id)
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Listener set plus change notification.
///
/// Cloning a store yields another handle to the same listener set.
#[derive(Clone)]
pub struct ObservableStore {
    registry: Rc<RefCell<ListenerRegistry>>,
    revision: Signal<u64>,
}

impl ObservableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(ListenerRegistry::new())),
            revision: signal(0),
        }
    }

    /// Register a listener.
    ///
    /// Registering the same closure twice creates two independent
    /// registrations; each must be unsubscribed on its own.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id();
            registry.listeners.push((id, Rc::new(listener)));
            id
        };

        tracing::trace!(listener = id, "store subscribe");

        Subscription {
            registry: Rc::downgrade(&self.registry),
            id: Some(id),
        }
    }

    /// Number of live registrations.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Revision signal, bumped once per notify.
    pub fn revision(&self) -> Signal<u64> {
        self.revision.clone()
    }

    /// Current revision value.
    pub fn version(&self) -> u64 {
        self.revision.get()
    }

    /// Call every listener registered when this call starts.
    ///
    /// Listeners added during the pass are not called until the next notify.
    /// Listeners removed during the pass are skipped if not yet reached.
    /// A panicking listener is logged and the pass continues.
    pub(crate) fn notify(&self) {
        let snapshot: Vec<(usize, Listener)> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        self.revision.set(self.revision.get().wrapping_add(1));
        tracing::trace!(listeners = snapshot.len(), "store notify");

        for (id, listener) in snapshot {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            if panic::catch_unwind(AssertUnwindSafe(|| listener())).is_err() {
                tracing::error!(listener = id, "store listener panicked");
            }
        }
    }
}

impl Default for ObservableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObservableStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableStore")
            .field("listeners", &self.listener_count())
            .field("revision", &self.version())
            .finish()
    }
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Handle for one listener registration.
///
/// Dropping the handle does NOT unsubscribe; call [`Subscription::unsubscribe`].
#[must_use = "the listener stays registered until `unsubscribe` is called"]
pub struct Subscription {
    registry: Weak<RefCell<ListenerRegistry>>,
    id: Option<usize>,
}

impl Subscription {
    /// Remove the listener. Calling again is a no-op.
    pub fn unsubscribe(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .listeners
                .retain(|(listener_id, _)| *listener_id != id);
            tracing::trace!(listener = id, "store unsubscribe");
        }
    }

    /// True until `unsubscribe` has been called.
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        (count, move || count_clone.set(count_clone.get() + 1))
    }

    #[test]
    fn test_subscribe_and_notify() {
        let store = ObservableStore::new();
        let (count, listener) = counter();

        let _sub = store.subscribe(listener);
        store.notify();
        store.notify();

        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let store = ObservableStore::new();
        let (count, listener) = counter();

        let mut sub = store.subscribe(listener);
        store.notify();
        sub.unsubscribe();
        store.notify();

        assert_eq!(count.get(), 1);
        assert_eq!(store.listener_count(), 0);
        assert!(!sub.is_active());
    }

    #[test]
    fn test_unsubscribe_twice_is_noop() {
        let store = ObservableStore::new();
        let (count, listener) = counter();
        let (other_count, other) = counter();

        let mut sub = store.subscribe(listener);
        let _other = store.subscribe(other);

        sub.unsubscribe();
        sub.unsubscribe();
        store.notify();

        assert_eq!(count.get(), 0);
        assert_eq!(other_count.get(), 1);
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn test_same_callback_twice_is_two_registrations() {
        let store = ObservableStore::new();
        let count = Rc::new(Cell::new(0));

        let make = |count: Rc<Cell<u32>>| move || count.set(count.get() + 1);
        let listener = make(count.clone());

        let mut first = store.subscribe(listener.clone());
        let mut second = store.subscribe(listener);

        store.notify();
        assert_eq!(count.get(), 2);

        first.unsubscribe();
        store.notify();
        assert_eq!(count.get(), 3);

        second.unsubscribe();
        store.notify();
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_listener_added_during_notify_waits_for_next_pass() {
        let store = ObservableStore::new();
        let late_count = Rc::new(Cell::new(0));
        let late_subs: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let store_clone = store.clone();
        let late_count_clone = late_count.clone();
        let late_subs_clone = late_subs.clone();
        let _adder = store.subscribe(move || {
            let late_count = late_count_clone.clone();
            let sub = store_clone.subscribe(move || late_count.set(late_count.get() + 1));
            late_subs_clone.borrow_mut().push(sub);
        });

        store.notify();
        assert_eq!(late_count.get(), 0);

        store.notify();
        assert_eq!(late_count.get(), 1);
    }

    #[test]
    fn test_listener_removed_during_notify_is_skipped() {
        let store = ObservableStore::new();
        let victim_slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let (victim_count, victim) = counter();
        let (bystander_count, bystander) = counter();

        let slot_clone = victim_slot.clone();
        let _remover = store.subscribe(move || {
            if let Some(sub) = slot_clone.borrow_mut().as_mut() {
                sub.unsubscribe();
            }
        });
        *victim_slot.borrow_mut() = Some(store.subscribe(victim));
        let _bystander = store.subscribe(bystander);

        store.notify();

        assert_eq!(victim_count.get(), 0);
        assert_eq!(bystander_count.get(), 1);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let store = ObservableStore::new();
        let (count, listener) = counter();

        let _bad = store.subscribe(|| panic!("listener failure"));
        let _good = store.subscribe(listener);

        store.notify();
        store.notify();

        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_revision_bumps_per_notify() {
        let store = ObservableStore::new();
        let revision = store.revision();

        assert_eq!(store.version(), 0);
        store.notify();
        store.notify();

        assert_eq!(store.version(), 2);
        assert_eq!(revision.get(), 2);
    }

    #[test]
    fn test_clones_share_listeners() {
        let store = ObservableStore::new();
        let handle = store.clone();
        let (count, listener) = counter();

        let _sub = handle.subscribe(listener);
        store.notify();

        assert_eq!(count.get(), 1);
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn test_subscription_outliving_store() {
        let store = ObservableStore::new();
        let mut sub = store.subscribe(|| {});
        drop(store);

        sub.unsubscribe();
        assert!(!sub.is_active());
    }
}
