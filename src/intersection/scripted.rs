//! Scripted source - entries pushed by hand.

use std::cell::RefCell;
use std::rc::Rc;

use super::{
    deliver, register, IntersectionCallback, IntersectionEntry, IntersectionSource, WatchConfig,
    WatchHandle, WatchRegistry,
};
use crate::types::ElementId;

/// Intersection source driven entirely by the caller.
///
/// Nothing is delivered until `emit` / `emit_entry` is called. Useful for
/// tests and for replaying recorded scroll sessions.
#[derive(Clone, Default)]
pub struct ScriptedIntersections {
    registry: Rc<RefCell<WatchRegistry>>,
}

impl ScriptedIntersections {
    /// Create a source with no watches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a visible fraction for `element` to every live watch on it.
    pub fn emit(&self, element: ElementId, ratio: f32) {
        self.emit_entry(element, IntersectionEntry::ratio(ratio));
    }

    /// Report a full entry for `element` to every live watch on it.
    pub fn emit_entry(&self, element: ElementId, entry: IntersectionEntry) {
        let batch: Vec<_> = {
            let mut reg = self.registry.borrow_mut();
            reg.watchers
                .iter_mut()
                .filter(|w| w.element == element)
                .map(|w| {
                    w.last_met = Some(entry.is_intersecting || entry.ratio >= w.config.threshold);
                    (w.id, Rc::clone(&w.callback), entry)
                })
                .collect()
        };

        tracing::trace!(element = element.0, ratio = entry.ratio, watches = batch.len(), "scripted entry");
        deliver(&self.registry, batch);
    }

    /// Number of live watches.
    pub fn watch_count(&self) -> usize {
        self.registry.borrow().watchers.len()
    }

    /// Number of live watches on one element.
    pub fn watch_count_for(&self, element: ElementId) -> usize {
        self.registry
            .borrow()
            .watchers
            .iter()
            .filter(|w| w.element == element)
            .count()
    }

    /// Config of the most recent live watch on `element`.
    pub fn config_for(&self, element: ElementId) -> Option<WatchConfig> {
        self.registry
            .borrow()
            .watchers
            .iter()
            .rev()
            .find(|w| w.element == element)
            .map(|w| w.config)
    }
}

impl IntersectionSource for ScriptedIntersections {
    fn watch(
        &self,
        element: ElementId,
        config: &WatchConfig,
        callback: IntersectionCallback,
    ) -> WatchHandle {
        register(&self.registry, element, config, callback)
    }
}
