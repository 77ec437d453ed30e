//! Content Map - Active tab of the content map section
//!
//! Holds the ordered category list and the id of the active tab. Unknown ids
//! are stored as-is; readers fall back to the first category.
//!
//! Keyboard navigation follows the tablist pattern: next/previous wrap,
//! first/last jump to the ends.

use std::cell::RefCell;
use std::fmt;

use super::store::{ObservableStore, Subscription};
use crate::content::{content_map_categories, ContentMapCategory};

/// Store-backed content-map tab state.
pub struct ContentMapSelector {
    categories: Vec<ContentMapCategory>,
    active_id: RefCell<String>,
    store: ObservableStore,
}

impl ContentMapSelector {
    /// Selector over the default categories.
    pub fn new() -> Self {
        Self::with_categories(content_map_categories())
    }

    /// Selector over `categories`. The first one starts active.
    pub fn with_categories(categories: Vec<ContentMapCategory>) -> Self {
        let active_id = categories.first().map(|c| c.id.to_string()).unwrap_or_default();
        Self {
            categories,
            active_id: RefCell::new(active_id),
            store: ObservableStore::new(),
        }
    }

    /// Make `id` active. Empty or already-active ids are ignored.
    pub fn set_active(&self, id: &str) {
        {
            let mut active = self.active_id.borrow_mut();
            if id.is_empty() || *active == id {
                return;
            }
            *active = id.to_string();
        }

        tracing::debug!(category = id, "content map category changed");
        self.store.notify();
    }

    /// Id of the active tab (may name no known category).
    pub fn active_id(&self) -> String {
        self.active_id.borrow().clone()
    }

    /// Active category, else the first, else `None`.
    pub fn active_category(&self) -> Option<&ContentMapCategory> {
        self.active_position()
            .and_then(|index| self.categories.get(index))
            .or_else(|| self.categories.first())
    }

    /// All categories in tab order.
    pub fn categories(&self) -> &[ContentMapCategory] {
        &self.categories
    }

    // ===== KEYBOARD NAVIGATION =====

    /// Activate the next tab, wrapping at the end.
    pub fn select_next(&self) {
        let len = self.categories.len();
        if len == 0 {
            return;
        }
        let current = self.active_position().unwrap_or(0);
        self.select_index((current + 1) % len);
    }

    /// Activate the previous tab, wrapping at the start.
    pub fn select_previous(&self) {
        let len = self.categories.len();
        if len == 0 {
            return;
        }
        let current = self.active_position().unwrap_or(0);
        self.select_index((current + len - 1) % len);
    }

    /// Activate the first tab.
    pub fn select_first(&self) {
        self.select_index(0);
    }

    /// Activate the last tab.
    pub fn select_last(&self) {
        if let Some(last) = self.categories.len().checked_sub(1) {
            self.select_index(last);
        }
    }

    fn select_index(&self, index: usize) {
        if let Some(category) = self.categories.get(index) {
            self.set_active(category.id);
        }
    }

    fn active_position(&self) -> Option<usize> {
        let active = self.active_id.borrow();
        self.categories.iter().position(|c| c.id == active.as_str())
    }

    /// Subscribe to active-tab changes.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        self.store.subscribe(listener)
    }

    /// The selector's change store.
    pub fn store(&self) -> &ObservableStore {
        &self.store
    }
}

impl Default for ContentMapSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContentMapSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentMapSelector")
            .field("categories", &self.categories.len())
            .field("active_id", &*self.active_id.borrow())
            .finish()
    }
}
