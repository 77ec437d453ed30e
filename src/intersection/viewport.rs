//! Viewport source - entries computed from geometry
//!
//! Holds element rectangles in page coordinates and a viewport that scrolls
//! over them. On `flush()` every watch is re-evaluated; a watch receives an
//! entry the first time it is evaluated and then only when its
//! "ratio >= threshold" state flips, the way browsers only report threshold
//! crossings.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{
    deliver, register, IntersectionCallback, IntersectionEntry, IntersectionSource, RootMargin,
    WatchConfig, WatchHandle, WatchRegistry,
};
use crate::layout::{PageLayout, Rect};
use crate::types::{ElementId, Section};

struct Geometry {
    viewport_width: f32,
    viewport_height: f32,
    scroll_x: f32,
    scroll_y: f32,
    bounds: HashMap<ElementId, Rect>,
}

impl Geometry {
    fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport_width, self.viewport_height)
            .translate(self.scroll_x, self.scroll_y)
    }

    fn ratio(&self, element: ElementId, margin: &RootMargin) -> f32 {
        let Some(bounds) = self.bounds.get(&element) else {
            return 0.0;
        };
        let area = bounds.area();
        if area <= 0.0 {
            return 0.0;
        }
        let region = margin.apply(self.viewport());
        bounds
            .intersection(&region)
            .map(|overlap| (overlap.area() / area).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }
}

/// Condition a watch is waiting for.
fn condition_met(ratio: f32, threshold: f32) -> bool {
    if threshold <= 0.0 {
        ratio > 0.0
    } else {
        ratio >= threshold
    }
}

/// Geometric intersection source.
#[derive(Clone)]
pub struct ViewportIntersections {
    registry: Rc<RefCell<WatchRegistry>>,
    geometry: Rc<RefCell<Geometry>>,
}

impl ViewportIntersections {
    /// Create a source with a viewport of the given size, scrolled to the top.
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            registry: Rc::new(RefCell::new(WatchRegistry::default())),
            geometry: Rc::new(RefCell::new(Geometry {
                viewport_width,
                viewport_height,
                scroll_x: 0.0,
                scroll_y: 0.0,
                bounds: HashMap::new(),
            })),
        }
    }

    /// Set an element's rectangle. Takes effect on the next flush.
    pub fn set_bounds(&self, element: ElementId, bounds: Rect) {
        self.geometry.borrow_mut().bounds.insert(element, bounds);
    }

    /// Forget an element's rectangle (ratio becomes 0).
    pub fn remove_bounds(&self, element: ElementId) {
        self.geometry.borrow_mut().bounds.remove(&element);
    }

    /// Copy section rectangles from a computed page layout.
    pub fn set_layout<F>(&self, layout: &PageLayout, element_for: F)
    where
        F: Fn(Section) -> ElementId,
    {
        let mut geometry = self.geometry.borrow_mut();
        for (section, rect) in &layout.sections {
            geometry.bounds.insert(element_for(*section), *rect);
        }
    }

    /// Resize the viewport. Takes effect on the next flush.
    pub fn set_viewport(&self, width: f32, height: f32) {
        let mut geometry = self.geometry.borrow_mut();
        geometry.viewport_width = width.max(0.0);
        geometry.viewport_height = height.max(0.0);
    }

    /// Scroll to a vertical offset and flush.
    pub fn scroll_to(&self, y: f32) {
        self.geometry.borrow_mut().scroll_y = y;
        self.flush();
    }

    /// Scroll to both offsets and flush.
    pub fn scroll_to_xy(&self, x: f32, y: f32) {
        {
            let mut geometry = self.geometry.borrow_mut();
            geometry.scroll_x = x;
            geometry.scroll_y = y;
        }
        self.flush();
    }

    /// Current vertical scroll offset.
    pub fn scroll_y(&self) -> f32 {
        self.geometry.borrow().scroll_y
    }

    /// Visible fraction of `element` against the unadjusted viewport.
    pub fn ratio_of(&self, element: ElementId) -> f32 {
        self.geometry.borrow().ratio(element, &RootMargin::ZERO)
    }

    /// Re-evaluate every watch and deliver pending entries.
    ///
    /// Returns the number of entries delivered.
    pub fn flush(&self) -> usize {
        let batch: Vec<_> = {
            let geometry = self.geometry.borrow();
            let mut reg = self.registry.borrow_mut();
            reg.watchers
                .iter_mut()
                .filter_map(|w| {
                    let ratio = geometry.ratio(w.element, &w.config.root_margin);
                    let met = condition_met(ratio, w.config.threshold);
                    if w.last_met == Some(met) {
                        return None;
                    }
                    w.last_met = Some(met);
                    let entry = IntersectionEntry { ratio, is_intersecting: met };
                    Some((w.id, Rc::clone(&w.callback), entry))
                })
                .collect()
        };

        let delivered = batch.len();
        if delivered > 0 {
            tracing::trace!(entries = delivered, "viewport flush");
        }
        deliver(&self.registry, batch);
        delivered
    }

    /// Number of live watches.
    pub fn watch_count(&self) -> usize {
        self.registry.borrow().watchers.len()
    }
}

impl IntersectionSource for ViewportIntersections {
    fn watch(
        &self,
        element: ElementId,
        config: &WatchConfig,
        callback: IntersectionCallback,
    ) -> WatchHandle {
        register(&self.registry, element, config, callback)
    }
}
