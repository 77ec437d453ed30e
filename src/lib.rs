//! # longevity-landing
//!
//! View-state core for a longevity-research landing page.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals): every
//! store bumps a revision signal when it notifies, so signal-driven renderers
//! can track it like any other reactive value.
//!
//! ## Architecture
//!
//! The crate owns state, never rendering. Platform capabilities are traits the
//! renderer supplies:
//! ```text
//! IntersectionSource → VisibilityTracker → notify → renderer reads is_visible
//! TimerFacility      → CarouselRotator   → notify → renderer reads ordered_items
//! ```
//!
//! ## Modules
//!
//! - [`state`] - Observable stores: reveal tracker, carousel, content map
//! - [`intersection`] - Viewport-intersection capability and bundled sources
//! - [`timer`] - Repeating-timer capability and bundled facilities
//! - [`layout`] - Taffy page layout feeding the viewport source
//! - [`content`] - Static carousel and content-map data
//! - [`types`] - Element handles, icons, sections

pub mod content;
pub mod intersection;
pub mod layout;
pub mod state;
pub mod timer;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use intersection::{
    IntersectionEntry, IntersectionSource, RootMargin, ScriptedIntersections,
    ViewportIntersections, WatchConfig, WatchHandle,
};

pub use layout::{PageLayout, Rect, SectionBlock};

pub use state::{
    // Store
    ObservableStore, Selection, Subscription,
    // Reveal
    RevealBinding, RevealDisposer, RevealError, RevealOptions, VisibilityTracker,
    // Carousel
    CarouselConfig, CarouselRotator, DEFAULT_ROTATION_INTERVAL,
    // Content map
    ContentMapSelector,
};

pub use timer::{ManualTimer, NoTimer, ThreadTimer, TimerFacility, TimerHandle};
