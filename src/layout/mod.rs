//! Layout Module - Page geometry
//!
//! Lays the landing sections out as a flex column with
//! [Taffy](https://github.com/DioxusLabs/taffy). The resulting rectangles are
//! what [`ViewportIntersections`](crate::intersection::ViewportIntersections)
//! tests against the scrolling viewport.
//!
//! # Example
//!
//! ```ignore
//! use longevity_landing::layout::{PageLayout, SectionBlock};
//! use longevity_landing::types::Section;
//!
//! let layout = PageLayout::compute(1280.0, 48.0, &[
//!     SectionBlock::new(Section::Hero, 720.0),
//!     SectionBlock::new(Section::ContentMap, 560.0),
//! ])?;
//! ```

mod page;

pub use page::*;
