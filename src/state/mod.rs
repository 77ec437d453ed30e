//! State Module - View-state stores for the landing page
//!
//! Every store here is single-threaded and event-driven: mutations happen on
//! the UI thread and are announced through an [`ObservableStore`].
//!
//! - **Store** - Listener registry with panic-isolated notify
//! - **Selection** - Cached snapshots of one slice of a store
//! - **Reveal** - Per-key visibility flags fed by an intersection source
//! - **Carousel** - Auto-advancing rotation over a fixed item list
//! - **Content map** - Active tab of the content map section

mod carousel;
mod content_map;
mod reveal;
mod selection;
mod store;

pub use carousel::*;
pub use content_map::*;
pub use reveal::*;
pub use selection::*;
pub use store::*;
