//! Pane overlays.
//!
//! A grid with frozen rows or columns is drawn as up to six panes: the main
//! scrolling pane plus clones that stay pinned along one or both axes. This
//! module keeps every clone aligned with the main pane.

mod coordinator;
mod frame;
mod kind;
mod pane;
mod registry;

pub use coordinator::{OverlayListener, OverlaySnapshot, Overlays, ScrollNotification};
pub use frame::{Frame, FrameRanges, FrameSnapshot};
pub use kind::PaneKind;
pub use pane::{PaneGeometry, PaneOverlay, PaneSnapshot};
pub use registry::{PaneConstructor, PaneRegistry};
